//! Site-specific selector sets for recognized e-commerce platforms.
//! Each field maps to an ordered OR-chain of selectors; the first selector
//! that yields a non-empty value wins.

use crate::model::Platform;
use crate::schema::FieldId;

/// One step in a selector chain: a CSS selector plus an optional attribute
/// to read instead of the element text.
#[derive(Debug, Clone, Copy)]
pub struct SelectorRule {
    pub css: &'static str,
    pub attr: Option<&'static str>,
}

const fn text(css: &'static str) -> SelectorRule {
    SelectorRule { css, attr: None }
}

/// Detect a recognized platform from a page URL.
pub fn detect_platform(url: &str) -> Option<Platform> {
    let host = url
        .split("//")
        .nth(1)
        .unwrap_or(url)
        .split('/')
        .next()
        .unwrap_or("")
        .to_lowercase();

    if host.contains("amazon.") {
        Some(Platform::Amazon)
    } else if host.contains("flipkart.") {
        Some(Platform::Flipkart)
    } else if host.contains("bigbasket.") {
        Some(Platform::BigBasket)
    } else {
        None
    }
}

/// The ordered selector chain for one field on one platform. Empty when the
/// platform exposes no reliable markup for that field.
pub fn selector_chain(platform: Platform, field: FieldId) -> &'static [SelectorRule] {
    match platform {
        Platform::Amazon => amazon(field),
        Platform::Flipkart => flipkart(field),
        Platform::BigBasket => bigbasket(field),
    }
}

fn amazon(field: FieldId) -> &'static [SelectorRule] {
    const PRODUCT_NAME: &[SelectorRule] = &[text("#productTitle"), text("span#title")];
    const MRP: &[SelectorRule] = &[
        text("span.a-price span.a-offscreen"),
        text("#priceblock_ourprice"),
        text("#priceblock_dealprice"),
    ];
    const MANUFACTURER: &[SelectorRule] = &[
        text("tr.po-brand td.a-span9 span"),
        text("#bylineInfo"),
        text("tr.po-manufacturer td.a-span9 span"),
    ];
    const NET_QUANTITY: &[SelectorRule] = &[
        text("tr.po-item_weight td.a-span9 span"),
        text("tr.po-net_quantity td.a-span9 span"),
        text("tr.po-unit_count td.a-span9 span"),
    ];
    const COUNTRY_OF_ORIGIN: &[SelectorRule] = &[text("tr.po-country_of_origin td.a-span9 span")];
    match field {
        FieldId::ProductName => PRODUCT_NAME,
        FieldId::Mrp => MRP,
        FieldId::Manufacturer => MANUFACTURER,
        FieldId::NetQuantity => NET_QUANTITY,
        FieldId::CountryOfOrigin => COUNTRY_OF_ORIGIN,
        FieldId::ConsumerCare | FieldId::DateOfManufacture => &[],
    }
}

fn flipkart(field: FieldId) -> &'static [SelectorRule] {
    const PRODUCT_NAME: &[SelectorRule] =
        &[text("span.B_NuCI"), text("h1._6EBuvT span"), text("h1 span")];
    const MRP: &[SelectorRule] = &[text("div.Nx9bqj"), text("div._30jeq3")];
    const MANUFACTURER: &[SelectorRule] = &[text("span.G6XhRU"), text("div._2whKao")];
    const NET_QUANTITY: &[SelectorRule] = &[text("li._21Ahn-"), text("div._2lzn0o")];
    const COUNTRY_OF_ORIGIN: &[SelectorRule] = &[text("li._21lJbe")];
    match field {
        FieldId::ProductName => PRODUCT_NAME,
        FieldId::Mrp => MRP,
        FieldId::Manufacturer => MANUFACTURER,
        FieldId::NetQuantity => NET_QUANTITY,
        FieldId::CountryOfOrigin => COUNTRY_OF_ORIGIN,
        FieldId::ConsumerCare | FieldId::DateOfManufacture => &[],
    }
}

fn bigbasket(field: FieldId) -> &'static [SelectorRule] {
    const PRODUCT_NAME: &[SelectorRule] = &[text("h1.GrE04"), text("h1")];
    const MRP: &[SelectorRule] = &[
        SelectorRule {
            css: r#"td[data-qa="productPrice"]"#,
            attr: None,
        },
        text("span.Pricing___StyledLabel-sc-pldi2d-1"),
    ];
    const MANUFACTURER: &[SelectorRule] = &[text("a.BrandName___StyledLabel-sc-cn1g5-0")];
    const NET_QUANTITY: &[SelectorRule] = &[
        SelectorRule {
            css: r#"span[data-qa="productWeight"]"#,
            attr: None,
        },
        text("div.quantity span"),
    ];
    const COUNTRY_OF_ORIGIN: &[SelectorRule] =
        &[text("div.MoreDetails___StyledDiv-sc-1h9modn-0 p")];
    match field {
        FieldId::ProductName => PRODUCT_NAME,
        FieldId::Mrp => MRP,
        FieldId::Manufacturer => MANUFACTURER,
        FieldId::NetQuantity => NET_QUANTITY,
        FieldId::CountryOfOrigin => COUNTRY_OF_ORIGIN,
        FieldId::ConsumerCare | FieldId::DateOfManufacture => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_known_platforms() {
        assert_eq!(
            detect_platform("https://www.amazon.in/dp/B00TEST"),
            Some(Platform::Amazon)
        );
        assert_eq!(
            detect_platform("https://www.flipkart.com/p/itm123"),
            Some(Platform::Flipkart)
        );
        assert_eq!(
            detect_platform("https://www.bigbasket.com/pd/100"),
            Some(Platform::BigBasket)
        );
    }

    #[test]
    fn test_unknown_host_is_none() {
        assert_eq!(detect_platform("https://shop.example.com/item/1"), None);
    }

    #[test]
    fn test_path_mention_does_not_confuse_detection() {
        assert_eq!(detect_platform("https://example.com/amazon.deals"), None);
    }

    #[test]
    fn test_every_platform_has_a_title_chain() {
        for platform in [Platform::Amazon, Platform::Flipkart, Platform::BigBasket] {
            assert!(!selector_chain(platform, FieldId::ProductName).is_empty());
        }
    }
}
