//! Field extraction from semi-structured page content.
//!
//! Each field runs through an explicit priority chain of source tiers, and a
//! tier is only consulted when every tier before it yielded nothing:
//! JSON-LD objects, then page meta tags, then site-specific selectors, then
//! generic DOM heuristics. A field with no chain hit is a miss, not an error.

use regex::Regex;
use scraper::{ElementRef, Selector};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::trace;

use super::sites;
use super::{clip_to_schema, PageBundle};
use crate::model::{ExtractedField, Platform, SourceHint};
use crate::schema::FieldId;

/// Fixed confidence per source tier. Machine-readable metadata is trusted
/// more than visual-layout heuristics.
pub const JSON_LD_CONFIDENCE: f64 = 0.9;
pub const META_TAG_CONFIDENCE: f64 = 0.8;
pub const SITE_SELECTOR_CONFIDENCE: f64 = 0.75;
pub const GENERIC_DOM_CONFIDENCE: f64 = 0.6;

/// Breadcrumb entries with these literal names are navigation, not products.
const BREADCRUMB_SKIP: [&str; 2] = ["Home", "Category"];

/// Extract one field from the content bundle via the tier chain.
///
/// The returned value is already truncated to the field's schema length.
pub fn extract_field(bundle: &PageBundle, field: FieldId) -> ExtractedField {
    let tiers: [(Tier, f64, SourceHint); 4] = [
        (from_json_ld, JSON_LD_CONFIDENCE, SourceHint::JsonLd),
        (from_meta_tags, META_TAG_CONFIDENCE, SourceHint::MetaTags),
        (
            from_site_selectors,
            SITE_SELECTOR_CONFIDENCE,
            SourceHint::SiteSelectors,
        ),
        (from_generic_dom, GENERIC_DOM_CONFIDENCE, SourceHint::GenericDom),
    ];

    for (tier, confidence, source) in tiers {
        if let Some(value) = tier(bundle, field) {
            let value = clip_to_schema(&value, field);
            if !value.is_empty() {
                trace!(field = field.name(), ?source, "structured hit");
                return ExtractedField::hit(value, confidence, source);
            }
        }
    }
    ExtractedField::miss(SourceHint::GenericDom)
}

/// Extract every registry field from the bundle.
pub fn extract_all(bundle: &PageBundle) -> BTreeMap<FieldId, ExtractedField> {
    FieldId::ALL
        .iter()
        .map(|&field| (field, extract_field(bundle, field)))
        .collect()
}

type Tier = fn(&PageBundle, FieldId) -> Option<String>;

// --- Tier 1: JSON-LD -------------------------------------------------------

fn from_json_ld(bundle: &PageBundle, field: FieldId) -> Option<String> {
    let mut products = Vec::new();
    for doc in &bundle.json_ld {
        collect_typed(doc, "Product", &mut products);
    }
    for product in &products {
        if let Some(value) = product_field(product, field) {
            return Some(value);
        }
    }

    // Product objects said nothing; fall back to secondary schema types.
    match field {
        FieldId::ProductName => bundle.json_ld.iter().find_map(breadcrumb_leaf),
        FieldId::Manufacturer => bundle
            .json_ld
            .iter()
            .find_map(|doc| organization_name(doc, bundle.platform)),
        _ => None,
    }
}

/// Walk a JSON-LD document collecting objects of the wanted `@type`.
/// Top-level objects land before ones nested in `@graph` arrays or under
/// `WebPage`/`WebSite` main-entity wrappers.
fn collect_typed<'a>(value: &'a Value, wanted: &str, out: &mut Vec<&'a Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_typed(item, wanted, out);
            }
        }
        Value::Object(map) => {
            if type_is(value, wanted) {
                out.push(value);
            }
            if let Some(graph) = map.get("@graph") {
                collect_typed(graph, wanted, out);
            }
            for key in ["mainEntity", "mainEntityOfPage"] {
                if let Some(nested) = map.get(key) {
                    collect_typed(nested, wanted, out);
                }
            }
        }
        _ => {}
    }
}

fn type_is(value: &Value, wanted: &str) -> bool {
    match value.get("@type") {
        Some(Value::String(s)) => s == wanted,
        Some(Value::Array(items)) => items.iter().any(|v| v.as_str() == Some(wanted)),
        _ => false,
    }
}

fn product_field(product: &Value, field: FieldId) -> Option<String> {
    match field {
        FieldId::ProductName => product.get("name").and_then(Value::as_str).and_then(non_empty),
        FieldId::Manufacturer => product
            .get("brand")
            .and_then(string_or_name)
            .or_else(|| product.get("manufacturer").and_then(string_or_name)),
        FieldId::Mrp => offer_price(product),
        FieldId::NetQuantity => weight_text(product)
            .or_else(|| product.get("size").and_then(as_display)),
        FieldId::CountryOfOrigin => product.get("countryOfOrigin").and_then(string_or_name),
        FieldId::DateOfManufacture => product
            .get("productionDate")
            .and_then(Value::as_str)
            .and_then(non_empty),
        FieldId::ConsumerCare => None,
    }
}

fn offer_price(product: &Value) -> Option<String> {
    let offers = product.get("offers")?;
    let offer = match offers {
        Value::Array(items) => items.first()?,
        other => other,
    };
    offer
        .get("price")
        .or_else(|| offer.get("lowPrice"))
        .and_then(as_display)
}

fn weight_text(product: &Value) -> Option<String> {
    match product.get("weight")? {
        Value::String(s) => non_empty(s),
        Value::Object(map) => {
            let value = map.get("value").and_then(as_display)?;
            match map.get("unitText").and_then(Value::as_str) {
                Some(unit) => Some(format!("{value} {unit}")),
                None => Some(value),
            }
        }
        _ => None,
    }
}

/// Deepest breadcrumb entry that is not a navigation crumb.
fn breadcrumb_leaf(doc: &Value) -> Option<String> {
    let mut lists = Vec::new();
    collect_typed(doc, "BreadcrumbList", &mut lists);

    for list in lists {
        let Some(items) = list.get("itemListElement").and_then(Value::as_array) else {
            continue;
        };
        let mut leaf = None;
        for entry in items {
            let name = entry
                .get("name")
                .and_then(Value::as_str)
                .or_else(|| {
                    entry
                        .get("item")
                        .and_then(|item| item.get("name"))
                        .and_then(Value::as_str)
                })
                .map(str::trim);
            match name {
                Some(name) if !name.is_empty() && !BREADCRUMB_SKIP.contains(&name) => {
                    leaf = Some(name.to_string());
                }
                _ => {}
            }
        }
        if leaf.is_some() {
            return leaf;
        }
    }
    None
}

/// Organization schema brand name, skipping the marketplace's own brand.
fn organization_name(doc: &Value, platform: Option<Platform>) -> Option<String> {
    let mut orgs = Vec::new();
    collect_typed(doc, "Organization", &mut orgs);

    orgs.iter().find_map(|org| {
        let name = org.get("name").and_then(Value::as_str).and_then(non_empty)?;
        let own_brand = platform
            .map(|p| p.brand_name())
            .is_some_and(|brand| name.eq_ignore_ascii_case(brand));
        if own_brand {
            None
        } else {
            Some(name)
        }
    })
}

fn string_or_name(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s),
        Value::Object(_) => value.get("name").and_then(Value::as_str).and_then(non_empty),
        _ => None,
    }
}

fn as_display(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// --- Tier 2: meta tags -----------------------------------------------------

fn meta_keys(field: FieldId) -> &'static [&'static str] {
    match field {
        FieldId::ProductName => &["og:title", "twitter:title", "title"],
        FieldId::Mrp => &["product:price:amount", "og:price:amount", "price"],
        FieldId::Manufacturer => &["product:brand", "og:brand", "brand"],
        FieldId::NetQuantity => &["product:weight", "og:weight", "weight"],
        FieldId::CountryOfOrigin => &["product:country_of_origin", "og:country-name", "country"],
        FieldId::ConsumerCare | FieldId::DateOfManufacture => &[],
    }
}

fn from_meta_tags(bundle: &PageBundle, field: FieldId) -> Option<String> {
    for key in meta_keys(field) {
        let hit = bundle
            .meta
            .iter()
            .find(|tag| tag.key.eq_ignore_ascii_case(key))
            .and_then(|tag| non_empty(&tag.content));
        if hit.is_some() {
            return hit;
        }
    }
    None
}

// --- Tier 3: site-specific selectors ---------------------------------------

fn from_site_selectors(bundle: &PageBundle, field: FieldId) -> Option<String> {
    let platform = bundle.platform?;
    for rule in sites::selector_chain(platform, field) {
        let selector = Selector::parse(rule.css).expect("static selector");
        for element in bundle.dom.select(&selector) {
            let value = match rule.attr {
                Some(attr) => element.value().attr(attr).map(str::to_string),
                None => Some(element_text(&element)),
            };
            if let Some(value) = value.as_deref().and_then(non_empty) {
                return Some(value);
            }
        }
    }
    None
}

// --- Tier 4: generic DOM heuristics ----------------------------------------

static GENERIC_UNIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[0-9]+(?:[.,][0-9]+)?\s*(?:kg|kgs|gm|gms|gram|grams|ml|ltr|litre|litres|g)\b")
        .expect("static pattern")
});
static GENERIC_AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:₹|rs\.?)\s*[0-9]+(?:[.,][0-9]{1,2})?").expect("static pattern")
});
static GENERIC_EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}").expect("static pattern")
});
static GENERIC_ORIGIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:made in|country of origin[:\s]+)\s*([A-Za-z][A-Za-z ]{2,40})")
        .expect("static pattern")
});

fn from_generic_dom(bundle: &PageBundle, field: FieldId) -> Option<String> {
    match field {
        FieldId::ProductName => {
            first_heading(bundle).or_else(|| class_hint(bundle, &["title"], false))
        }
        FieldId::Mrp => class_hint(bundle, &["price", "mrp"], true)
            .or_else(|| regex_span(bundle, &GENERIC_AMOUNT_RE)),
        FieldId::Manufacturer => class_hint(bundle, &["brand", "manufacturer"], false),
        FieldId::NetQuantity => class_hint(bundle, &["quantity", "qty", "weight"], true)
            .or_else(|| regex_span(bundle, &GENERIC_UNIT_RE)),
        FieldId::CountryOfOrigin => class_hint(bundle, &["origin"], false)
            .or_else(|| regex_capture(bundle, &GENERIC_ORIGIN_RE)),
        FieldId::ConsumerCare => class_hint(bundle, &["care", "contact"], false)
            .or_else(|| regex_span(bundle, &GENERIC_EMAIL_RE)),
        FieldId::DateOfManufacture => None,
    }
}

fn first_heading(bundle: &PageBundle) -> Option<String> {
    for css in ["h1", "h2"] {
        let selector = Selector::parse(css).expect("static selector");
        for element in bundle.dom.select(&selector) {
            if let Some(text) = non_empty(&element_text(&element)) {
                return Some(text);
            }
        }
    }
    None
}

/// First element whose class list contains one of the needles and whose text
/// is usable. `want_digit` filters out purely decorative hits for numeric
/// fields.
fn class_hint(bundle: &PageBundle, needles: &[&str], want_digit: bool) -> Option<String> {
    let any = Selector::parse("*").expect("static selector");
    for element in bundle.dom.select(&any) {
        let name = element.value().name();
        if name == "script" || name == "style" {
            continue;
        }
        let Some(class) = element.value().attr("class") else {
            continue;
        };
        let class = class.to_lowercase();
        if !needles.iter().any(|needle| class.contains(needle)) {
            continue;
        }
        let text = element_text(&element);
        if text.is_empty() || (want_digit && !text.contains(|c: char| c.is_ascii_digit())) {
            continue;
        }
        return Some(text);
    }
    None
}

fn regex_span(bundle: &PageBundle, pattern: &Regex) -> Option<String> {
    pattern
        .find(&page_text(bundle))
        .map(|m| m.as_str().trim().to_string())
}

fn regex_capture(bundle: &PageBundle, pattern: &Regex) -> Option<String> {
    pattern
        .captures(&page_text(bundle))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn page_text(bundle: &PageBundle) -> String {
    let body = Selector::parse("body").expect("static selector");
    match bundle.dom.select(&body).next() {
        Some(element) => element_text(&element),
        None => String::new(),
    }
}

fn element_text(element: &ElementRef) -> String {
    let raw: String = element.text().collect::<Vec<_>>().join(" ");
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
