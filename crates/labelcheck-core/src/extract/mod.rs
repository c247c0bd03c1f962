pub mod patterns;
pub mod sites;
pub mod structured;

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::Platform;
use crate::schema::FieldId;

/// Text recognized from a label image, as handed over by the OCR collaborator.
///
/// Resolution and recognizer confidence feed the quality-warning list only;
/// they are never a scoring input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrInput {
    pub text: String,
    /// Recognizer confidence, 0..1.
    pub confidence: f64,
    pub image_width: u32,
    pub image_height: u32,
}

/// A single `<meta>` tag lifted from the page head. `key` is whichever of
/// `property`, `name` or `itemprop` the tag carried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaTag {
    pub key: String,
    pub content: String,
}

/// The content bundle the scraping collaborator hands to the engine:
/// parsed JSON-LD script contents, meta tags and DOM query access, plus the
/// detected-platform hint that selects the site-specific selector tier.
pub struct PageBundle {
    pub url: Option<String>,
    pub platform: Option<Platform>,
    pub json_ld: Vec<serde_json::Value>,
    pub meta: Vec<MetaTag>,
    /// Notes about content that had to be skipped while building the bundle.
    pub parse_warnings: Vec<String>,
    pub(crate) dom: Html,
}

impl PageBundle {
    /// Build a bundle from raw HTML. Malformed JSON-LD blocks are skipped
    /// and surfaced as parse warnings, never as errors.
    pub fn from_html(html: &str, url: Option<&str>) -> PageBundle {
        let dom = Html::parse_document(html);
        let mut json_ld = Vec::new();
        let mut parse_warnings = Vec::new();

        let ld_selector = Selector::parse(r#"script[type="application/ld+json"]"#)
            .expect("static selector");
        for script in dom.select(&ld_selector) {
            let raw: String = script.text().collect();
            if raw.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<serde_json::Value>(&raw) {
                Ok(value) => json_ld.push(value),
                Err(e) => {
                    parse_warnings.push(format!("skipped malformed JSON-LD block: {e}"));
                }
            }
        }

        let meta_selector = Selector::parse("meta").expect("static selector");
        let mut meta = Vec::new();
        for tag in dom.select(&meta_selector) {
            let el = tag.value();
            let key = el
                .attr("property")
                .or_else(|| el.attr("name"))
                .or_else(|| el.attr("itemprop"));
            if let (Some(key), Some(content)) = (key, el.attr("content")) {
                if !content.trim().is_empty() {
                    meta.push(MetaTag {
                        key: key.to_string(),
                        content: content.trim().to_string(),
                    });
                }
            }
        }

        let platform = url.and_then(sites::detect_platform);
        debug!(
            json_ld_blocks = json_ld.len(),
            meta_tags = meta.len(),
            ?platform,
            "built page bundle"
        );

        PageBundle {
            url: url.map(|u| u.to_string()),
            platform,
            json_ld,
            meta,
            parse_warnings,
            dom,
        }
    }
}

/// Truncate to `max_chars` on a character boundary.
pub(crate) fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Clip an extracted string to the field's schema length limit.
pub(crate) fn clip_to_schema(value: &str, field: FieldId) -> String {
    let max = crate::schema::field_schema(field).max_length;
    truncate_chars(value.trim(), max).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_collects_json_ld_and_meta() {
        let html = r#"<html><head>
            <script type="application/ld+json">{"@type":"Product","name":"Tea"}</script>
            <meta property="og:title" content="Tea 250 g"/>
            <meta name="description" content="Loose leaf tea"/>
        </head><body></body></html>"#;
        let bundle = PageBundle::from_html(html, None);
        assert_eq!(bundle.json_ld.len(), 1);
        assert_eq!(bundle.meta.len(), 2);
        assert!(bundle.parse_warnings.is_empty());
    }

    #[test]
    fn test_malformed_json_ld_becomes_warning() {
        let html = r#"<html><head>
            <script type="application/ld+json">{not json</script>
        </head><body></body></html>"#;
        let bundle = PageBundle::from_html(html, None);
        assert!(bundle.json_ld.is_empty());
        assert_eq!(bundle.parse_warnings.len(), 1);
    }

    #[test]
    fn test_platform_detected_from_url() {
        let bundle = PageBundle::from_html("<html></html>", Some("https://www.amazon.in/dp/B0TEST"));
        assert_eq!(bundle.platform, Some(Platform::Amazon));
    }

    #[test]
    fn test_truncate_chars_on_boundary() {
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("hi", 10), "hi");
        // Multi-byte characters are not split.
        assert_eq!(truncate_chars("₹₹₹₹", 2), "₹₹");
    }
}
