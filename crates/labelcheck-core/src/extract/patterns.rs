//! Heuristic field extraction from unstructured OCR text.
//!
//! Each field has an ordered cascade of patterns, domain-specific first and
//! generic last. Every pattern is evaluated in full over the text; the single
//! candidate with the strictly highest confidence wins, and ties keep the
//! first one found.

use rayon::prelude::*;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::trace;

use crate::model::{ExtractedField, SourceHint};
use crate::schema::FieldId;

/// Confidence assigned to the shortest qualifying capture.
pub const PATTERN_BASE_CONFIDENCE: f64 = 0.6;
/// Length alone never pushes a heuristic capture past this bound.
pub const PATTERN_MAX_CONFIDENCE: f64 = 0.9;
/// Characters of captured text per unit of added confidence.
pub const PATTERN_LENGTH_DIVISOR: f64 = 100.0;
/// Captures this short are treated as noise and discarded.
const MAX_NOISE_LEN: usize = 2;

/// Heuristic confidence for a captured value: longer captures are more likely
/// genuine, capped so length alone never reaches full certainty.
pub fn length_confidence(value: &str) -> f64 {
    let len = value.chars().count() as f64;
    (PATTERN_BASE_CONFIDENCE + len / PATTERN_LENGTH_DIVISOR).min(PATTERN_MAX_CONFIDENCE)
}

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static extraction pattern")
}

struct Cascade {
    field: FieldId,
    patterns: Vec<Regex>,
}

static CASCADES: LazyLock<Vec<Cascade>> = LazyLock::new(|| {
    vec![
        Cascade {
            field: FieldId::Manufacturer,
            patterns: vec![
                re(r"(?i)(?:manufactured|mfd\.?|mfgd\.?|marketed|mktd\.?|packed|pkd\.?|imported)\s*(?:(?:and|&)\s*(?:marketed|packed)\s*)?by\s*[:\-]?\s*([^\n,;|]{3,100})"),
                re(r"(?i)(?:manufacturer|packer|importer)(?:'s)?\s*(?:name)?\s*[:\-]\s*([^\n,;|]{3,100})"),
                re(r"(?i)\b([a-z][a-z0-9 .,&'\-]{2,80}\s(?:pvt\.?\s*ltd|private limited|limited|ltd|llp|inc|industries|foods))\b"),
            ],
        },
        Cascade {
            field: FieldId::NetQuantity,
            patterns: vec![
                re(r"(?i)net\s*(?:quantity|qty\.?|weight|wt\.?|contents?)\s*[:\-]?\s*([0-9]+(?:[.,][0-9]+)?\s*(?:kg|kgs|g|gm|gms|gram|grams|mg|ml|l|ltr|litre|litres|liter|liters|pc|pcs|piece|pieces|unit|units|n)\b)"),
                re(r"(?i)\b([0-9]+(?:[.,][0-9]+)?\s*(?:kg|kgs|gm|gms|gram|grams|ml|ltr|litre|litres|liter|liters))\b"),
            ],
        },
        Cascade {
            field: FieldId::Mrp,
            patterns: vec![
                re(r"(?i)m\.?\s*r\.?\s*p\.?\s*[:\-]?\s*((?:rs\.?|₹|inr)?\s*[0-9]+(?:[.,][0-9]{1,2})?)"),
                re(r"(?i)(?:maximum\s+retail\s+price|price)\s*[:\-]?\s*((?:rs\.?|₹|inr)?\s*[0-9]+(?:[.,][0-9]{1,2})?)"),
                re(r"(?i)((?:₹|rs\.?)\s*[0-9]+(?:[.,][0-9]{1,2})?)"),
            ],
        },
        Cascade {
            field: FieldId::ConsumerCare,
            patterns: vec![
                re(r"(?i)(?:consumer|customer)\s*care(?:\s*(?:details|cell|address|no\.?|number|e-?mail|executive))?\s*[:\-]?\s*([^\n|]{3,150})"),
                re(r"(?i)(?:complaints?|feedback|queries|grievances?)\s*(?:at|to)?\s*[:\-]\s*([^\n|]{3,150})"),
                re(r"([a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,})"),
                re(r"(?i)(?:toll[\s\-]?free|tel\.?|phone|helpline|call(?:\s*us)?(?:\s*at)?)\s*(?:no\.?|number)?\s*[:\-]?\s*(\+?[0-9][0-9\s\-]{7,16}[0-9])"),
            ],
        },
        Cascade {
            field: FieldId::DateOfManufacture,
            patterns: vec![
                re(r"(?i)(?:date\s*of\s*(?:mfg|mfd|manufacture|manufacturing|packaging|packing|import)\.?|mfg\.?\s*date|mfd\.?(?:\s*on)?|pkd\.?(?:\s*on)?|packed\s*on)\s*[:\-]?\s*([0-9]{1,2}\s*[/.\-]\s*[0-9]{1,2}\s*[/.\-]\s*[0-9]{2,4}|[0-9]{1,2}\s*[/.\-]\s*[0-9]{4}|[a-z]{3,9}\.?,?\s*[0-9]{4})"),
                re(r"\b([0-9]{1,2}\s*[/.\-]\s*[0-9]{1,2}\s*[/.\-]\s*[0-9]{2,4})\b"),
            ],
        },
        Cascade {
            field: FieldId::CountryOfOrigin,
            patterns: vec![
                re(r"(?i)country\s*of\s*origin\s*[:\-]?\s*([a-z][a-z .]{2,50})"),
                re(r"(?i)(?:made|product\s*of|manufactured)\s*in\s*[:\-]?\s*([a-z][a-z .]{2,50})"),
            ],
        },
        Cascade {
            field: FieldId::ProductName,
            patterns: vec![
                re(r"(?i)(?:product|item|commodity)\s*(?:name)?\s*[:\-]\s*([^\n|]{3,120})"),
                re(r"\A\s*([^\n]{3,80})"),
            ],
        },
    ]
});

fn cascade(field: FieldId) -> &'static [Regex] {
    CASCADES
        .iter()
        .find(|c| c.field == field)
        .map(|c| c.patterns.as_slice())
        .unwrap_or(&[])
}

/// Evaluate every pattern fully and keep the best qualifying capture.
///
/// Only capture group 1 is consulted. Captures are trimmed, and captures of
/// two characters or fewer are discarded. A strictly higher confidence is
/// required to displace an earlier candidate, so ties keep the first found.
fn best_candidate(text: &str, patterns: &[Regex]) -> Option<(String, f64)> {
    let mut best: Option<(String, f64)> = None;

    for pattern in patterns {
        for caps in pattern.captures_iter(text) {
            let Some(group) = caps.get(1) else { continue };
            let value = group.as_str().trim();
            if value.chars().count() <= MAX_NOISE_LEN {
                continue;
            }
            let confidence = length_confidence(value);
            if best.as_ref().is_none_or(|(_, c)| confidence > *c) {
                best = Some((value.to_string(), confidence));
            }
        }
    }

    best
}

/// Extract one field from raw label text.
///
/// Pure function over an immutable compiled pattern set; no cursor state is
/// shared across invocations or threads. A field with no qualifying match
/// yields `{value: None, confidence: 0.0}`.
pub fn extract_field(text: &str, field: FieldId) -> ExtractedField {
    match best_candidate(text, cascade(field)) {
        Some((value, confidence)) => {
            trace!(field = field.name(), confidence, "pattern hit");
            ExtractedField::hit(value, confidence, SourceHint::PatternCascade)
        }
        None => ExtractedField::miss(SourceHint::PatternCascade),
    }
}

/// Extract every registry field. Fields never influence each other, so the
/// per-field cascades run in parallel.
pub fn extract_all(text: &str) -> BTreeMap<FieldId, ExtractedField> {
    FieldId::ALL
        .par_iter()
        .map(|&field| (field, extract_field(text, field)))
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABEL: &str = "\
SUNRISE FOODS PRIVATE LIMITED
Premium Instant Coffee
Marketed by: Sunrise Foods Private Limited, Pune 411001
Net Quantity: 200 g
M.R.P. Rs. 245.00 (incl. of all taxes)
Consumer care: care@sunrisefoods.in
Mfg Date: 12/2024
Country of Origin: India
";

    #[test]
    fn test_manufacturer_from_marketed_by() {
        let field = extract_field(LABEL, FieldId::Manufacturer);
        assert_eq!(field.value.as_deref(), Some("Sunrise Foods Private Limited"));
        assert_eq!(field.source, SourceHint::PatternCascade);
    }

    #[test]
    fn test_net_quantity_with_unit() {
        let field = extract_field(LABEL, FieldId::NetQuantity);
        assert_eq!(field.value.as_deref(), Some("200 g"));
    }

    #[test]
    fn test_mrp_keeps_currency_marker() {
        let field = extract_field(LABEL, FieldId::Mrp);
        assert_eq!(field.value.as_deref(), Some("Rs. 245.00"));
    }

    #[test]
    fn test_consumer_care_email() {
        let field = extract_field(LABEL, FieldId::ConsumerCare);
        assert_eq!(field.value.as_deref(), Some("care@sunrisefoods.in"));
    }

    #[test]
    fn test_mfg_date_month_year() {
        let field = extract_field(LABEL, FieldId::DateOfManufacture);
        assert_eq!(field.value.as_deref(), Some("12/2024"));
    }

    #[test]
    fn test_country_of_origin() {
        let field = extract_field(LABEL, FieldId::CountryOfOrigin);
        assert_eq!(field.value.as_deref(), Some("India"));
    }

    #[test]
    fn test_no_match_is_a_miss_not_an_error() {
        let field = extract_field("nothing relevant here", FieldId::Mrp);
        assert_eq!(field.value, None);
        assert_eq!(field.confidence, 0.0);
    }

    #[test]
    fn test_confidence_grows_with_length_and_caps() {
        assert!((length_confidence("abcd") - 0.64).abs() < 1e-9);
        let long = "a".repeat(60);
        assert!((length_confidence(&long) - PATTERN_MAX_CONFIDENCE).abs() < 1e-9);
    }

    #[test]
    fn test_short_captures_discarded() {
        // "9" survives the pattern but is too short to qualify.
        let field = extract_field("MRP: 9", FieldId::Mrp);
        assert_eq!(field.value, None);
    }

    #[test]
    fn test_only_capture_group_one_is_used() {
        let patterns = vec![re(r"(\d{3})-(\d{3})")];
        let (value, _) = best_candidate("call 123-456", &patterns).unwrap();
        assert_eq!(value, "123");
    }

    #[test]
    fn test_longer_capture_from_later_pattern_wins() {
        let patterns = vec![re(r"A:(\w+)"), re(r"B:(\w+)")];
        let (value, _) = best_candidate("A:abc B:abcdefgh", &patterns).unwrap();
        assert_eq!(value, "abcdefgh");
    }

    #[test]
    fn test_equal_confidence_keeps_first_found() {
        let patterns = vec![re(r"A:(\w+)"), re(r"B:(\w+)")];
        let (value, _) = best_candidate("A:aaaa B:bbbb", &patterns).unwrap();
        assert_eq!(value, "aaaa");
    }

    #[test]
    fn test_duplicate_matches_do_not_stack_confidence() {
        let patterns = vec![re(r"(?i)made in ([a-z]+)"), re(r"(?i)origin[: ]+([a-z]+)")];
        let text = "Made in India. Origin: India.";
        let (value, confidence) = best_candidate(text, &patterns).unwrap();
        assert_eq!(value, "India");
        assert!((confidence - length_confidence("India")).abs() < 1e-9);
    }

    #[test]
    fn test_extract_all_covers_every_field() {
        let all = extract_all(LABEL);
        assert_eq!(all.len(), FieldId::ALL.len());
        assert!(all[&FieldId::ProductName].value.is_some());
    }
}
