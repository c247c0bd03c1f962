//! Sanitization and schema validation of raw field candidates.
//!
//! Mandatory fields run the full pipeline: trim and truncate, sentinel
//! suppression, pattern validation, then a missing-field check. Supplemental
//! fields are sanitized only; they never generate violations and never touch
//! scoring.

use std::collections::BTreeMap;

use crate::model::{sort_violations, ExtractedField, Severity, Violation, ViolationKind};
use crate::schema::{self, FieldId, FieldSchema};

/// Confidence deduction for a present value that fails its validation
/// pattern. Floored at zero.
pub const FORMAT_CONFIDENCE_PENALTY: f64 = 0.3;

/// Sanitized values shorter than this are treated as absent.
const MIN_VALUE_LEN: usize = 2;

/// Placeholder strings equivalent to absence when contained case-insensitively.
const SENTINEL_SUBSTRINGS: [&str; 2] = ["not available", "n/a"];
/// Placeholder strings equivalent to absence when matched exactly.
const SENTINEL_EXACT: [&str; 2] = ["-", "\u{2014}"];

/// Output of a normalization pass over one submission's candidates.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub fields: BTreeMap<FieldId, Option<String>>,
    pub confidences: BTreeMap<FieldId, f64>,
    /// Ordered for display: severity descending, then field name ascending.
    pub violations: Vec<Violation>,
}

/// Normalize raw candidates against the field schema registry.
///
/// Idempotent: feeding the resulting values back through produces the same
/// values and the same violation set. Fields with no candidate entry are
/// treated as misses.
pub fn normalize(candidates: &BTreeMap<FieldId, ExtractedField>) -> Normalized {
    let mut fields = BTreeMap::new();
    let mut confidences = BTreeMap::new();
    let mut violations = Vec::new();

    for field_schema in schema::registry() {
        let id = field_schema.id;
        let candidate = candidates.get(&id);
        let raw = candidate.and_then(|c| c.value.as_deref());
        let mut confidence = candidate.map(|c| c.confidence).unwrap_or(0.0);

        let value = raw.and_then(|raw| sanitize(raw, field_schema));

        if field_schema.mandatory {
            if let Some(value) = &value {
                if !field_schema.validation.is_match(value) {
                    confidence = (confidence - FORMAT_CONFIDENCE_PENALTY).max(0.0);
                    violations.push(Violation {
                        field: id,
                        kind: ViolationKind::Format,
                        severity: Severity::Medium,
                        message: format!(
                            "{id} value '{value}' does not match the expected format"
                        ),
                    });
                }
            } else {
                confidence = 0.0;
                violations.push(Violation {
                    field: id,
                    kind: ViolationKind::Missing,
                    severity: Severity::High,
                    message: format!("mandatory field {id} is missing from the label"),
                });
            }
        }

        fields.insert(id, value);
        confidences.insert(id, confidence);
    }

    sort_violations(&mut violations);

    Normalized {
        fields,
        confidences,
        violations,
    }
}

/// Trim, truncate to the schema length, and suppress sentinel placeholders.
/// Returns `None` when the value is effectively absent.
fn sanitize(raw: &str, field_schema: &FieldSchema) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let clipped = crate::extract::truncate_chars(trimmed, field_schema.max_length)
        .trim()
        .to_string();

    if clipped.chars().count() < MIN_VALUE_LEN {
        return None;
    }
    let lower = clipped.to_lowercase();
    if SENTINEL_SUBSTRINGS.iter().any(|s| lower.contains(s)) {
        return None;
    }
    if SENTINEL_EXACT.contains(&clipped.as_str()) {
        return None;
    }

    Some(clipped)
}
