use serde::{Deserialize, Serialize};

use crate::extract::{OcrInput, PageBundle};
use crate::model::{LabelSource, NormalizedLabel, Severity, ViolationKind};
use crate::schema::{FieldId, MANDATORY_FIELD_COUNT};

/// Either image dimension below this is flagged as low resolution.
pub const MIN_IMAGE_DIMENSION: u32 = 300;
/// Recognizer confidence below this is flagged.
pub const LOW_OCR_CONFIDENCE: f64 = 0.5;

/// An advisory about capture quality. Never a scoring input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityWarning {
    pub message: String,
    pub severity: Severity,
}

pub fn warnings_for_ocr(input: &OcrInput) -> Vec<QualityWarning> {
    let mut warnings = Vec::new();

    if input.image_width < MIN_IMAGE_DIMENSION || input.image_height < MIN_IMAGE_DIMENSION {
        warnings.push(QualityWarning {
            message: format!(
                "image resolution {}x{} is below {}px; extraction may be unreliable",
                input.image_width, input.image_height, MIN_IMAGE_DIMENSION
            ),
            severity: Severity::Medium,
        });
    }
    if input.confidence < LOW_OCR_CONFIDENCE {
        warnings.push(QualityWarning {
            message: format!(
                "OCR confidence {:.2} is below {LOW_OCR_CONFIDENCE}",
                input.confidence
            ),
            severity: Severity::Medium,
        });
    }

    warnings
}

pub fn warnings_for_page(bundle: &PageBundle) -> Vec<QualityWarning> {
    let mut warnings: Vec<QualityWarning> = bundle
        .parse_warnings
        .iter()
        .map(|message| QualityWarning {
            message: message.clone(),
            severity: Severity::Low,
        })
        .collect();

    if bundle.url.is_some() && bundle.platform.is_none() {
        warnings.push(QualityWarning {
            message: "unrecognized platform; site-specific selectors were skipped".to_string(),
            severity: Severity::Low,
        });
    }

    warnings
}

/// Conceptual checks for image submissions: every mandatory field plus the
/// product name.
const IMAGE_REQUIRED: [FieldId; 7] = [
    FieldId::Manufacturer,
    FieldId::NetQuantity,
    FieldId::Mrp,
    FieldId::ConsumerCare,
    FieldId::DateOfManufacture,
    FieldId::CountryOfOrigin,
    FieldId::ProductName,
];

/// Conceptual checks for URL submissions. Consumer care and manufacture date
/// are rarely published on product pages and are not demanded there.
const PAGE_REQUIRED: [FieldId; 5] = [
    FieldId::Manufacturer,
    FieldId::NetQuantity,
    FieldId::Mrp,
    FieldId::CountryOfOrigin,
    FieldId::ProductName,
];

/// The required-field subset a caller applies on top of the scorer's own
/// mandatory-field violations. The scorer itself always uses the same six
/// mandatory fields; this stricter-or-looser checklist is caller policy and
/// deliberately lives outside it.
pub fn required_fields(source: &LabelSource) -> &'static [FieldId] {
    match source {
        LabelSource::Ocr { .. } => &IMAGE_REQUIRED,
        LabelSource::Page { .. } => &PAGE_REQUIRED,
    }
}

/// Required-policy fields absent from the label.
pub fn required_missing(label: &NormalizedLabel) -> Vec<FieldId> {
    required_fields(&label.source)
        .iter()
        .copied()
        .filter(|id| label.get(*id).is_none())
        .collect()
}

/// Structural self-check on an assembled label.
///
/// A non-empty result indicates a programming-contract violation in the
/// pipeline, not a data-quality problem with the submission.
pub fn verify_label_shape(label: &NormalizedLabel) -> Vec<String> {
    let mut errors = Vec::new();

    for id in FieldId::ALL {
        if !label.fields.contains_key(&id) {
            errors.push(format!("label is missing schema key '{id}'"));
        }
        if !label.field_confidences.contains_key(&id) {
            errors.push(format!("label is missing confidence entry for '{id}'"));
        }
    }

    for (id, confidence) in &label.field_confidences {
        if !(0.0..=1.0).contains(confidence) {
            errors.push(format!("confidence for '{id}' is out of range: {confidence}"));
        }
    }

    if label.fields_total != MANDATORY_FIELD_COUNT {
        errors.push(format!(
            "fields_total is {} instead of {MANDATORY_FIELD_COUNT}",
            label.fields_total
        ));
    }

    // Missing violations and null mandatory fields must agree exactly.
    for id in FieldId::MANDATORY {
        let is_null = label.get(id).is_none();
        let missing_count = label
            .violations
            .iter()
            .filter(|v| v.field == id && v.kind == ViolationKind::Missing)
            .count();
        if is_null && missing_count != 1 {
            errors.push(format!(
                "null mandatory field '{id}' has {missing_count} missing violations"
            ));
        }
        if !is_null && missing_count != 0 {
            errors.push(format!(
                "present field '{id}' carries a missing violation"
            ));
        }
    }

    errors
}
