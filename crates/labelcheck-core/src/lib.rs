pub mod error;
pub mod extract;
pub mod model;
pub mod normalize;
pub mod quality;
pub mod refine;
pub mod schema;
pub mod score;

use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use extract::{OcrInput, PageBundle};
use model::{ExtractedField, LabelSource, NormalizedLabel};
use quality::QualityWarning;
use refine::FieldSuggestion;
use schema::FieldId;

/// Options for a single check run.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Replacement values proposed by the AI collaborator, merged under the
    /// refinement policy before normalization.
    pub suggestions: Vec<FieldSuggestion>,
}

/// Everything one submission produces: the immutable label plus the
/// non-scoring advisories around it.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub label: NormalizedLabel,
    pub quality_warnings: Vec<QualityWarning>,
    /// Fields absent under the caller's source-dependent required policy.
    pub required_missing: Vec<FieldId>,
}

/// Main API entry point: check OCR-recognized label text.
///
/// Runs the pattern cascades over the text, merges any AI suggestions,
/// normalizes against the field schema registry and scores the result.
pub fn check_text(input: &OcrInput, options: &CheckOptions) -> CheckOutcome {
    let candidates = extract::patterns::extract_all(&input.text);
    let source = LabelSource::Ocr {
        confidence: input.confidence,
        image_width: input.image_width,
        image_height: input.image_height,
    };
    finish(candidates, source, quality::warnings_for_ocr(input), options)
}

/// Main API entry point: check a scraped-page content bundle.
pub fn check_page(bundle: &PageBundle, options: &CheckOptions) -> CheckOutcome {
    let candidates = extract::structured::extract_all(bundle);
    let source = LabelSource::Page {
        url: bundle.url.clone(),
        platform: bundle.platform,
    };
    finish(
        candidates,
        source,
        quality::warnings_for_page(bundle),
        options,
    )
}

/// Shared pipeline tail: refinement, normalization, scoring and assembly.
/// Runs only after every field extraction for the submission completed.
fn finish(
    mut candidates: BTreeMap<FieldId, ExtractedField>,
    source: LabelSource,
    quality_warnings: Vec<QualityWarning>,
    options: &CheckOptions,
) -> CheckOutcome {
    refine::apply(&mut candidates, &options.suggestions);

    let normalized = normalize::normalize(&candidates);
    let scored = score::score(
        &normalized.fields,
        &normalized.confidences,
        &normalized.violations,
    );
    debug!(
        score = scored.compliance_score,
        status = %scored.status,
        present = scored.fields_present,
        "label scored"
    );

    let label = NormalizedLabel {
        fields: normalized.fields,
        field_confidences: normalized.confidences,
        compliance_score: scored.compliance_score,
        status: scored.status,
        violations: normalized.violations,
        fields_present: scored.fields_present,
        fields_total: scored.fields_total,
        source,
        checked_at: Utc::now(),
    };
    let required_missing = quality::required_missing(&label);

    CheckOutcome {
        label,
        quality_warnings,
        required_missing,
    }
}
