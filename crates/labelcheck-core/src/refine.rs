use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::model::{ExtractedField, SourceHint};
use crate::schema::FieldId;

/// AI-reported confidence a suggestion needs to displace a value the engine
/// already extracted. Empty fields accept any suggestion.
pub const REFINEMENT_CONFIDENCE_BAR: f64 = 0.7;

/// A replacement field value proposed by the AI collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSuggestion {
    pub field: FieldId,
    pub value: String,
    pub confidence: f64,
}

/// Apply AI-collaborator suggestions to a candidate set, before
/// normalization so the resulting label is still built exactly once.
///
/// A suggestion wins only when the engine's own field is empty or the
/// suggestion's confidence exceeds the bar; otherwise the engine's value is
/// kept.
pub fn apply(
    candidates: &mut BTreeMap<FieldId, ExtractedField>,
    suggestions: &[FieldSuggestion],
) {
    for suggestion in suggestions {
        let value = suggestion.value.trim();
        if value.is_empty() {
            continue;
        }

        let current_is_empty = candidates
            .get(&suggestion.field)
            .map(|c| c.value.is_none())
            .unwrap_or(true);

        if current_is_empty || suggestion.confidence > REFINEMENT_CONFIDENCE_BAR {
            debug!(field = suggestion.field.name(), "accepted refinement");
            candidates.insert(
                suggestion.field,
                ExtractedField::hit(
                    value.to_string(),
                    suggestion.confidence,
                    SourceHint::Refinement,
                ),
            );
        }
    }
}
