use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::schema::FieldId;

/// Which extraction tier produced a field candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceHint {
    PatternCascade,
    JsonLd,
    MetaTags,
    SiteSelectors,
    GenericDom,
    Refinement,
}

/// A single field candidate produced by an extractor. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedField {
    pub value: Option<String>,
    pub confidence: f64,
    pub source: SourceHint,
}

impl ExtractedField {
    pub fn hit(value: String, confidence: f64, source: SourceHint) -> Self {
        ExtractedField {
            value: Some(value),
            confidence,
            source,
        }
    }

    /// An extraction miss: no value, zero confidence. Not an error.
    pub fn miss(source: SourceHint) -> Self {
        ExtractedField {
            value: None,
            confidence: 0.0,
            source,
        }
    }
}

/// Violation severity. Ordering matters: `High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationKind {
    Missing,
    Format,
    Invalid,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::Missing => write!(f, "missing"),
            ViolationKind::Format => write!(f, "format"),
            ViolationKind::Invalid => write!(f, "invalid"),
        }
    }
}

/// A recorded defect in a specific field. Generated only by the normalizer;
/// never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub field: FieldId,
    pub kind: ViolationKind,
    pub severity: Severity,
    pub message: String,
}

/// Sort violations for display: severity descending, then field name ascending.
pub fn sort_violations(violations: &mut [Violation]) {
    violations.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.field.name().cmp(b.field.name()))
    });
}

/// The ternary compliance outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Approved,
    Failed,
    NeedsReview,
}

impl ComplianceStatus {
    /// Parse a persisted status string. Anything unrecognized is coerced to
    /// `NeedsReview` rather than stored verbatim.
    pub fn from_name(s: &str) -> ComplianceStatus {
        match s.trim().to_lowercase().as_str() {
            "approved" => ComplianceStatus::Approved,
            "failed" => ComplianceStatus::Failed,
            _ => ComplianceStatus::NeedsReview,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ComplianceStatus::Approved => "approved",
            ComplianceStatus::Failed => "failed",
            ComplianceStatus::NeedsReview => "needs_review",
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Recognized e-commerce platforms with dedicated selector sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Amazon,
    Flipkart,
    BigBasket,
}

impl Platform {
    /// The marketplace's own brand name, excluded as an Organization-schema
    /// manufacturer candidate.
    pub fn brand_name(self) -> &'static str {
        match self {
            Platform::Amazon => "Amazon",
            Platform::Flipkart => "Flipkart",
            Platform::BigBasket => "BigBasket",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.brand_name())
    }
}

/// Where a submission came from, with the metadata the quality layer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LabelSource {
    Ocr {
        confidence: f64,
        image_width: u32,
        image_height: u32,
    },
    Page {
        url: Option<String>,
        platform: Option<Platform>,
    },
}

/// The fully normalized and scored result for one submission.
///
/// Created once per submission by the pipeline and never mutated afterwards;
/// downstream consumers treat it as read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedLabel {
    /// Every registry field, sanitized value or `None`.
    pub fields: BTreeMap<FieldId, Option<String>>,
    pub field_confidences: BTreeMap<FieldId, f64>,
    pub compliance_score: u8,
    pub status: ComplianceStatus,
    /// Ordered for display: severity descending, then field name ascending.
    pub violations: Vec<Violation>,
    /// Count of mandatory fields with a non-null value.
    pub fields_present: usize,
    /// Always the fixed mandatory-field count.
    pub fields_total: usize,
    pub source: LabelSource,
    pub checked_at: DateTime<Utc>,
}

impl NormalizedLabel {
    pub fn get(&self, field: FieldId) -> Option<&str> {
        self.fields.get(&field).and_then(|v| v.as_deref())
    }

    pub fn confidence(&self, field: FieldId) -> f64 {
        self.field_confidences.get(&field).copied().unwrap_or(0.0)
    }

    /// Full-label JSON blob for the persistence collaborator.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Per-field confidence JSON blob for the persistence collaborator.
    pub fn confidences_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.field_confidences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn test_sort_violations_severity_then_field() {
        let mut violations = vec![
            Violation {
                field: FieldId::NetQuantity,
                kind: ViolationKind::Format,
                severity: Severity::Medium,
                message: String::new(),
            },
            Violation {
                field: FieldId::Manufacturer,
                kind: ViolationKind::Missing,
                severity: Severity::High,
                message: String::new(),
            },
            Violation {
                field: FieldId::CountryOfOrigin,
                kind: ViolationKind::Missing,
                severity: Severity::High,
                message: String::new(),
            },
        ];
        sort_violations(&mut violations);
        assert_eq!(violations[0].field, FieldId::CountryOfOrigin);
        assert_eq!(violations[1].field, FieldId::Manufacturer);
        assert_eq!(violations[2].field, FieldId::NetQuantity);
    }

    #[test]
    fn test_status_coercion() {
        assert_eq!(
            ComplianceStatus::from_name("approved"),
            ComplianceStatus::Approved
        );
        assert_eq!(
            ComplianceStatus::from_name("FAILED"),
            ComplianceStatus::Failed
        );
        assert_eq!(
            ComplianceStatus::from_name("something-else"),
            ComplianceStatus::NeedsReview
        );
    }

    #[test]
    fn test_status_serde_names() {
        let json = serde_json::to_string(&ComplianceStatus::NeedsReview).unwrap();
        assert_eq!(json, "\"needs_review\"");
    }
}
