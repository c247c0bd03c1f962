//! Deterministic compliance scoring and status classification.
//!
//! The score is a presence ratio over the six mandatory fields, reduced by a
//! penalty when the mean extraction confidence of the present fields falls
//! below a comfort floor. Absent fields are excluded from the mean; absence
//! is already penalized through the presence ratio and the violation set.

use std::collections::BTreeMap;

use crate::model::{ComplianceStatus, Severity, Violation};
use crate::schema::{FieldId, MANDATORY_FIELD_COUNT};

/// Mean confidence below this mark starts drawing a score penalty.
pub const CONFIDENCE_COMFORT_FLOOR: f64 = 0.6;
/// Penalty points per unit of confidence shortfall: 18 points at zero
/// confidence, zero points at the comfort floor.
pub const CONFIDENCE_PENALTY_SCALE: f64 = 30.0;
/// Mean confidence a violation-free label needs for outright approval.
pub const APPROVE_CONFIDENCE_BAR: f64 = 0.7;
/// Fraction of mandatory fields that keeps a label with missing fields in
/// review instead of failing it outright.
pub const REVIEW_PRESENCE_RATIO: f64 = 0.7;

/// Scoring result for one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Scored {
    pub compliance_score: u8,
    pub status: ComplianceStatus,
    pub fields_present: usize,
    pub fields_total: usize,
    pub avg_confidence: f64,
}

/// Score normalized fields. Pure function; a single extraction pass is
/// authoritative and no retries occur.
pub fn score(
    fields: &BTreeMap<FieldId, Option<String>>,
    confidences: &BTreeMap<FieldId, f64>,
    violations: &[Violation],
) -> Scored {
    let total = MANDATORY_FIELD_COUNT;

    let present_fields: Vec<FieldId> = FieldId::MANDATORY
        .iter()
        .copied()
        .filter(|id| fields.get(id).map(|v| v.is_some()).unwrap_or(false))
        .collect();
    let present = present_fields.len();

    let base_score = present as f64 / total as f64 * 100.0;

    let avg_confidence = if present == 0 {
        0.0
    } else {
        let sum: f64 = present_fields
            .iter()
            .map(|id| confidences.get(id).copied().unwrap_or(0.0))
            .sum();
        sum / present as f64
    };

    let confidence_penalty =
        ((CONFIDENCE_COMFORT_FLOOR - avg_confidence) * CONFIDENCE_PENALTY_SCALE).max(0.0);

    let compliance_score = (base_score - confidence_penalty).max(0.0).round().min(100.0) as u8;

    let high_violations = violations
        .iter()
        .filter(|v| v.severity == Severity::High)
        .count();

    let status = if high_violations == 0 {
        if avg_confidence > APPROVE_CONFIDENCE_BAR {
            ComplianceStatus::Approved
        } else {
            ComplianceStatus::NeedsReview
        }
    } else if present as f64 >= REVIEW_PRESENCE_RATIO * total as f64 {
        ComplianceStatus::NeedsReview
    } else {
        ComplianceStatus::Failed
    };

    Scored {
        compliance_score,
        status,
        fields_present: present,
        fields_total: total,
        avg_confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ViolationKind;

    fn fields_with(present: &[(FieldId, f64)]) -> (BTreeMap<FieldId, Option<String>>, BTreeMap<FieldId, f64>) {
        let mut fields = BTreeMap::new();
        let mut confidences = BTreeMap::new();
        for id in FieldId::ALL {
            fields.insert(id, None);
            confidences.insert(id, 0.0);
        }
        for (id, confidence) in present {
            fields.insert(*id, Some("value".to_string()));
            confidences.insert(*id, *confidence);
        }
        (fields, confidences)
    }

    fn missing_violation(field: FieldId) -> Violation {
        Violation {
            field,
            kind: ViolationKind::Missing,
            severity: Severity::High,
            message: String::new(),
        }
    }

    fn all_present(confidence: f64) -> (BTreeMap<FieldId, Option<String>>, BTreeMap<FieldId, f64>) {
        let entries: Vec<(FieldId, f64)> = FieldId::MANDATORY
            .iter()
            .map(|id| (*id, confidence))
            .collect();
        fields_with(&entries)
    }

    #[test]
    fn test_all_present_high_confidence_approved_at_100() {
        let (fields, confidences) = all_present(0.9);
        let result = score(&fields, &confidences, &[]);
        assert_eq!(result.compliance_score, 100);
        assert_eq!(result.status, ComplianceStatus::Approved);
        assert_eq!(result.fields_present, 6);
        assert_eq!(result.fields_total, 6);
    }

    #[test]
    fn test_one_missing_field_needs_review_at_83() {
        let entries: Vec<(FieldId, f64)> = FieldId::MANDATORY
            .iter()
            .filter(|id| **id != FieldId::Manufacturer)
            .map(|id| (*id, 0.8))
            .collect();
        let (fields, confidences) = fields_with(&entries);
        let violations = vec![missing_violation(FieldId::Manufacturer)];

        let result = score(&fields, &confidences, &violations);
        assert_eq!(result.fields_present, 5);
        assert_eq!(result.compliance_score, 83);
        assert_eq!(result.status, ComplianceStatus::NeedsReview);
    }

    #[test]
    fn test_all_absent_fails_at_zero() {
        let (fields, confidences) = fields_with(&[]);
        let violations: Vec<Violation> =
            FieldId::MANDATORY.iter().map(|id| missing_violation(*id)).collect();

        let result = score(&fields, &confidences, &violations);
        assert_eq!(result.compliance_score, 0);
        assert_eq!(result.avg_confidence, 0.0);
        assert_eq!(result.status, ComplianceStatus::Failed);
    }

    #[test]
    fn test_low_confidence_draws_penalty() {
        // All present at 0.2 confidence: base 100, penalty (0.6-0.2)*30 = 12.
        let (fields, confidences) = all_present(0.2);
        let result = score(&fields, &confidences, &[]);
        assert_eq!(result.compliance_score, 88);
        assert_eq!(result.status, ComplianceStatus::NeedsReview);
    }

    #[test]
    fn test_no_penalty_at_comfort_floor() {
        let (fields, confidences) = all_present(CONFIDENCE_COMFORT_FLOOR);
        let result = score(&fields, &confidences, &[]);
        assert_eq!(result.compliance_score, 100);
    }

    #[test]
    fn test_confidence_just_above_bar_approves() {
        let (fields, confidences) = all_present(0.71);
        let result = score(&fields, &confidences, &[]);
        assert_eq!(result.status, ComplianceStatus::Approved);

        let (fields, confidences) = all_present(0.7);
        let result = score(&fields, &confidences, &[]);
        assert_eq!(result.status, ComplianceStatus::NeedsReview);
    }

    #[test]
    fn test_absent_fields_do_not_drag_the_mean() {
        // One field present at full confidence, five missing: the mean stays
        // 1.0 and the missing-field penalty is carried by the base score.
        let (fields, confidences) = fields_with(&[(FieldId::Mrp, 1.0)]);
        let violations: Vec<Violation> = FieldId::MANDATORY
            .iter()
            .filter(|id| **id != FieldId::Mrp)
            .map(|id| missing_violation(*id))
            .collect();

        let result = score(&fields, &confidences, &violations);
        assert_eq!(result.avg_confidence, 1.0);
        // base 16.67, no confidence penalty
        assert_eq!(result.compliance_score, 17);
        assert_eq!(result.status, ComplianceStatus::Failed);
    }

    #[test]
    fn test_five_present_with_missing_field_reviews_not_fails() {
        let entries: Vec<(FieldId, f64)> = FieldId::MANDATORY
            .iter()
            .take(5)
            .map(|id| (*id, 0.8))
            .collect();
        let (fields, confidences) = fields_with(&entries);
        let violations = vec![missing_violation(FieldId::CountryOfOrigin)];
        let result = score(&fields, &confidences, &violations);
        assert_eq!(result.status, ComplianceStatus::NeedsReview);

        // Four present falls below the 0.7 presence ratio and fails.
        let entries: Vec<(FieldId, f64)> = FieldId::MANDATORY
            .iter()
            .take(4)
            .map(|id| (*id, 0.8))
            .collect();
        let (fields, confidences) = fields_with(&entries);
        let result = score(&fields, &confidences, &violations);
        assert_eq!(result.status, ComplianceStatus::Failed);
    }

    #[test]
    fn test_score_always_within_bounds() {
        for present_count in 0..=6 {
            for confidence in [0.0, 0.3, 0.6, 0.9, 1.0] {
                let entries: Vec<(FieldId, f64)> = FieldId::MANDATORY
                    .iter()
                    .take(present_count)
                    .map(|id| (*id, confidence))
                    .collect();
                let (fields, confidences) = fields_with(&entries);
                let result = score(&fields, &confidences, &[]);
                assert!(result.compliance_score <= 100);
            }
        }
    }

    #[test]
    fn test_filling_a_missing_field_never_lowers_the_score() {
        // Monotonicity: converting any one missing mandatory field to a
        // valid present value cannot decrease the score.
        let entries: Vec<(FieldId, f64)> = FieldId::MANDATORY
            .iter()
            .take(3)
            .map(|id| (*id, 0.8))
            .collect();
        let (fields, confidences) = fields_with(&entries);
        let before = score(&fields, &confidences, &[]);

        for id in FieldId::MANDATORY.iter().skip(3) {
            let mut filled = entries.clone();
            filled.push((*id, 0.8));
            let (fields, confidences) = fields_with(&filled);
            let after = score(&fields, &confidences, &[]);
            assert!(after.compliance_score >= before.compliance_score);
        }
    }
}
