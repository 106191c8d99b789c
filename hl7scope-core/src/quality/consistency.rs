//! Cross-segment consistency checks.

use crate::models::{PATIENT_SEGMENT, ParsedMessage, VISIT_SEGMENT};

use super::models::{CheckResult, Issue, IssueCategory, Severity};
use super::patterns::{PATIENT_CLASS_CODES, populated};

/// Checks that the visit's patient class is a known code.
///
/// Only applies when both PID and PV1 are present.
pub fn check_patient_class_consistency(message: &ParsedMessage) -> CheckResult {
    let mut result = CheckResult::new();

    if !message.has_segment(PATIENT_SEGMENT) {
        return result;
    }
    let Some(patient_class) = message
        .segment(VISIT_SEGMENT)
        .and_then(|pv1| populated(pv1, 2))
    else {
        return result;
    };

    if !PATIENT_CLASS_CODES.contains(&patient_class) {
        result.push(
            Issue::new(
                IssueCategory::Consistency,
                Severity::Medium,
                "PV1-2",
                "Invalid patient class",
            )
            .with_details("PV1-2 must be one of I, O, E, P, R, B, N, U")
            .with_recommendation("Map patient class to HL7 table 0004 codes"),
            2,
        );
    }

    result
}
