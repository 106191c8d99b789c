//! Clinical and administrative business rules.

use crate::models::{PATIENT_SEGMENT, ParsedMessage, Segment, VISIT_SEGMENT};

use super::models::{CheckResult, Issue, IssueCategory, Severity};
use super::patterns::{parse_hl7_date, populated};

const DATE_ORDER_PENALTY: u32 = 5;

/// Returns true when both dates parse and `later` falls before `earlier`.
///
/// Only calendar dates are compared. Unparsable values skip the comparison.
fn precedes(segment: &Segment, earlier: usize, later: usize) -> bool {
    let earlier = populated(segment, earlier).and_then(parse_hl7_date);
    let later = populated(segment, later).and_then(parse_hl7_date);
    matches!((earlier, later), (Some(e), Some(l)) if l < e)
}

/// Checks that discharge follows admission and death follows birth.
pub fn check_business_rules(message: &ParsedMessage) -> CheckResult {
    let mut result = CheckResult::new();

    if let Some(pv1) = message.segment(VISIT_SEGMENT)
        && precedes(pv1, 44, 45)
    {
        result.push(
            Issue::new(
                IssueCategory::BusinessRules,
                Severity::High,
                "PV1-45",
                "Discharge date before admit date",
            )
            .with_details("PV1-45 (discharge) falls before PV1-44 (admit)")
            .with_recommendation("Correct the admit or discharge date of the visit"),
            DATE_ORDER_PENALTY,
        );
    }

    if let Some(pid) = message.segment(PATIENT_SEGMENT)
        && precedes(pid, 7, 29)
    {
        result.push(
            Issue::new(
                IssueCategory::BusinessRules,
                Severity::High,
                "PID-29",
                "Death date before birth date",
            )
            .with_details("PID-29 (death) falls before PID-7 (birth)")
            .with_recommendation("Correct the birth or death date of the patient"),
            DATE_ORDER_PENALTY,
        );
    }

    if !result.issues.is_empty() {
        result.recommend("Verify the chronological order of clinical dates");
    }

    result
}
