//! Completeness checks: required segments and required fields.

use crate::models::{PATIENT_SEGMENT, ParsedMessage, VISIT_SEGMENT};

use super::models::{CheckResult, Issue, IssueCategory, Severity};
use super::patterns::{FieldPatterns, SEX_CODES, populated};

/// Header fields that must carry a value: (field number, name).
const REQUIRED_HEADER_FIELDS: &[(usize, &str)] = &[
    (3, "Sending Application"),
    (4, "Sending Facility"),
    (5, "Receiving Application"),
    (6, "Receiving Facility"),
    (9, "Message Type"),
    (10, "Message Control ID"),
    (12, "Version ID"),
];

const MISSING_HEADER_PENALTY: u32 = 20;
const MISSING_HEADER_FIELD_PENALTY: u32 = 2;
const INVALID_TIMESTAMP_PENALTY: u32 = 1;
const MISSING_PID_PENALTY: u32 = 15;
const MISSING_PV1_PENALTY: u32 = 10;

/// Checks the MSH segment and its routing, identification, and timestamp
/// fields.
pub fn check_header_completeness(message: &ParsedMessage) -> CheckResult {
    let mut result = CheckResult::new();

    let Some(msh) = message.header() else {
        result.push(
            Issue::new(
                IssueCategory::Completeness,
                Severity::Critical,
                "MSH",
                "Missing MSH segment",
            )
            .with_details("The message header carries routing and identification data")
            .with_recommendation("Start every message with an MSH segment"),
            MISSING_HEADER_PENALTY,
        );
        return result;
    };

    for &(number, name) in REQUIRED_HEADER_FIELDS {
        if populated(msh, number).is_none() {
            result.push(
                Issue::new(
                    IssueCategory::Completeness,
                    Severity::High,
                    format!("MSH-{}", number),
                    format!("Missing {}", name),
                )
                .with_details(format!(
                    "MSH-{} ({}) is required for routing and acknowledgment",
                    number, name
                ))
                .with_recommendation(format!("Populate MSH-{} ({})", number, name)),
                MISSING_HEADER_FIELD_PENALTY,
            );
        }
    }

    match populated(msh, 7) {
        None => result.push(
            Issue::new(
                IssueCategory::Completeness,
                Severity::High,
                "MSH-7",
                "Missing message timestamp",
            )
            .with_details("MSH-7 records when the message was created")
            .with_recommendation("Populate MSH-7 with the message creation time"),
            MISSING_HEADER_FIELD_PENALTY,
        ),
        Some(timestamp) if !FieldPatterns::instance().header_timestamp.is_match(timestamp) => {
            result.push(
                Issue::new(
                    IssueCategory::Formatting,
                    Severity::Medium,
                    "MSH-7",
                    "Invalid message timestamp format",
                )
                .with_details("MSH-7 should be YYYYMMDDHHMMSS[.SSSS][+/-ZZZZ]")
                .with_recommendation("Use the full HL7 timestamp format YYYYMMDDHHMMSS"),
                INVALID_TIMESTAMP_PENALTY,
            );
        }
        Some(_) => {}
    }

    result
}

/// Checks that ADT messages carry patient and visit segments.
pub fn check_required_segments(message: &ParsedMessage) -> CheckResult {
    let mut result = CheckResult::new();

    if !message.is_message_type("ADT") {
        return result;
    }

    if !message.has_segment(PATIENT_SEGMENT) {
        result.push(
            Issue::new(
                IssueCategory::Completeness,
                Severity::Critical,
                PATIENT_SEGMENT,
                "Missing PID segment",
            )
            .with_details("ADT messages must identify the patient")
            .with_recommendation("Add a PID segment with patient identification"),
            MISSING_PID_PENALTY,
        );
    }

    if !message.has_segment(VISIT_SEGMENT) {
        result.push(
            Issue::new(
                IssueCategory::Completeness,
                Severity::High,
                VISIT_SEGMENT,
                "Missing PV1 segment",
            )
            .with_details("ADT messages describe an encounter in the PV1 segment")
            .with_recommendation("Add a PV1 segment with visit information"),
            MISSING_PV1_PENALTY,
        );
    }

    if !result.issues.is_empty() {
        result.recommend("Include every segment required by the message type");
    }

    result
}

/// Checks the core demographics of the PID segment.
///
/// Nothing is reported when the message has no PID segment; the missing
/// segment itself is reported by [`check_required_segments`].
pub fn check_patient_completeness(message: &ParsedMessage) -> CheckResult {
    let mut result = CheckResult::new();

    let Some(pid) = message.segment(PATIENT_SEGMENT) else {
        return result;
    };

    if populated(pid, 5).is_none() {
        result.push(
            Issue::new(
                IssueCategory::Completeness,
                Severity::High,
                "PID-5",
                "Missing patient name",
            )
            .with_details("The patient name is needed to match records")
            .with_recommendation("Populate PID-5 with the patient name"),
            5,
        );
    }

    if populated(pid, 3).is_none() {
        result.push(
            Issue::new(
                IssueCategory::Completeness,
                Severity::High,
                "PID-3",
                "Missing patient identifier",
            )
            .with_details("Without an identifier the message cannot be linked to a patient")
            .with_recommendation("Populate PID-3 with at least one patient identifier"),
            5,
        );
    }

    match populated(pid, 7) {
        None => result.push(
            Issue::new(
                IssueCategory::Completeness,
                Severity::Medium,
                "PID-7",
                "Missing date of birth",
            )
            .with_details("Date of birth is used for patient matching and dosing")
            .with_recommendation("Populate PID-7 with the date of birth"),
            3,
        ),
        Some(birth_date) if !FieldPatterns::instance().birth_date.is_match(birth_date) => {
            result.push(
                Issue::new(
                    IssueCategory::Formatting,
                    Severity::Medium,
                    "PID-7",
                    "Invalid date of birth format",
                )
                .with_details("PID-7 should be YYYYMMDD with optional time and offset")
                .with_recommendation("Use the HL7 date format YYYYMMDD for PID-7"),
                2,
            );
        }
        Some(_) => {}
    }

    match populated(pid, 8) {
        None => result.push(
            Issue::new(
                IssueCategory::Completeness,
                Severity::Low,
                "PID-8",
                "Missing administrative sex",
            )
            .with_details("Administrative sex supports clinical reference ranges")
            .with_recommendation("Populate PID-8 with a code from HL7 table 0001"),
            1,
        ),
        Some(sex) if !SEX_CODES.contains(&sex) => {
            result.push(
                Issue::new(
                    IssueCategory::Accuracy,
                    Severity::Medium,
                    "PID-8",
                    "Invalid administrative sex code",
                )
                .with_details("PID-8 must be one of M, F, O, U, A")
                .with_recommendation("Map administrative sex to HL7 table 0001 codes"),
                2,
            );
        }
        Some(_) => {}
    }

    result
}
