//! Formatting checks for dates, identifiers, addresses, and phone numbers.
//!
//! These are heuristics. A value that fails a pattern is reported as a
//! formatting issue; it is not proof that the value is wrong.

use crate::models::{
    EVENT_SEGMENT, EncodingCharacters, HEADER_SEGMENT, PATIENT_SEGMENT, ParsedMessage, Segment,
    VISIT_SEGMENT,
};

use super::models::{CheckResult, Issue, IssueCategory, Severity};
use super::patterns::{FieldPatterns, populated};

/// Date/time fields covered by the date sweep: (segment, field, name).
const DATE_FIELDS: &[(&str, usize, &str)] = &[
    (HEADER_SEGMENT, 7, "Message Timestamp"),
    (EVENT_SEGMENT, 2, "Recorded Date/Time"),
    (PATIENT_SEGMENT, 7, "Date of Birth"),
    (PATIENT_SEGMENT, 29, "Patient Death Date"),
    (VISIT_SEGMENT, 44, "Admit Date/Time"),
    (VISIT_SEGMENT, 45, "Discharge Date/Time"),
];

/// Phone fields: (field number, name).
const PHONE_FIELDS: &[(usize, &str)] = &[(13, "home phone"), (14, "business phone")];

/// Checks every known date/time field against the HL7 date pattern.
/// Fractional seconds are not accepted here, including in MSH-7.
pub fn check_date_formats(message: &ParsedMessage) -> CheckResult {
    let patterns = FieldPatterns::instance();
    let mut result = CheckResult::new();

    for &(segment_type, number, name) in DATE_FIELDS {
        let Some(value) = message
            .segment(segment_type)
            .and_then(|segment| populated(segment, number))
        else {
            continue;
        };

        if !patterns.hl7_date.is_match(value) {
            result.push(
                Issue::new(
                    IssueCategory::Formatting,
                    Severity::Medium,
                    format!("{}-{}", segment_type, number),
                    "Invalid date format",
                )
                .with_details(format!(
                    "{} should be YYYYMMDD[HHMM[SS]] with an optional +/-ZZZZ offset",
                    name
                ))
                .with_recommendation("Use HL7 date/time format YYYYMMDDHHMMSS"),
                1,
            );
        }
    }

    result
}

/// Checks the social security number in PID-19.
pub fn check_identifier_format(message: &ParsedMessage) -> CheckResult {
    let mut result = CheckResult::new();

    let Some(ssn) = message
        .segment(PATIENT_SEGMENT)
        .and_then(|pid| populated(pid, 19))
    else {
        return result;
    };

    if !FieldPatterns::instance().ssn.is_match(ssn) {
        result.push(
            Issue::new(
                IssueCategory::Formatting,
                Severity::Medium,
                "PID-19",
                "Invalid SSN format",
            )
            .with_details("PID-19 should contain nine digits, optionally as XXX-XX-XXXX")
            .with_recommendation("Use the format XXX-XX-XXXX for social security numbers"),
            2,
        );
    }

    result
}

/// Checks that the PID-11 address is split into XAD components.
pub fn check_address_format(message: &ParsedMessage) -> CheckResult {
    let mut result = CheckResult::new();

    let Some(address) = message
        .segment(PATIENT_SEGMENT)
        .and_then(|pid| populated(pid, 11))
    else {
        return result;
    };

    if !address.contains(message.encoding.component) {
        result.push(
            Issue::new(
                IssueCategory::Formatting,
                Severity::Low,
                "PID-11",
                "Unstructured patient address",
            )
            .with_details("The address is free text instead of street, city, state and zip components")
            .with_recommendation("Send addresses as XAD components (street^other^city^state^zip)"),
            1,
        );
    }

    result
}

/// Extracts the dialable part of an XTN value.
///
/// Uses the first component when present, otherwise the country, area and
/// local number components (XTN.5 to XTN.7) joined together.
fn phone_number(segment: &Segment, number: usize, encoding: &EncodingCharacters) -> Option<String> {
    if let Some(first) = segment.component(number, 1, encoding) {
        return Some(first.to_string());
    }

    let parts: Vec<&str> = (5..=7)
        .filter_map(|c| segment.component(number, c, encoding))
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Checks the telephone numbers in PID-13 and PID-14.
pub fn check_phone_format(message: &ParsedMessage) -> CheckResult {
    let mut result = CheckResult::new();

    let Some(pid) = message.segment(PATIENT_SEGMENT) else {
        return result;
    };

    for &(number, name) in PHONE_FIELDS {
        if populated(pid, number).is_none() {
            continue;
        }

        let valid = phone_number(pid, number, &message.encoding)
            .is_some_and(|phone| FieldPatterns::instance().phone.is_match(phone.trim()));

        if !valid {
            result.push(
                Issue::new(
                    IssueCategory::Formatting,
                    Severity::Low,
                    format!("PID-{}", number),
                    format!("Invalid {} format", name),
                )
                .with_details("The value does not look like a telephone number")
                .with_recommendation("Use a consistent phone format such as (555)555-1234"),
                1,
            );
        }
    }

    result
}
