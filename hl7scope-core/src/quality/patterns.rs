//! Field format rules shared by the quality checks.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::models::Segment;

/// Administrative sex codes (HL7 table 0001).
pub const SEX_CODES: &[&str] = &["M", "F", "O", "U", "A"];

/// Patient class codes (HL7 table 0004).
pub const PATIENT_CLASS_CODES: &[&str] = &["I", "O", "E", "P", "R", "B", "N", "U"];

/// HL7 v2 version identifiers accepted in MSH-12.
pub const SUPPORTED_VERSIONS: &[&str] = &[
    "2.1", "2.2", "2.3", "2.3.1", "2.4", "2.5", "2.5.1", "2.6", "2.7", "2.7.1", "2.8", "2.8.1",
    "2.8.2",
];

/// Pre-compiled field format patterns.
///
/// Uses `OnceLock` for thread-safe lazy initialization.
pub struct FieldPatterns {
    /// Full message timestamp: 14 digits, optional fraction and offset
    pub header_timestamp: Regex,
    /// Birth date: 8 digits, optional time, fraction and offset
    pub birth_date: Regex,
    /// Generic HL7 date/time: 8 to 14 digits, optional offset
    pub hl7_date: Regex,
    /// Social security number with optional dashes
    pub ssn: Regex,
    /// Permissive telephone number
    pub phone: Regex,
}

impl FieldPatterns {
    /// Gets the singleton instance of pre-compiled patterns.
    pub fn instance() -> &'static Self {
        static PATTERNS: OnceLock<FieldPatterns> = OnceLock::new();
        PATTERNS.get_or_init(Self::compile)
    }

    fn compile() -> Self {
        Self {
            header_timestamp: Regex::new(r"^\d{14}(\.\d{1,4})?([+-]\d{4})?$")
                .expect("Invalid header timestamp pattern"),
            birth_date: Regex::new(r"^\d{8}(\d{6})?(\d{1,4})?([+-]\d{4})?$")
                .expect("Invalid birth date pattern"),
            hl7_date: Regex::new(r"^\d{8,14}([+-]\d{4})?$").expect("Invalid date pattern"),
            ssn: Regex::new(r"^\d{3}-?\d{2}-?\d{4}$").expect("Invalid SSN pattern"),
            phone: Regex::new(r"(?i)^\+?[\d\s().\-]{7,}(\s*(x|ext\.?)\s*\d+)?$")
                .expect("Invalid phone pattern"),
        }
    }
}

/// Returns true for values that carry no data: blank, or the HL7 explicit
/// null `""`.
pub fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == "\"\""
}

/// Returns the trimmed value of a field unless it is absent or a placeholder.
pub fn populated(segment: &Segment, number: usize) -> Option<&str> {
    segment
        .field(number)
        .filter(|v| !is_placeholder(v))
        .map(str::trim)
}

/// Parses the calendar date part (first 8 digits) of an HL7 date/time.
///
/// Time of day and offset are ignored. Returns `None` when the value is too
/// short or not a real date, in which case callers skip the comparison.
pub fn parse_hl7_date(value: &str) -> Option<NaiveDate> {
    let date = value.trim().get(..8)?;
    if !date.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(date, "%Y%m%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_timestamp_pattern() {
        let p = &FieldPatterns::instance().header_timestamp;
        assert!(p.is_match("20240115103000"));
        assert!(p.is_match("20240115103000.1234"));
        assert!(p.is_match("20240115103000-0500"));
        assert!(p.is_match("20240115103000.5+0100"));
        assert!(!p.is_match("20240115"));
        assert!(!p.is_match("2024-01-15T10:30:00"));
        assert!(!p.is_match("20240115103000.12345"));
    }

    #[test]
    fn test_birth_date_pattern() {
        let p = &FieldPatterns::instance().birth_date;
        assert!(p.is_match("19800115"));
        assert!(p.is_match("19800115083000"));
        assert!(p.is_match("19800115-0500"));
        assert!(!p.is_match("1980/01/15"));
        assert!(!p.is_match("198001"));
    }

    #[test]
    fn test_hl7_date_pattern() {
        let p = &FieldPatterns::instance().hl7_date;
        assert!(p.is_match("20240115"));
        assert!(p.is_match("202401151030"));
        assert!(p.is_match("20240115103000+0000"));
        assert!(!p.is_match("2024011"));
        assert!(!p.is_match("202401151030001"));
        assert!(!p.is_match("01/15/2024"));
    }

    #[test]
    fn test_ssn_pattern() {
        let p = &FieldPatterns::instance().ssn;
        assert!(p.is_match("123-45-6789"));
        assert!(p.is_match("123456789"));
        assert!(!p.is_match("12-345-6789"));
        assert!(!p.is_match("123-45-678"));
    }

    #[test]
    fn test_phone_pattern() {
        let p = &FieldPatterns::instance().phone;
        assert!(p.is_match("(555)555-1234"));
        assert!(p.is_match("555-555-1234"));
        assert!(p.is_match("+1 555 555 1234"));
        assert!(p.is_match("555.555.1234 x42"));
        assert!(p.is_match("5555551234 EXT 7"));
        assert!(!p.is_match("CALL ME"));
        assert!(!p.is_match("555-12"));
    }

    #[test]
    fn test_placeholder_detection() {
        assert!(is_placeholder(""));
        assert!(is_placeholder("   "));
        assert!(is_placeholder("\"\""));
        assert!(!is_placeholder("EPIC"));
    }

    #[test]
    fn test_populated_filters_placeholders() {
        let segment = Segment::new("MSH")
            .with_field(3, "EPIC")
            .with_field(4, "\"\"")
            .with_field(5, "  LAB ");

        assert_eq!(populated(&segment, 3), Some("EPIC"));
        assert_eq!(populated(&segment, 4), None);
        assert_eq!(populated(&segment, 5), Some("LAB"));
        assert_eq!(populated(&segment, 6), None);
    }

    #[test]
    fn test_parse_hl7_date() {
        assert_eq!(
            parse_hl7_date("20240110"),
            NaiveDate::from_ymd_opt(2024, 1, 10)
        );
        // Time of day is ignored
        assert_eq!(
            parse_hl7_date("20240110235959-0500"),
            NaiveDate::from_ymd_opt(2024, 1, 10)
        );
        assert_eq!(parse_hl7_date("2024011"), None);
        assert_eq!(parse_hl7_date("20241345"), None);
        assert_eq!(parse_hl7_date("2024/01/10"), None);
        assert_eq!(parse_hl7_date("日本語テキスト"), None);
    }
}
