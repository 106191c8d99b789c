//! Registry of quality checks.
//!
//! Every check is a plain function with the [`CheckFn`] signature. Checks
//! are independent of each other and read-only over the message, so their
//! results can be combined in any grouping; the engine runs them in
//! [`CheckId::ALL`] order to keep issue order stable.
//!
//! Adding a check means adding a [`CheckId`] variant and its function here.
//! The exhaustive matches below make the compiler point at every place that
//! needs updating.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::ParsedMessage;

use super::business_rules::check_business_rules;
use super::completeness::{
    check_header_completeness, check_patient_completeness, check_required_segments,
};
use super::compliance::check_version_compliance;
use super::consistency::check_patient_class_consistency;
use super::formatting::{
    check_address_format, check_date_formats, check_identifier_format, check_phone_format,
};
use super::models::CheckResult;

/// Signature shared by every quality check.
pub type CheckFn = fn(&ParsedMessage) -> CheckResult;

/// Stable identifier of a quality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckId {
    /// MSH presence and required header fields
    HeaderCompleteness,
    /// Segments required by the message type
    RequiredSegments,
    /// Required PID demographics
    PatientCompleteness,
    /// Date/time field formats across segments
    DateFormats,
    /// Social security number format
    IdentifierFormat,
    /// Structured patient address
    AddressFormat,
    /// Telephone number formats
    PhoneFormat,
    /// Patient class code in the visit segment
    PatientClassConsistency,
    /// Chronology of clinical dates
    BusinessRules,
    /// HL7 version identifier
    VersionCompliance,
}

impl CheckId {
    /// Every check in execution order.
    pub const ALL: [CheckId; 10] = [
        CheckId::HeaderCompleteness,
        CheckId::RequiredSegments,
        CheckId::PatientCompleteness,
        CheckId::DateFormats,
        CheckId::IdentifierFormat,
        CheckId::AddressFormat,
        CheckId::PhoneFormat,
        CheckId::PatientClassConsistency,
        CheckId::BusinessRules,
        CheckId::VersionCompliance,
    ];

    /// Returns the function implementing this check.
    pub fn check_fn(self) -> CheckFn {
        match self {
            CheckId::HeaderCompleteness => check_header_completeness,
            CheckId::RequiredSegments => check_required_segments,
            CheckId::PatientCompleteness => check_patient_completeness,
            CheckId::DateFormats => check_date_formats,
            CheckId::IdentifierFormat => check_identifier_format,
            CheckId::AddressFormat => check_address_format,
            CheckId::PhoneFormat => check_phone_format,
            CheckId::PatientClassConsistency => check_patient_class_consistency,
            CheckId::BusinessRules => check_business_rules,
            CheckId::VersionCompliance => check_version_compliance,
        }
    }

    /// Runs this check against a message.
    pub fn run(self, message: &ParsedMessage) -> CheckResult {
        (self.check_fn())(message)
    }

    /// Identifier used in configuration files and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            CheckId::HeaderCompleteness => "header_completeness",
            CheckId::RequiredSegments => "required_segments",
            CheckId::PatientCompleteness => "patient_completeness",
            CheckId::DateFormats => "date_formats",
            CheckId::IdentifierFormat => "identifier_format",
            CheckId::AddressFormat => "address_format",
            CheckId::PhoneFormat => "phone_format",
            CheckId::PatientClassConsistency => "patient_class_consistency",
            CheckId::BusinessRules => "business_rules",
            CheckId::VersionCompliance => "version_compliance",
        }
    }

    /// One-line description of what the check looks at.
    pub fn description(self) -> &'static str {
        match self {
            CheckId::HeaderCompleteness => {
                "MSH present; routing, type, control ID, version and timestamp populated"
            }
            CheckId::RequiredSegments => "ADT messages carry PID and PV1 segments",
            CheckId::PatientCompleteness => "PID name, identifier, birth date and sex are valid",
            CheckId::DateFormats => "MSH-7, EVN-2, PID-7, PID-29, PV1-44, PV1-45 use HL7 date format",
            CheckId::IdentifierFormat => "PID-19 social security number is well formed",
            CheckId::AddressFormat => "PID-11 address is split into components",
            CheckId::PhoneFormat => "PID-13 and PID-14 look like telephone numbers",
            CheckId::PatientClassConsistency => "PV1-2 patient class is a known code",
            CheckId::BusinessRules => "Discharge follows admission; death follows birth",
            CheckId::VersionCompliance => "MSH-12 names a standard HL7 v2 version",
        }
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a check identifier is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown check '{0}'")]
pub struct UnknownCheckError(pub String);

impl FromStr for CheckId {
    type Err = UnknownCheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        CheckId::ALL
            .into_iter()
            .find(|id| id.as_str() == normalized)
            .ok_or_else(|| UnknownCheckError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EncodingCharacters, Segment};

    #[test]
    fn test_all_checks_are_distinct() {
        let mut ids: Vec<&str> = CheckId::ALL.iter().map(|id| id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), CheckId::ALL.len());
    }

    #[test]
    fn test_check_id_from_str() {
        assert_eq!(
            "phone_format".parse::<CheckId>(),
            Ok(CheckId::PhoneFormat)
        );
        assert_eq!(
            "Business-Rules".parse::<CheckId>(),
            Ok(CheckId::BusinessRules)
        );
        assert_eq!(
            "nope".parse::<CheckId>(),
            Err(UnknownCheckError("nope".to_string()))
        );
    }

    #[test]
    fn test_check_id_roundtrip_through_display() {
        for id in CheckId::ALL {
            assert_eq!(id.to_string().parse::<CheckId>(), Ok(id));
        }
    }

    #[test]
    fn test_check_id_serde_matches_as_str() {
        for id in CheckId::ALL {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
    }

    #[test]
    fn test_every_check_tolerates_empty_message() {
        let message = ParsedMessage::new(Vec::new(), EncodingCharacters::default());

        for id in CheckId::ALL {
            let result = id.run(&message);
            // Only the header check reports on a message without MSH
            if id == CheckId::HeaderCompleteness {
                assert_eq!(result.score_penalty, 20);
            } else {
                assert!(result.is_clean(), "{} reported on an empty message", id);
            }
        }
    }

    #[test]
    fn test_every_check_ignores_unrelated_segments() {
        let message = ParsedMessage::new(
            vec![Segment::new("OBX").with_field(5, "7.2")],
            EncodingCharacters::default(),
        );

        for id in CheckId::ALL
            .into_iter()
            .filter(|id| *id != CheckId::HeaderCompleteness)
        {
            assert!(id.run(&message).is_clean(), "{} reported on OBX", id);
        }
    }
}
