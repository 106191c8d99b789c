//! Standard compliance checks.

use crate::models::ParsedMessage;

use super::models::{CheckResult, Issue, IssueCategory, Severity};
use super::patterns::{SUPPORTED_VERSIONS, populated};

/// Checks that MSH-12 names a standard HL7 v2 version.
///
/// Only the version identifier component is compared, so `2.5^USA` is
/// accepted.
pub fn check_version_compliance(message: &ParsedMessage) -> CheckResult {
    let mut result = CheckResult::new();

    let Some(msh) = message.header() else {
        return result;
    };
    if populated(msh, 12).is_none() {
        return result;
    }

    let version = msh
        .component(12, 1, &message.encoding)
        .map(str::trim)
        .unwrap_or_default();

    if !SUPPORTED_VERSIONS.contains(&version) {
        result.push(
            Issue::new(
                IssueCategory::Compliance,
                Severity::Medium,
                "MSH-12",
                "Unsupported HL7 version",
            )
            .with_details(format!(
                "MSH-12 should be one of: {}",
                SUPPORTED_VERSIONS.join(", ")
            ))
            .with_recommendation("Declare a standard HL7 v2 version in MSH-12"),
            2,
        );
        result.recommend("Align the sending system with a supported HL7 v2 version");
    }

    result
}
