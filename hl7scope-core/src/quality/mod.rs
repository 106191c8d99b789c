//! HL7 message quality assessment module.
//!
//! A message goes through three stages:
//! - **Structural gate**: rejects text that is not minimally HL7-shaped
//! - **Check battery**: ten independent rule checks, run in a fixed order
//! - **Aggregation**: issues are concatenated, penalties summed, and the
//!   score clamped to `[0, 100]`
//!
//! Checks cover completeness, formatting, consistency, business rules and
//! version compliance. Each issue carries a severity, the offending field and
//! a remediation hint.
//!
//! # Example
//! ```rust
//! use hl7scope_core::quality::analyze_data_quality;
//!
//! let report = analyze_data_quality("MSH|^~\\&|APP|FAC|RCV|DEST|20240115103000||ORU^R01|1|P|2.5");
//! assert!(report.is_valid);
//! assert!(report.overall_score <= 100);
//! ```

mod aggregate;
mod analyzer;
mod battery;
mod business_rules;
mod completeness;
mod compliance;
mod config;
mod consistency;
mod formatting;
mod models;
mod patterns;

// Re-export public API
pub use aggregate::{MAX_SCORE, aggregate, score_from_penalty};
pub use analyzer::QualityAnalyzer;
pub use battery::{CheckFn, CheckId, UnknownCheckError};
pub use config::{
    ConfigValidationError, DEFAULT_STRUCTURAL_PENALTY, QualityConfig, RecommendationSource,
};
pub use models::{CheckResult, Issue, IssueCategory, QualityReport, Severity};
pub use patterns::{PATIENT_CLASS_CODES, SEX_CODES, SUPPORTED_VERSIONS};

/// Analyzes a message with the default configuration and built-in parser.
pub fn analyze_data_quality(raw: &str) -> QualityReport {
    QualityAnalyzer::with_defaults().analyze(raw)
}
