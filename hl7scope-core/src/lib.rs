//! Core data structures and analysis engine for hl7scope.
//!
//! This crate parses HL7 v2 messages into a segment/field model and scores
//! their data quality with a battery of rule checks. It is shared by the
//! `hl7scope` command-line tool and can be embedded directly.
//!
//! # Guarantees
//! - Analysis is a pure function of the message text and configuration
//! - Malformed input produces a failure-shaped report, never a panic
//! - Field values are never written to logs
//!
//! # Architecture
//! - `parser`: structural gate and default [`MessageParser`] implementation
//! - `quality`: check battery, aggregation and the [`QualityAnalyzer`] facade
//! - `samples`: built-in example messages

pub mod error;
pub mod logging;
pub mod models;
pub mod parser;
pub mod quality;
pub mod samples;

// Re-export commonly used types
pub use error::{Hl7ScopeError, Result};
pub use logging::init_logging;
pub use models::{EncodingCharacters, ParsedMessage, Segment};
pub use parser::{Hl7Parser, MessageParser, StructureValidation};
pub use quality::{
    CheckId, Issue, IssueCategory, QualityAnalyzer, QualityConfig, QualityReport,
    RecommendationSource, Severity, analyze_data_quality,
};
