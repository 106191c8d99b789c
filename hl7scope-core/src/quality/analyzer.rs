//! Quality analyzer facade.
//!
//! This module provides the main `QualityAnalyzer` that runs the structural
//! gate, parses the message, executes the enabled checks and aggregates the
//! results into a `QualityReport`.

use crate::models::ParsedMessage;
use crate::parser::{Hl7Parser, MessageParser};

use super::aggregate::aggregate;
use super::config::QualityConfig;
use super::models::{CheckResult, QualityReport};

/// Quality analyzer for HL7 v2 messages.
///
/// Analysis never fails from the caller's point of view: structural and
/// parse failures are encoded in the returned report.
///
/// # Example
///
/// ```rust
/// use hl7scope_core::quality::{QualityAnalyzer, QualityConfig};
///
/// let analyzer = QualityAnalyzer::new(QualityConfig::default());
/// let report = analyzer.analyze("not an hl7 message");
///
/// assert!(!report.is_valid);
/// assert_eq!(report.overall_score, 70);
/// ```
#[derive(Debug, Clone)]
pub struct QualityAnalyzer<P: MessageParser = Hl7Parser> {
    config: QualityConfig,
    parser: P,
}

impl QualityAnalyzer<Hl7Parser> {
    /// Creates a new quality analyzer using the built-in parser.
    pub fn new(config: QualityConfig) -> Self {
        Self::with_parser(config, Hl7Parser::new())
    }

    /// Creates a new quality analyzer with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(QualityConfig::default())
    }
}

impl<P: MessageParser> QualityAnalyzer<P> {
    /// Creates a quality analyzer with a custom parser.
    pub fn with_parser(config: QualityConfig, parser: P) -> Self {
        Self { config, parser }
    }

    /// Returns a reference to the analyzer configuration.
    pub fn config(&self) -> &QualityConfig {
        &self.config
    }

    /// Analyzes raw message text and returns a quality report.
    ///
    /// # Arguments
    /// * `raw` - The message text, segments separated by `\r` or `\n`
    pub fn analyze(&self, raw: &str) -> QualityReport {
        let structure = self.parser.validate_structure(raw);
        if !structure.is_valid {
            tracing::warn!(
                "Message failed structural validation: {}",
                structure.errors.join("; ")
            );
            return QualityReport::structural_failure(
                &structure.errors,
                self.config.structural_penalty,
            );
        }

        match self.parser.parse(raw) {
            Ok(message) => self.analyze_parsed(&message),
            Err(e) => {
                tracing::warn!("Message could not be parsed: {}", e);
                QualityReport::parse_failure(&e)
            }
        }
    }

    /// Runs the enabled checks against an already parsed message.
    pub fn analyze_parsed(&self, message: &ParsedMessage) -> QualityReport {
        let results: Vec<CheckResult> = self
            .config
            .active_checks()
            .map(|check| {
                let result = check.run(message);
                tracing::debug!(
                    check = check.as_str(),
                    issues = result.issues.len(),
                    penalty = result.score_penalty,
                    "Check completed"
                );
                result
            })
            .collect();

        let report = aggregate(message, &results, self.config.recommendation_source);

        tracing::info!(
            message_type = report.message_type.as_deref().unwrap_or("unknown"),
            score = report.overall_score,
            issues = report.issues.len(),
            "Quality analysis complete"
        );

        report
    }

    /// Analyzes multiple messages and returns one report per message, in
    /// input order.
    pub fn analyze_all(&self, messages: &[&str]) -> Vec<QualityReport> {
        messages.iter().map(|raw| self.analyze(raw)).collect()
    }
}
