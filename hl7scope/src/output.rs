//! Report rendering for the command line.
//!
//! Text output is meant for people; JSON output is the serialized report and
//! is stable for scripting.

use std::fmt;

use clap::ValueEnum;
use hl7scope_core::samples::UseCase;
use hl7scope_core::{Hl7ScopeError, QualityReport, Result};

/// Available report formats
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// Pretty-printed JSON report
    Json,
}

/// Renders a report in the requested format.
pub fn render(report: &QualityReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(report)),
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| Hl7ScopeError::serialization("quality report", e)),
    }
}

/// Renders a report as a plain-text summary. Issues are listed most urgent
/// first.
pub fn render_text(report: &QualityReport) -> String {
    TextReport(report).to_string()
}

/// Renders the supported use cases in the requested format.
pub fn render_use_cases(use_cases: &[UseCase], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => {
            let mut lines = vec!["Supported use cases:".to_string()];
            lines.extend(
                use_cases
                    .iter()
                    .map(|u| format!("  - {}: {}", u.name, u.description)),
            );
            Ok(lines.join("\n"))
        }
        OutputFormat::Json => serde_json::to_string_pretty(use_cases)
            .map_err(|e| Hl7ScopeError::serialization("use cases", e)),
    }
}

/// Plain-text view of a quality report.
struct TextReport<'a>(&'a QualityReport);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;

        writeln!(
            f,
            "Message type: {}",
            report.message_type.as_deref().unwrap_or("unknown")
        )?;
        if let Some(segments) = report.total_segments {
            writeln!(f, "Segments:     {}", segments)?;
        }
        writeln!(
            f,
            "Valid:        {}",
            if report.is_valid { "yes" } else { "no" }
        )?;
        writeln!(f, "Score:        {}/100", report.overall_score)?;

        if report.issues.is_empty() {
            writeln!(f, "\nNo issues found")?;
        } else {
            let counts = report
                .severity_counts()
                .iter()
                .map(|(severity, count)| format!("{} {}", count, severity))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(f, "\nIssues ({}): {}", report.issues.len(), counts)?;

            for issue in report.sorted_issues() {
                writeln!(
                    f,
                    "  [{}] {} {}: {}",
                    issue.severity.to_string().to_uppercase(),
                    issue.category,
                    issue.field,
                    issue.issue
                )?;
                if !issue.details.is_empty() {
                    writeln!(f, "      {}", issue.details)?;
                }
                if !issue.recommendation.is_empty() {
                    writeln!(f, "      -> {}", issue.recommendation)?;
                }
            }
        }

        if !report.recommendations.is_empty() {
            writeln!(f, "\nRecommendations:")?;
            for recommendation in &report.recommendations {
                writeln!(f, "  - {}", recommendation)?;
            }
        }

        Ok(())
    }
}
