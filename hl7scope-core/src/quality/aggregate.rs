//! Combines check results into a report and derives the score.

use std::collections::HashSet;

use chrono::Utc;

use crate::error::Hl7ScopeError;
use crate::models::ParsedMessage;

use super::config::RecommendationSource;
use super::models::{CheckResult, Issue, IssueCategory, QualityReport, Severity};

/// Highest possible score.
pub const MAX_SCORE: u8 = 100;

/// Converts a total penalty into a score clamped to `[0, 100]`.
pub fn score_from_penalty(total_penalty: u32) -> u8 {
    let remaining = u32::from(MAX_SCORE).saturating_sub(total_penalty);
    u8::try_from(remaining).unwrap_or(MAX_SCORE)
}

/// Sums check penalties without overflow.
pub fn total_penalty<'a>(results: impl IntoIterator<Item = &'a CheckResult>) -> u32 {
    results
        .into_iter()
        .fold(0_u32, |total, r| total.saturating_add(r.score_penalty))
}

/// Removes duplicate strings, keeping the first occurrence of each.
pub fn dedup_recommendations<I, S>(recommendations: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    recommendations
        .into_iter()
        .map(Into::into)
        .filter(|r| !r.is_empty() && seen.insert(r.clone()))
        .collect()
}

/// Builds the report for a message that passed the structural gate.
///
/// Issues keep the order of `results`. The score is
/// `clamp(100 - sum(penalties), 0, 100)`.
pub fn aggregate(
    message: &ParsedMessage,
    results: &[CheckResult],
    source: RecommendationSource,
) -> QualityReport {
    let total = total_penalty(results);

    let issues: Vec<Issue> = results
        .iter()
        .flat_map(|r| r.issues.iter().cloned())
        .collect();

    let recommendations = match source {
        RecommendationSource::Issues => dedup_recommendations(results.iter().flat_map(|r| {
            r.issues
                .iter()
                .map(|i| i.recommendation.as_str())
                .chain(r.recommendations.iter().map(String::as_str))
        })),
        RecommendationSource::Explicit => {
            dedup_recommendations(results.iter().flat_map(|r| r.recommendations.iter().map(String::as_str)))
        }
    };

    QualityReport {
        overall_score: score_from_penalty(total),
        is_valid: true,
        message_type: message.message_type.clone(),
        total_segments: Some(message.total_segments),
        analysis_date: Utc::now(),
        issues,
        recommendations,
    }
}

impl QualityReport {
    /// Report for a message rejected by the structural gate.
    ///
    /// Carries one critical issue and no recommendations.
    pub fn structural_failure(errors: &[String], penalty: u32) -> Self {
        let details = if errors.is_empty() {
            "The message failed structural validation".to_string()
        } else {
            errors.join("; ")
        };

        Self {
            overall_score: score_from_penalty(penalty),
            is_valid: false,
            message_type: None,
            total_segments: None,
            analysis_date: Utc::now(),
            issues: vec![
                Issue::new(
                    IssueCategory::Formatting,
                    Severity::Critical,
                    "Message Structure",
                    "Invalid HL7 message structure",
                )
                .with_details(details)
                .with_recommendation(
                    "Ensure the message starts with an MSH segment and uses proper HL7 delimiters",
                ),
            ],
            recommendations: Vec::new(),
        }
    }

    /// Report for a message the parser could not model. The score is forced
    /// to zero.
    pub fn parse_failure(error: &Hl7ScopeError) -> Self {
        Self {
            overall_score: 0,
            is_valid: false,
            message_type: None,
            total_segments: None,
            analysis_date: Utc::now(),
            issues: vec![
                Issue::new(
                    IssueCategory::Formatting,
                    Severity::Critical,
                    "Message Parsing",
                    "Message could not be parsed",
                )
                .with_details(error.to_string())
                .with_recommendation("Verify the message follows HL7 v2 encoding rules"),
            ],
            recommendations: vec!["Review message format and structure".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EncodingCharacters, Segment};

    fn issue(field: &str, recommendation: &str) -> Issue {
        Issue::new(IssueCategory::Formatting, Severity::Low, field, "test")
            .with_recommendation(recommendation)
    }

    fn result(issues: Vec<(Issue, u32)>, explicit: &[&str]) -> CheckResult {
        let mut result = CheckResult::new();
        for (issue, penalty) in issues {
            result.push(issue, penalty);
        }
        for r in explicit {
            result.recommend(*r);
        }
        result
    }

    fn message() -> ParsedMessage {
        ParsedMessage::new(
            vec![
                Segment::new("MSH").with_field(9, "ADT^A01"),
                Segment::new("PID"),
            ],
            EncodingCharacters::default(),
        )
    }

    #[test]
    fn test_score_from_penalty() {
        assert_eq!(score_from_penalty(0), 100);
        assert_eq!(score_from_penalty(30), 70);
        assert_eq!(score_from_penalty(100), 0);
        assert_eq!(score_from_penalty(250), 0);
        assert_eq!(score_from_penalty(u32::MAX), 0);
    }

    #[test]
    fn test_total_penalty_saturates() {
        let results = vec![
            result(vec![(issue("A", "x"), u32::MAX)], &[]),
            result(vec![(issue("B", "y"), 5)], &[]),
        ];
        assert_eq!(total_penalty(&results), u32::MAX);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let deduped = dedup_recommendations(["b", "a", "b", "", "c", "a"]);
        assert_eq!(deduped, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_aggregate_clean() {
        let results = vec![CheckResult::new(), CheckResult::new()];
        let report = aggregate(&message(), &results, RecommendationSource::Issues);

        assert_eq!(report.overall_score, 100);
        assert!(report.is_valid);
        assert!(report.issues.is_empty());
        assert!(report.recommendations.is_empty());
        assert_eq!(report.message_type.as_deref(), Some("ADT^A01"));
        assert_eq!(report.total_segments, Some(2));
    }

    #[test]
    fn test_aggregate_preserves_check_order() {
        let results = vec![
            result(vec![(issue("MSH-3", "r1"), 2)], &[]),
            CheckResult::new(),
            result(vec![(issue("PID-7", "r2"), 3), (issue("PID-8", "r3"), 1)], &[]),
        ];
        let report = aggregate(&message(), &results, RecommendationSource::Issues);

        let fields: Vec<&str> = report.issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["MSH-3", "PID-7", "PID-8"]);
        assert_eq!(report.overall_score, 94);
    }

    #[test]
    fn test_aggregate_clamps_at_zero() {
        let results = vec![
            result(vec![(issue("A", "r"), 60)], &[]),
            result(vec![(issue("B", "r"), 70)], &[]),
        ];
        let report = aggregate(&message(), &results, RecommendationSource::Issues);

        assert_eq!(report.overall_score, 0);
        assert!(report.is_valid);
    }

    #[test]
    fn test_recommendations_from_issues() {
        let results = vec![
            result(
                vec![(issue("A", "shared"), 1), (issue("B", "only-b"), 1)],
                &["explicit-1"],
            ),
            result(vec![(issue("C", "shared"), 1)], &["explicit-1"]),
        ];
        let report = aggregate(&message(), &results, RecommendationSource::Issues);

        assert_eq!(
            report.recommendations,
            vec!["shared", "only-b", "explicit-1"]
        );
    }

    #[test]
    fn test_recommendations_explicit_only() {
        let results = vec![
            result(vec![(issue("A", "shared"), 1)], &[]),
            result(vec![(issue("C", "shared"), 1)], &["explicit-1", "explicit-1"]),
        ];
        let report = aggregate(&message(), &results, RecommendationSource::Explicit);

        assert_eq!(report.recommendations, vec!["explicit-1"]);
        assert_eq!(report.issues.len(), 2);
    }

    #[test]
    fn test_structural_failure_report() {
        let report = QualityReport::structural_failure(&["Message is empty".to_string()], 30);

        assert_eq!(report.overall_score, 70);
        assert!(!report.is_valid);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].field, "Message Structure");
        assert_eq!(report.issues[0].severity, Severity::Critical);
        assert_eq!(report.issues[0].details, "Message is empty");
        assert!(report.recommendations.is_empty());
        assert_eq!(report.message_type, None);
        assert_eq!(report.total_segments, None);
    }

    #[test]
    fn test_parse_failure_report() {
        let report = QualityReport::parse_failure(&Hl7ScopeError::parse("message is empty"));

        assert_eq!(report.overall_score, 0);
        assert!(!report.is_valid);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].field, "Message Parsing");
        assert_eq!(report.issues[0].category, IssueCategory::Formatting);
        assert_eq!(
            report.recommendations,
            vec!["Review message format and structure"]
        );
    }
}
