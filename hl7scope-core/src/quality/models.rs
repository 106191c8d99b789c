//! Data quality result models.
//!
//! Issues carry field locators and rule descriptions only. Field values are
//! never copied into a report, so reports are safe to log or share.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of a quality issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    /// Required data is missing
    Completeness,
    /// Data is present but not a legal value
    Accuracy,
    /// Related fields disagree
    Consistency,
    /// Data does not follow the HL7 standard
    Compliance,
    /// Data is present but malformed
    Formatting,
    /// Data violates a clinical or administrative rule
    BusinessRules,
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IssueCategory::Completeness => "Completeness",
            IssueCategory::Accuracy => "Accuracy",
            IssueCategory::Consistency => "Consistency",
            IssueCategory::Compliance => "Compliance",
            IssueCategory::Formatting => "Formatting",
            IssueCategory::BusinessRules => "Business Rules",
        };
        f.write_str(name)
    }
}

/// Severity of a quality issue.
///
/// Variants are declared from most to least urgent, so sorting ascending
/// puts `Critical` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Message cannot be trusted for its primary purpose
    Critical,
    /// Major gap requiring immediate attention
    High,
    /// Standard issue to address
    Medium,
    /// Minor issue
    Low,
    /// Informational only
    Info,
}

impl Severity {
    /// All severities, most urgent first.
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Info,
    ];
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
            Severity::Info => "Info",
        };
        f.write_str(name)
    }
}

/// A single finding produced by a quality check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue category
    pub category: IssueCategory,
    /// Issue severity
    pub severity: Severity,
    /// Locator such as `PID-7`, or a segment/structure name
    pub field: String,
    /// Short description
    pub issue: String,
    /// Why the finding matters
    pub details: String,
    /// Suggested remediation
    pub recommendation: String,
}

impl Issue {
    /// Creates a new issue with empty details and recommendation.
    pub fn new(
        category: IssueCategory,
        severity: Severity,
        field: impl Into<String>,
        issue: impl Into<String>,
    ) -> Self {
        Self {
            category,
            severity,
            field: field.into(),
            issue: issue.into(),
            details: String::new(),
            recommendation: String::new(),
        }
    }

    /// Sets the details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }

    /// Sets the recommendation.
    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = recommendation.into();
        self
    }
}

/// Output of one check: its issues, the penalty they cost, and any
/// check-level recommendations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckResult {
    /// Issues found by the check
    pub issues: Vec<Issue>,
    /// Points deducted from the score
    pub score_penalty: u32,
    /// Recommendations declared by the check itself, independent of issues
    pub recommendations: Vec<String>,
}

impl CheckResult {
    /// Creates an empty result (no issues, zero penalty).
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an issue together with its penalty.
    pub fn push(&mut self, issue: Issue, penalty: u32) {
        self.issues.push(issue);
        self.score_penalty = self.score_penalty.saturating_add(penalty);
    }

    /// Adds a check-level recommendation.
    pub fn recommend(&mut self, recommendation: impl Into<String>) {
        self.recommendations.push(recommendation.into());
    }

    /// Returns true if the check found nothing.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.score_penalty == 0
    }
}

/// Final data quality report for one message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    /// Quality score (0-100)
    pub overall_score: u8,
    /// False only for structural or parse failures
    pub is_valid: bool,
    /// Message type passthrough (absent when invalid)
    pub message_type: Option<String>,
    /// Segment count passthrough (absent when invalid)
    pub total_segments: Option<usize>,
    /// Timestamp when analysis was performed
    pub analysis_date: DateTime<Utc>,
    /// Issues in check execution order
    pub issues: Vec<Issue>,
    /// Distinct recommendations
    pub recommendations: Vec<String>,
}

impl QualityReport {
    /// Returns issues of one severity.
    pub fn issues_with_severity(&self, severity: Severity) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }

    /// Returns issues of one category.
    pub fn issues_in_category(&self, category: IssueCategory) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.category == category)
    }

    /// Counts issues per severity. Severities with no issues are omitted.
    pub fn severity_counts(&self) -> BTreeMap<Severity, usize> {
        let mut counts = BTreeMap::new();
        for issue in &self.issues {
            let count = counts.entry(issue.severity).or_insert(0_usize);
            *count = count.saturating_add(1);
        }
        counts
    }

    /// Returns issues sorted by severity (most urgent first), then category.
    ///
    /// The stored order is left untouched.
    pub fn sorted_issues(&self) -> Vec<&Issue> {
        let mut sorted: Vec<&Issue> = self.issues.iter().collect();
        sorted.sort_by_key(|i| (i.severity, i.category));
        sorted
    }

    /// Returns true if any issue is critical.
    pub fn has_critical(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Critical)
    }
}
