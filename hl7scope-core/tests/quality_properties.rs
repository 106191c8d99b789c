//! Integration tests for quality scoring behavior.
//!
//! These tests drive the public analyzer API with complete messages and
//! verify scores, issue lists and recommendations end to end.

use std::collections::HashSet;

use hl7scope_core::quality::{
    CheckId, IssueCategory, QualityAnalyzer, QualityConfig, RecommendationSource, Severity,
    analyze_data_quality,
};
use hl7scope_core::samples::{ADT_A01, INVALID, ORU_R01};

/// Replaces the first segment starting with `tag` in the ADT sample.
fn adt_with_segment(tag: &str, replacement: Option<&str>) -> String {
    ADT_A01
        .split('\r')
        .filter_map(|line| {
            if line.starts_with(tag) {
                replacement.map(str::to_string)
            } else {
                Some(line.to_string())
            }
        })
        .collect::<Vec<_>>()
        .join("\r")
}

/// Builds a PV1 segment with admit (PV1-44) and discharge (PV1-45) dates.
fn visit_with_dates(admit: &str, discharge: &str) -> String {
    format!("PV1|1|I{}{}|{}", "|".repeat(42), admit, discharge)
}

#[test]
fn test_integration_samples_score_100() {
    for raw in [ADT_A01, ORU_R01] {
        let report = analyze_data_quality(raw);

        assert!(report.is_valid);
        assert_eq!(report.overall_score, 100, "unexpected issues: {:?}", report.issues);
        assert!(report.issues.is_empty());
        assert!(report.recommendations.is_empty());
    }
}

#[test]
fn test_integration_structural_failure_scores_70() {
    for raw in ["", "   \r\n", INVALID, "PID|1||123", "MSH|"] {
        let report = analyze_data_quality(raw);

        assert!(!report.is_valid, "{:?} should fail the gate", raw);
        assert_eq!(report.overall_score, 70);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].severity, Severity::Critical);
        assert_eq!(report.issues[0].category, IssueCategory::Formatting);
        assert_eq!(report.message_type, None);
    }
}

#[test]
fn test_integration_removing_pid() {
    let raw = adt_with_segment("PID", None);
    let report = analyze_data_quality(&raw);

    assert!(report.is_valid);
    assert_eq!(report.issues.len(), 1, "issues: {:?}", report.issues);
    assert_eq!(report.issues[0].issue, "Missing PID segment");
    assert_eq!(report.issues[0].severity, Severity::Critical);
    assert_eq!(report.overall_score, 85);
    assert!(report.issues.iter().all(|i| !i.field.starts_with("PID-")));
}

#[test]
fn test_integration_discharge_before_admit() {
    let raw = adt_with_segment("PV1", Some(&visit_with_dates("20240110", "20240105")));
    let report = analyze_data_quality(&raw);

    assert_eq!(report.issues.len(), 1, "issues: {:?}", report.issues);
    assert_eq!(report.issues[0].issue, "Discharge date before admit date");
    assert_eq!(report.issues[0].severity, Severity::High);
    assert_eq!(report.issues[0].category, IssueCategory::BusinessRules);
    assert_eq!(report.overall_score, 95);

    let raw = adt_with_segment("PV1", Some(&visit_with_dates("20240105", "20240110")));
    let report = analyze_data_quality(&raw);
    assert!(report.issues.is_empty());
    assert_eq!(report.overall_score, 100);
}

#[test]
fn test_integration_birth_date_format() {
    let report = analyze_data_quality(&ADT_A01.replace("19800115", "1980/01/15"));

    assert!(report.issues.iter().any(|i| {
        i.field == "PID-7"
            && i.severity == Severity::Medium
            && i.category == IssueCategory::Formatting
            && i.issue == "Invalid date of birth format"
    }));
    assert!(report.issues.iter().all(|i| i.field == "PID-7"));
    assert!(report.overall_score < 100);

    let report = analyze_data_quality(ADT_A01);
    assert!(report.issues.iter().all(|i| i.field != "PID-7"));
}

#[test]
fn test_integration_recommendations_are_unique() {
    let raw = ADT_A01
        .replace("(555)555-1234|(555)555-5678", "CALL ME|ASK FOR JOHN")
        .replace("19800115", "1980/01/15");
    let report = analyze_data_quality(&raw);

    assert!(report.issues.len() >= 4);
    let unique: HashSet<&String> = report.recommendations.iter().collect();
    assert_eq!(unique.len(), report.recommendations.len());
}

#[test]
fn test_integration_score_stays_in_range() {
    let heavily_broken = "MSH|^~\\&|||||||ADT^A01\r\
PID|1||||||1980/01/15|Z|||free text address||CALL|NOPE||||BAD-SSN||||||||||20000101\r\
PV1|1|Q";

    let report = analyze_data_quality(heavily_broken);
    assert!(report.is_valid);
    assert!(report.overall_score < 70);
    assert!(report.overall_score <= 100);
    assert!(report.issues.len() > 10);
}

#[test]
fn test_integration_recommendation_sources() {
    let raw = adt_with_segment("PV1", None)
        .replace("123 MAIN ST^^ANYTOWN^CA^12345^USA", "123 MAIN ST, ANYTOWN CA 12345");

    let issues = QualityAnalyzer::with_defaults().analyze(&raw);
    let explicit = QualityAnalyzer::new(
        QualityConfig::new().with_recommendation_source(RecommendationSource::Explicit),
    )
    .analyze(&raw);

    assert_eq!(issues.issues, explicit.issues);
    assert_eq!(issues.overall_score, explicit.overall_score);
    assert_eq!(
        explicit.recommendations,
        vec!["Include every segment required by the message type"]
    );
    assert!(issues.recommendations.len() > explicit.recommendations.len());
    assert!(
        issues
            .recommendations
            .contains(&"Include every segment required by the message type".to_string())
    );
}

#[test]
fn test_integration_disabled_checks_do_not_report() {
    let raw = ADT_A01.replace("|2.5\r", "|9.9\r");

    let report = analyze_data_quality(&raw);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].category, IssueCategory::Compliance);

    let analyzer =
        QualityAnalyzer::new(QualityConfig::new().without_check(CheckId::VersionCompliance));
    assert!(analyzer.analyze(&raw).issues.is_empty());
}

#[test]
fn test_integration_report_json_shape() {
    let raw = adt_with_segment("PV1", Some(&visit_with_dates("20240110", "20240105")));
    let report = analyze_data_quality(&raw);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["overall_score"], 95);
    assert_eq!(json["is_valid"], true);
    assert_eq!(json["message_type"], "ADT^A01");
    assert_eq!(json["issues"][0]["category"], "business_rules");
    assert_eq!(json["issues"][0]["severity"], "high");
    assert_eq!(json["issues"][0]["field"], "PV1-45");
}

#[test]
fn test_integration_fractional_header_timestamp_costs_one() {
    let raw = ADT_A01.replacen("20240115103000", "20240115103000.1234", 1);
    let report = analyze_data_quality(&raw);

    assert_eq!(report.issues.len(), 1, "issues: {:?}", report.issues);
    assert_eq!(report.issues[0].field, "MSH-7");
    assert_eq!(report.issues[0].issue, "Invalid date format");
    assert_eq!(report.issues[0].severity, Severity::Medium);
    assert_eq!(report.overall_score, 99);
}
