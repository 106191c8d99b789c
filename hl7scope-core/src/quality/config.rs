//! Quality analysis configuration.
//!
//! Controls which checks run, how the top-level recommendation list is
//! built, and the penalty applied when a message fails the structural gate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::battery::CheckId;

/// Default penalty for a message that fails the structural gate.
pub const DEFAULT_STRUCTURAL_PENALTY: u32 = 30;

/// Source of the report's top-level recommendation list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationSource {
    /// Every issue's recommendation plus check-level recommendations
    #[default]
    Issues,
    /// Check-level recommendations only
    Explicit,
}

/// Quality analysis configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Checks to run. Execution order is always the battery order.
    pub enabled_checks: Vec<CheckId>,
    /// How the top-level recommendation list is built
    pub recommendation_source: RecommendationSource,
    /// Points deducted when the structural gate fails
    pub structural_penalty: u32,
}

/// Validation errors for quality configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("enabled_checks must contain at least one check")]
    NoChecksEnabled,
    #[error("check '{0}' is listed more than once")]
    DuplicateCheck(CheckId),
    #[error("structural_penalty must be between 0 and 100, got {0}")]
    InvalidStructuralPenalty(u32),
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            enabled_checks: CheckId::ALL.to_vec(),
            recommendation_source: RecommendationSource::default(),
            structural_penalty: DEFAULT_STRUCTURAL_PENALTY,
        }
    }
}

impl QualityConfig {
    /// Creates a new quality config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to replace the enabled check list.
    pub fn with_enabled_checks(mut self, checks: impl IntoIterator<Item = CheckId>) -> Self {
        self.enabled_checks = checks.into_iter().collect();
        self
    }

    /// Builder method to disable one check.
    pub fn without_check(mut self, check: CheckId) -> Self {
        self.enabled_checks.retain(|c| *c != check);
        self
    }

    /// Builder method to set the recommendation source.
    pub fn with_recommendation_source(mut self, source: RecommendationSource) -> Self {
        self.recommendation_source = source;
        self
    }

    /// Builder method to set the structural gate penalty.
    pub fn with_structural_penalty(mut self, penalty: u32) -> Self {
        if penalty > 100 {
            tracing::warn!("structural_penalty {} clamped to 100", penalty);
        }
        self.structural_penalty = penalty.min(100);
        self
    }

    /// Returns true if the check is enabled.
    pub fn is_enabled(&self, check: CheckId) -> bool {
        self.enabled_checks.contains(&check)
    }

    /// Returns enabled checks in battery order.
    pub fn active_checks(&self) -> impl Iterator<Item = CheckId> + '_ {
        CheckId::ALL.into_iter().filter(|c| self.is_enabled(*c))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.enabled_checks.is_empty() {
            return Err(ConfigValidationError::NoChecksEnabled);
        }
        for (index, check) in self.enabled_checks.iter().enumerate() {
            if self.enabled_checks[..index].contains(check) {
                return Err(ConfigValidationError::DuplicateCheck(*check));
            }
        }
        if self.structural_penalty > 100 {
            return Err(ConfigValidationError::InvalidStructuralPenalty(
                self.structural_penalty,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_config_default() {
        let config = QualityConfig::default();
        assert_eq!(config.enabled_checks.len(), 10);
        assert_eq!(config.recommendation_source, RecommendationSource::Issues);
        assert_eq!(config.structural_penalty, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_quality_config_builder() {
        let config = QualityConfig::new()
            .without_check(CheckId::PhoneFormat)
            .without_check(CheckId::AddressFormat)
            .with_recommendation_source(RecommendationSource::Explicit)
            .with_structural_penalty(50);

        assert_eq!(config.enabled_checks.len(), 8);
        assert!(!config.is_enabled(CheckId::PhoneFormat));
        assert!(config.is_enabled(CheckId::BusinessRules));
        assert_eq!(config.recommendation_source, RecommendationSource::Explicit);
        assert_eq!(config.structural_penalty, 50);
    }

    #[test]
    fn test_active_checks_follow_battery_order() {
        let config = QualityConfig::new().with_enabled_checks([
            CheckId::VersionCompliance,
            CheckId::HeaderCompleteness,
            CheckId::DateFormats,
        ]);

        let active: Vec<CheckId> = config.active_checks().collect();
        assert_eq!(
            active,
            vec![
                CheckId::HeaderCompleteness,
                CheckId::DateFormats,
                CheckId::VersionCompliance
            ]
        );
    }

    #[test]
    fn test_structural_penalty_clamping() {
        let config = QualityConfig::new().with_structural_penalty(250);
        assert_eq!(config.structural_penalty, 100);
    }

    #[test]
    fn test_validate_empty_checks() {
        let config = QualityConfig::new().with_enabled_checks(Vec::<CheckId>::new());
        assert_eq!(config.validate(), Err(ConfigValidationError::NoChecksEnabled));
    }

    #[test]
    fn test_validate_duplicate_check() {
        let config = QualityConfig::new()
            .with_enabled_checks([CheckId::DateFormats, CheckId::DateFormats]);
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::DuplicateCheck(CheckId::DateFormats))
        );
    }

    #[test]
    fn test_validate_invalid_penalty() {
        // Bypass clamping to test validation
        let config = QualityConfig {
            structural_penalty: 101,
            ..QualityConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidStructuralPenalty(101))
        );
    }

    #[test]
    fn test_quality_config_serde_roundtrip() {
        let config = QualityConfig::new()
            .without_check(CheckId::VersionCompliance)
            .with_recommendation_source(RecommendationSource::Explicit);

        let json = serde_json::to_string(&config).unwrap();
        let deserialized: QualityConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_quality_config_partial_json_uses_defaults() {
        let config: QualityConfig =
            serde_json::from_str(r#"{"recommendation_source": "explicit"}"#).unwrap();

        assert_eq!(config.recommendation_source, RecommendationSource::Explicit);
        assert_eq!(config.enabled_checks.len(), 10);
        assert_eq!(config.structural_penalty, 30);
    }
}
