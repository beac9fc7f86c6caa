//! Configuration validation for aibom-diff.
//!
//! Provides validation traits and implementations for all configuration types.
//! Rule names are not checked here: the classifier builder rejects them with
//! `UnknownRuleReference`.

use super::types::*;

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.matching.validate());
        errors.extend(self.rules.validate());
        errors.extend(self.comparison.validate());
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for MatchingConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let valid_presets = ["strict", "balanced", "permissive"];
        if !valid_presets.contains(&self.fuzzy_preset.as_str()) {
            errors.push(ConfigError::new(
                "matching.fuzzy_preset",
                format!(
                    "Invalid preset '{}'. Valid options: {}",
                    self.fuzzy_preset,
                    valid_presets.join(", ")
                ),
            ));
        }

        if let Some(threshold) = self.fuzzy_match_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                errors.push(ConfigError::new(
                    "matching.fuzzy_match_threshold",
                    format!("Threshold must be between 0.0 and 1.0, got {threshold}"),
                ));
            }
        }

        errors
    }
}

impl Validatable for RulesConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.rule_set.is_empty() {
            errors.push(ConfigError::new(
                "rules.rule_set",
                "At least one rule category must be enabled",
            ));
        }

        if self.unsafe_formats.iter().any(|f| f.trim().is_empty()) {
            errors.push(ConfigError::new(
                "rules.unsafe_formats",
                "Format names must not be empty",
            ));
        }

        if let Some(ref path) = self.advisories {
            if !path.exists() {
                errors.push(ConfigError::new(
                    "rules.advisories",
                    format!("Advisory feed not found: {}", path.display()),
                ));
            }
        }

        errors
    }
}

impl Validatable for ComparisonConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.max_parallel_pairs == 0 {
            errors.push(ConfigError::new(
                "comparison.max_parallel_pairs",
                "Must be at least 1",
            ));
        }

        if let Err(e) = parse_duration(&self.timeout_per_pair) {
            errors.push(ConfigError::new("comparison.timeout_per_pair", e));
        }

        if self.retry.max_attempts == 0 {
            errors.push(ConfigError::new(
                "comparison.retry.max_attempts",
                "Must be at least 1",
            ));
        }

        let base = parse_duration(&self.retry.base_delay);
        let max = parse_duration(&self.retry.max_delay);
        if let Err(ref e) = base {
            errors.push(ConfigError::new("comparison.retry.base_delay", e.clone()));
        }
        if let Err(ref e) = max {
            errors.push(ConfigError::new("comparison.retry.max_delay", e.clone()));
        }
        if let (Ok(base), Ok(max)) = (base, max) {
            if base > max {
                errors.push(ConfigError::new(
                    "comparison.retry",
                    format!(
                        "base_delay ({}) exceeds max_delay ({})",
                        self.retry.base_delay, self.retry.max_delay
                    ),
                ));
            }
        }

        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(ref file_path) = self.file {
            if let Some(parent) = file_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    errors.push(ConfigError::new(
                        "output.file",
                        format!("Parent directory does not exist: {}", parent.display()),
                    ));
                }
            }
        }

        errors
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_config_validation() {
        assert!(MatchingConfig::default().is_valid());

        let invalid = MatchingConfig {
            fuzzy_preset: "invalid".to_string(),
            fuzzy_match_threshold: None,
        };
        assert!(!invalid.is_valid());

        let out_of_range = MatchingConfig {
            fuzzy_match_threshold: Some(1.5),
            ..MatchingConfig::default()
        };
        let errors = out_of_range.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "matching.fuzzy_match_threshold");
    }

    #[test]
    fn test_comparison_config_validation() {
        assert!(ComparisonConfig::default().is_valid());

        let invalid = ComparisonConfig {
            max_parallel_pairs: 0,
            timeout_per_pair: "soon".to_string(),
            retry: RetryConfig {
                max_attempts: 3,
                base_delay: "10s".to_string(),
                max_delay: "1s".to_string(),
            },
            ..ComparisonConfig::default()
        };
        let fields: Vec<_> = invalid.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "comparison.max_parallel_pairs",
                "comparison.timeout_per_pair",
                "comparison.retry",
            ]
        );
    }

    #[test]
    fn test_rules_config_validation() {
        assert!(RulesConfig::default().is_valid());

        let invalid = RulesConfig {
            rule_set: Vec::new(),
            unsafe_formats: vec![" ".to_string()],
            advisories: Some("/nonexistent/advisories.yaml".into()),
        };
        assert_eq!(invalid.validate().len(), 3);
    }

    #[test]
    fn test_config_error_display() {
        let error = ConfigError::new("test_field", "test error message");
        assert_eq!(error.to_string(), "test_field: test error message");
    }

    #[test]
    fn test_app_config_validation() {
        assert!(AppConfig::default().is_valid());

        let mut invalid = AppConfig::default();
        invalid.matching.fuzzy_preset = "invalid".to_string();
        assert!(!invalid.is_valid());
    }
}
