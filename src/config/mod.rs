//! Configuration module for aibom-diff.
//!
//! This module provides a unified configuration system with:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - Named presets for common use cases
//! - YAML config file loading and discovery
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use aibom_diff::config::{AppConfig, ConfigPreset};
//!
//! // Use defaults
//! let config = AppConfig::default();
//!
//! // Use a preset
//! let config = AppConfig::from_preset(ConfigPreset::Strict);
//!
//! // Use builder
//! let config = AppConfig::builder()
//!     .fuzzy_match_threshold(0.9)
//!     .comparison_mode(ComparisonMode::AllPairs)
//!     .build();
//!
//! // Load from file
//! use aibom_diff::config::file::load_or_default;
//! let (config, loaded_from) = load_or_default(None)?;
//! ```
//!
//! # Configuration File
//!
//! Place a `.aibom-diff.yaml` file in your project root or `~/.config/aibom-diff/`:
//!
//! ```yaml
//! matching:
//!   fuzzy_match_threshold: 0.9
//! comparison:
//!   mode: all-pairs
//! behavior:
//!   fail_on: high
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{
    ConfigPreset, DEFAULT_FUZZY_MATCH_THRESHOLD, DEFAULT_MAX_PARALLEL_PAIRS,
    DEFAULT_TIMEOUT_PER_PAIR,
};
pub use types::{
    parse_duration, AppConfig, AppConfigBuilder, BehaviorConfig, ComparisonConfig, MatchingConfig,
    OutputConfig, RetryConfig, RulesConfig,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, generate_full_example_config, load_config_file,
    load_or_default, ConfigFileError, CONFIG_FILE_NAMES,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// Editors can use it to validate and autocomplete `.aibom-diff.yaml` files.
pub fn generate_json_schema() -> crate::error::Result<String> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
        .map_err(|e| crate::error::AibomDiffError::config(format!("schema serialization: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_names_exported() {
        assert_eq!(CONFIG_FILE_NAMES.first(), Some(&".aibom-diff.yaml"));
    }

    #[test]
    fn test_json_schema_names_sections() {
        let schema = generate_json_schema().unwrap();
        for section in ["matching", "rules", "comparison", "output", "behavior"] {
            assert!(schema.contains(section), "schema lacks {section}");
        }
        assert!(schema.contains("all-pairs"));
    }
}
