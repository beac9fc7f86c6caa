//! Default configurations and presets for aibom-diff.
//!
//! Provides named presets for common use cases and default values.

use super::types::{
    AppConfig, BehaviorConfig, ComparisonConfig, MatchingConfig, OutputConfig, RulesConfig,
};
use crate::reports::ReportFormat;
use crate::risk::Severity;

// ============================================================================
// Configuration Presets
// ============================================================================

/// Named configuration presets for common use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Default balanced settings suitable for most cases
    Default,
    /// Strict: near-exact matching, fail on high-severity findings
    Strict,
    /// Permissive: loose matching for inconsistently named artifacts
    Permissive,
    /// CI/CD: JSON output, fail on critical findings and partial runs
    CiCd,
}

impl ConfigPreset {
    /// Get the preset name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Strict => "strict",
            Self::Permissive => "permissive",
            Self::CiCd => "ci-cd",
        }
    }

    /// Parse a preset from a string name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" | "balanced" => Some(Self::Default),
            "strict" | "exact" => Some(Self::Strict),
            "permissive" | "loose" => Some(Self::Permissive),
            "ci-cd" | "ci" | "pipeline" => Some(Self::CiCd),
            _ => None,
        }
    }

    /// Get a description of this preset.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Default => "Balanced settings suitable for most model comparisons",
            Self::Strict => "Near-exact matching that fails on high-severity findings",
            Self::Permissive => "Loose matching for AIBOMs with inconsistent artifact naming",
            Self::CiCd => "Machine-readable output optimized for CI/CD pipelines",
        }
    }

    /// Get all available presets.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Default, Self::Strict, Self::Permissive, Self::CiCd]
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Preset Implementations
// ============================================================================

impl AppConfig {
    /// Create an `AppConfig` from a named preset.
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        match preset {
            ConfigPreset::Default => Self::default(),
            ConfigPreset::Strict => Self::strict_preset(),
            ConfigPreset::Permissive => Self::permissive_preset(),
            ConfigPreset::CiCd => Self::ci_cd_preset(),
        }
    }

    /// Strict preset.
    ///
    /// - Threshold 0.95, so only near-identical renames pair up
    /// - Fail on High or Critical findings
    #[must_use]
    pub fn strict_preset() -> Self {
        Self {
            matching: MatchingConfig {
                fuzzy_preset: "strict".to_string(),
                fuzzy_match_threshold: Some(0.95),
            },
            behavior: BehaviorConfig {
                fail_on: Some(Severity::High),
                fail_on_partial: true,
                quiet: false,
            },
            ..Self::default()
        }
    }

    /// Permissive preset.
    ///
    /// - Threshold 0.70
    /// - No fail modes
    #[must_use]
    pub fn permissive_preset() -> Self {
        Self {
            matching: MatchingConfig {
                fuzzy_preset: "permissive".to_string(),
                fuzzy_match_threshold: Some(0.70),
            },
            ..Self::default()
        }
    }

    /// CI/CD pipeline preset.
    #[must_use]
    pub fn ci_cd_preset() -> Self {
        Self {
            matching: MatchingConfig::default(),
            rules: RulesConfig::default(),
            comparison: ComparisonConfig::default(),
            output: OutputConfig {
                format: ReportFormat::Json,
                file: None,
                insights: false,
            },
            behavior: BehaviorConfig {
                fail_on: Some(Severity::Critical),
                fail_on_partial: true,
                quiet: true,
            },
        }
    }
}

// ============================================================================
// Default Value Constants
// ============================================================================

/// Default fuzzy match threshold.
pub const DEFAULT_FUZZY_MATCH_THRESHOLD: f64 = 0.85;

/// Default worker pool size.
pub const DEFAULT_MAX_PARALLEL_PAIRS: usize = 4;

/// Default time box for external calls.
pub const DEFAULT_TIMEOUT_PER_PAIR: &str = "30s";

// ============================================================================
// Tests
// ============================================================================
