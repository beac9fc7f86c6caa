//! Component matching configuration.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Configuration for the fuzzy pass of the matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MatcherConfig {
    /// Minimum combined similarity for a fuzzy match (0.0 - 1.0)
    pub threshold: f64,
    /// Weight for normalized Levenshtein similarity of names
    pub name_weight: f64,
    /// Weight for component type equality
    pub type_weight: f64,
}

impl MatcherConfig {
    /// Strict matching: only near-identical renames are paired.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            threshold: 0.95,
            name_weight: 0.8,
            type_weight: 0.2,
        }
    }

    /// Balanced matching (default).
    #[must_use]
    pub const fn balanced() -> Self {
        Self {
            threshold: 0.85,
            name_weight: 0.8,
            type_weight: 0.2,
        }
    }

    /// Permissive matching for noisy generator output.
    #[must_use]
    pub const fn permissive() -> Self {
        Self {
            threshold: 0.70,
            name_weight: 0.8,
            type_weight: 0.2,
        }
    }

    /// Override the threshold.
    #[must_use]
    pub const fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Look up a preset by name.
    #[must_use]
    pub fn from_preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "strict" => Some(Self::strict()),
            "balanced" | "default" => Some(Self::balanced()),
            "permissive" => Some(Self::permissive()),
            _ => None,
        }
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self::balanced()
    }
}
