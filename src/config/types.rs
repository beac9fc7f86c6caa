//! Configuration types for aibom-diff.
//!
//! Provides structured configuration for analysis runs.

use crate::analysis::{ComparisonMode, RetryPolicy};
use crate::error::{AibomDiffError, Result};
use crate::matching::MatcherConfig;
use crate::reports::ReportFormat;
use crate::risk::{RuleCategory, Severity, DEFAULT_UNSAFE_FORMATS};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// CLI flags override values loaded from a file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Component matching (threshold, preset)
    pub matching: MatchingConfig,
    /// Risk rules and advisory feed
    pub rules: RulesConfig,
    /// Pair formation, parallelism and external call limits
    pub comparison: ComparisonConfig,
    /// Output configuration (format, file)
    pub output: OutputConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Start from an existing configuration, e.g. one loaded from a file.
    pub const fn from_config(config: AppConfig) -> Self {
        Self { config }
    }

    /// Set the fuzzy matching preset.
    pub fn fuzzy_preset(mut self, preset: impl Into<String>) -> Self {
        self.config.matching.fuzzy_preset = preset.into();
        self
    }

    /// Set the fuzzy match threshold (overrides the preset's).
    pub const fn fuzzy_match_threshold(mut self, threshold: f64) -> Self {
        self.config.matching.fuzzy_match_threshold = Some(threshold);
        self
    }

    /// Restrict the enabled rule categories.
    pub fn rule_set<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.rules.rule_set = rules.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the unsafe format denylist.
    pub fn unsafe_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.rules.unsafe_formats = formats.into_iter().map(Into::into).collect();
        self
    }

    /// Set the advisory feed file.
    pub fn advisories(mut self, path: Option<PathBuf>) -> Self {
        self.config.rules.advisories = path;
        self
    }

    pub const fn comparison_mode(mut self, mode: ComparisonMode) -> Self {
        self.config.comparison.mode = mode;
        self
    }

    pub const fn baseline(mut self, index: Option<usize>) -> Self {
        self.config.comparison.baseline = index;
        self
    }

    pub const fn max_parallel_pairs(mut self, n: usize) -> Self {
        self.config.comparison.max_parallel_pairs = n;
        self
    }

    /// Set the per-call time box as a duration string (`30s`, `500ms`, `2m`).
    pub fn timeout_per_pair(mut self, timeout: impl Into<String>) -> Self {
        self.config.comparison.timeout_per_pair = timeout.into();
        self
    }

    /// Set the output format.
    pub const fn output_format(mut self, format: ReportFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Set the output file.
    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    /// Attach rule-based narrative insights to the result.
    pub const fn insights(mut self, enabled: bool) -> Self {
        self.config.output.insights = enabled;
        self
    }

    /// Exit with a failure code when a finding reaches this severity.
    pub const fn fail_on(mut self, severity: Option<Severity>) -> Self {
        self.config.behavior.fail_on = severity;
        self
    }

    /// Exit with a failure code when any input or pair failed.
    pub const fn fail_on_partial(mut self, fail: bool) -> Self {
        self.config.behavior.fail_on_partial = fail;
        self
    }

    /// Enable quiet mode.
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    /// Build the `AppConfig`.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Sub-configuration Types
// ============================================================================

/// Matching configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MatchingConfig {
    /// Matcher preset name: strict, balanced or permissive
    pub fuzzy_preset: String,
    /// Custom fuzzy match threshold (overrides preset)
    #[serde(skip_serializing_if = "Option::is_none", alias = "threshold")]
    #[schemars(range(min = 0.0, max = 1.0))]
    pub fuzzy_match_threshold: Option<f64>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            fuzzy_preset: "balanced".to_string(),
            fuzzy_match_threshold: None,
        }
    }
}

impl MatchingConfig {
    /// Resolve the preset and threshold into a matcher configuration.
    #[must_use]
    pub fn to_matcher_config(&self) -> MatcherConfig {
        let mut config = MatcherConfig::from_preset(&self.fuzzy_preset).unwrap_or_else(|| {
            tracing::warn!(
                "Unknown matcher preset '{}', using 'balanced'. Valid: strict, balanced, permissive",
                self.fuzzy_preset
            );
            MatcherConfig::balanced()
        });

        if let Some(threshold) = self.fuzzy_match_threshold {
            config = config.with_threshold(threshold);
        }

        config
    }
}

/// Risk rule configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RulesConfig {
    /// Enabled rule categories; they always run in canonical order
    pub rule_set: Vec<String>,
    /// Serialization formats that can execute code on load
    pub unsafe_formats: Vec<String>,
    /// Path to a YAML or JSON advisory feed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisories: Option<PathBuf>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            rule_set: RuleCategory::ALL
                .iter()
                .map(|c| c.as_str().to_string())
                .collect(),
            unsafe_formats: DEFAULT_UNSAFE_FORMATS
                .iter()
                .map(|f| (*f).to_string())
                .collect(),
            advisories: None,
        }
    }
}

/// Comparison configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ComparisonConfig {
    /// `baseline` or `all-pairs`
    #[serde(alias = "comparison_mode")]
    pub mode: ComparisonMode,
    /// Baseline document index (baseline mode); first document when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<usize>,
    /// Time box for each external call, e.g. `30s`
    pub timeout_per_pair: String,
    /// Worker pool size for pairwise comparisons and concurrent fetches
    #[schemars(range(min = 1))]
    pub max_parallel_pairs: usize,
    /// Retry policy for external calls
    pub retry: RetryConfig,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            mode: ComparisonMode::Baseline,
            baseline: None,
            timeout_per_pair: "30s".to_string(),
            max_parallel_pairs: 4,
            retry: RetryConfig::default(),
        }
    }
}

impl ComparisonConfig {
    /// Parsed `timeout_per_pair`.
    pub fn timeout(&self) -> Result<Duration> {
        parse_duration(&self.timeout_per_pair)
            .map_err(|e| AibomDiffError::config(format!("comparison.timeout_per_pair: {e}")))
    }
}

/// Retry configuration for external calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, including the first
    #[schemars(range(min = 1))]
    pub max_attempts: u32,
    /// Delay before the first retry
    pub base_delay: String,
    /// Upper bound on any delay
    pub max_delay: String,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: "1s".to_string(),
            max_delay: "8s".to_string(),
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> Result<RetryPolicy> {
        let base_delay = parse_duration(&self.base_delay)
            .map_err(|e| AibomDiffError::config(format!("comparison.retry.base_delay: {e}")))?;
        let max_delay = parse_duration(&self.max_delay)
            .map_err(|e| AibomDiffError::config(format!("comparison.retry.max_delay: {e}")))?;
        Ok(RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay,
            max_delay,
        })
    }
}

/// Output-related configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: ReportFormat,
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Attach rule-based narrative insights
    pub insights: bool,
}

/// Behavior flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Exit with code 2 when any finding is at or above this severity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<Severity>,
    /// Exit with code 1 when the run is partial
    pub fail_on_partial: bool,
    /// Suppress non-essential output
    pub quiet: bool,
}

// ============================================================================
// Durations
// ============================================================================

/// Parse a duration string: `250ms`, `30s`, `2m`, `1h`. A bare number is
/// seconds.
pub fn parse_duration(input: &str) -> std::result::Result<Duration, String> {
    let s = input.trim();
    let split = s.find(|c: char| !c.is_ascii_digit() && c != '.').unwrap_or(s.len());
    let (number, unit) = s.split_at(split);
    let value: f64 = number
        .parse()
        .map_err(|_| format!("invalid duration '{input}'"))?;
    let seconds = match unit.trim() {
        "ms" => value / 1000.0,
        "" | "s" => value,
        "m" => value * 60.0,
        "h" => value * 3600.0,
        other => return Err(format!("unknown duration unit '{other}' in '{input}'")),
    };
    Duration::try_from_secs_f64(seconds).map_err(|e| format!("invalid duration '{input}': {e}"))
}
