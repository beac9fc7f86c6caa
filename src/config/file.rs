//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::AppConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".aibom-diff.yaml",
    ".aibom-diff.yml",
    "aibom-diff.yaml",
    "aibom-diff.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/aibom-diff/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path.filter(|p| p.exists()) {
        return Some(path.to_path_buf());
    }

    let cwd = std::env::current_dir().ok();
    let candidates = [
        cwd.clone(),
        cwd.as_deref().and_then(find_git_root),
        dirs::config_dir().map(|d| d.join("aibom-diff")),
        dirs::home_dir(),
    ];

    candidates
        .iter()
        .flatten()
        .find_map(|dir| find_config_in_dir(dir))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up from `start`.
fn find_git_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Failure to load a config file.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}

impl From<ConfigFileError> for crate::error::AibomDiffError {
    fn from(err: ConfigFileError) -> Self {
        Self::config(err.to_string())
    }
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml_ng::from_str(&content).map_err(|source| ConfigFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load config from an explicit or discovered file, or return the default.
///
/// An explicit path that fails to load is an error. A discovered file that
/// fails to load is logged and skipped.
pub fn load_or_default(
    explicit_path: Option<&Path>,
) -> Result<(AppConfig, Option<PathBuf>), ConfigFileError> {
    if let Some(path) = explicit_path {
        return load_config_file(path).map(|config| (config, Some(path.to_path_buf())));
    }

    Ok(discover_config_file(None).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => {
                tracing::debug!("Loaded config from {}", path.display());
                (config, Some(path))
            }
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    ))
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file from the defaults.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AppConfig::default();
    format!(
        r"# aibom-diff configuration
# Place this file at .aibom-diff.yaml in your project root or ~/.config/aibom-diff/

{}",
        serde_yaml_ng::to_string(&example).unwrap_or_default()
    )
}

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_full_example_config() -> String {
    r"# aibom-diff configuration file
# ==============================
#
# Place it at:
#   - .aibom-diff.yaml in your project root
#   - ~/.config/aibom-diff/aibom-diff.yaml for global config
#
# CLI arguments always override file settings.

matching:
  # Preset: strict (0.95), balanced (0.85), permissive (0.70)
  fuzzy_preset: balanced
  # Custom threshold (0.0-1.0), overrides preset
  # fuzzy_match_threshold: 0.85

rules:
  # Enabled rule categories (always evaluated in this order)
  rule_set:
    - unsafe-format
    - missing-license
    - license-change
    - vulnerable-dependency
    - provenance-gap
    - other
  # Formats that can execute code when loaded
  unsafe_formats: [pickle, joblib, dill, cloudpickle, torch-legacy]
  # Advisory feed (YAML or JSON list of {id, package, affected, severity, score})
  # advisories: ./advisories.yaml

comparison:
  # baseline: first (or designated) document vs each other document
  # all-pairs: every ordered pair of documents
  mode: baseline
  # baseline: 0
  timeout_per_pair: 30s
  max_parallel_pairs: 4
  retry:
    max_attempts: 3
    base_delay: 1s
    max_delay: 8s

output:
  # Format: json, summary
  format: summary
  # file: report.json
  # Attach rule-based narrative insights
  insights: false

behavior:
  # Exit with code 2 when a finding reaches this severity
  # fail_on: high
  # Exit with code 1 when any document or pair failed
  fail_on_partial: false
  quiet: false
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================
