//! **Comparison and risk analysis for AI Bills of Materials (AIBOMs).**
//!
//! `aibom-diff` parses CycloneDX-style AIBOM documents describing machine
//! learning models, matches their components, computes structured deltas and
//! classifies those deltas into risk findings. Several documents can be
//! analyzed at once, either against a baseline or in all-pairs mode, with the
//! pairwise work running in parallel.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: The normalized [`AibomDocument`] and its [`Component`]s.
//! - **[`parsers`]**: Turns raw JSON into an [`AibomDocument`], see [`parse_aibom`].
//! - **[`matching`]**: Exact and fuzzy component matching ([`FuzzyMatcher`]).
//! - **[`diff`]**: The [`DiffEngine`] producing component, edge and metadata deltas.
//! - **[`risk`]**: The [`RiskClassifier`], its rules and the advisory feed.
//! - **[`analysis`]**: The [`AnalysisOrchestrator`] that forms pairs, runs them
//!   and aggregates an [`AnalysisResult`].
//! - **[`reports`]**: JSON and terminal summary output.
//! - **[`config`]**: [`AppConfig`], presets, validation and config-file discovery.
//!
//! ## Usage
//!
//! ### Comparing two AIBOMs
//!
//! ```no_run
//! use std::path::Path;
//! use aibom_diff::{parse_aibom, DiffEngine, RiskClassifier};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let old = parse_aibom(Path::new("model-v1.aibom.json"))?;
//!     let new = parse_aibom(Path::new("model-v2.aibom.json"))?;
//!
//!     let diff = DiffEngine::new().diff(&old, &new);
//!     println!("{} added, {} removed", diff.summary.added, diff.summary.removed);
//!
//!     let classifier = RiskClassifier::builder().build()?;
//!     for finding in classifier.classify(&new, &diff.component_deltas) {
//!         println!("[{}] {}", finding.severity, finding.message);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Analyzing a set of documents
//!
//! ```no_run
//! use aibom_diff::{AnalysisOrchestrator, AppConfig, RawDocument};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let orchestrator = AnalysisOrchestrator::from_config(&AppConfig::default())?;
//!     let inputs = vec![
//!         RawDocument::new("v1", std::fs::read_to_string("v1.json")?),
//!         RawDocument::new("v2", std::fs::read_to_string("v2.json")?),
//!     ];
//!     let result = orchestrator.analyze_raw(&inputs)?;
//!     println!("risk score {:.2} ({})", result.summary.score, result.summary.risk_level);
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // Scores and similarity ratios are computed from bounded counts
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::too_many_lines,
    clippy::struct_excessive_bools,
    // Variable names like `old`/`new` are clear in context
    clippy::similar_names
)]

pub mod analysis;
pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod matching;
pub mod model;
pub mod parsers;
pub mod reports;
pub mod risk;

// Re-export main types for convenience
pub use analysis::{
    AnalysisOrchestrator, AnalysisResult, CancellationSignal, ComparisonMode, RawDocument,
};
pub use config::{AppConfig, AppConfigBuilder, ConfigError, ConfigPreset, Validatable};
pub use diff::{DiffEngine, DiffResult};
pub use error::{AibomDiffError, ErrorContext, OptionContext, Result};
pub use matching::{ComponentMatcher, FuzzyMatcher, MatchTier, MatcherConfig};
pub use model::{AibomDocument, Component};
pub use parsers::{parse_aibom, parse_aibom_str};
pub use reports::{ReportFormat, ReportGenerator};
pub use risk::{Finding, RiskClassifier, Severity};
