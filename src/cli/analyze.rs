//! Analyze command handler.
//!
//! Implements the `analyze` subcommand: compare two or more AIBOM files and
//! report risk findings.

use super::exit_codes;
use super::output::{should_use_color, write_output, OutputTarget};
use crate::analysis::{AnalysisOrchestrator, AnalysisResult, FileProvider, RuleBasedInsights};
use crate::config::{AppConfig, BehaviorConfig, Validatable};
use crate::reports::create_reporter_with_options;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

/// Inputs for one `analyze` invocation.
#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    /// AIBOM files, in index order
    pub documents: Vec<PathBuf>,
    /// Effective configuration (file values with CLI overrides applied)
    pub app: AppConfig,
    pub no_color: bool,
}

/// Run the analyze command, returning the desired exit code.
///
/// Documents are read through the time-boxed, retried fetch path, so an
/// unreadable file becomes a failure entry rather than aborting the run.
#[allow(clippy::needless_pass_by_value)]
pub fn run_analyze(config: AnalyzeConfig) -> Result<i32> {
    let errors = config.app.validate();
    if !errors.is_empty() {
        let list: Vec<String> = errors.iter().map(ToString::to_string).collect();
        bail!("Invalid configuration:\n  {}", list.join("\n  "));
    }

    let orchestrator = AnalysisOrchestrator::from_config(&config.app)?;
    let subjects: Vec<String> = config
        .documents
        .iter()
        .map(|p| p.display().to_string())
        .collect();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.app.comparison.max_parallel_pairs.max(1))
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let mut result =
        runtime.block_on(orchestrator.analyze_subjects(Arc::new(FileProvider), &subjects))?;

    if config.app.output.insights {
        result = result.with_insights(&RuleBasedInsights);
    }

    let quiet = config.app.behavior.quiet;
    if !quiet && result.is_partial() {
        tracing::warn!(
            failures = result.failures.len(),
            "Analysis completed with failures"
        );
    }

    let target = OutputTarget::from_option(config.app.output.file.clone());
    let reporter = create_reporter_with_options(
        config.app.output.format,
        should_use_color(config.no_color, &target),
    );
    let report = reporter.generate(&result)?;
    write_output(&report, &target, quiet)?;

    Ok(determine_exit_code(&config.app.behavior, &result))
}

/// Determine the exit code based on findings, run status and config flags.
#[must_use]
pub fn determine_exit_code(behavior: &BehaviorConfig, result: &AnalysisResult) -> i32 {
    if let Some(threshold) = behavior.fail_on {
        if result.max_severity().is_some_and(|s| s >= threshold) {
            return exit_codes::FINDINGS;
        }
    }
    if behavior.fail_on_partial && result.is_partial() {
        return exit_codes::PARTIAL;
    }
    exit_codes::SUCCESS
}
