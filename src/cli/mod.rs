//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand
//! and returns the process exit code.

mod analyze;
mod output;
mod validate;

pub use analyze::{determine_exit_code, run_analyze, AnalyzeConfig};
pub use output::{should_use_color, write_output, OutputTarget};
pub use validate::{run_validate, ValidationEntry};

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// A document or pair failed (with `--fail-on-partial`), or validation failed
    pub const PARTIAL: i32 = 1;
    /// A finding reached the `--fail-on` severity
    pub const FINDINGS: i32 = 2;
    /// An error occurred
    pub const ERROR: i32 = 3;
}
