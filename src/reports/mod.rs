//! Report generation for analysis results.
//!
//! Two output formats:
//! - JSON: the full `AnalysisResult` plus report metadata, for tooling
//! - Summary: compact shell-friendly text
//!
//! Reports only read the result. Rendering never changes findings or scores.

mod json;
mod summary;
mod types;

pub use json::{JsonAnalysisReport, JsonReporter};
pub use summary::SummaryReporter;
pub use types::{ReportFormat, ReportMetadata, ToolInfo};

use crate::analysis::AnalysisResult;
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Format error: {0}")]
    FormatError(#[from] std::fmt::Error),
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Render an analysis result.
    fn generate(&self, result: &AnalysisResult) -> Result<String, ReportError>;

    /// Write report to a writer
    fn write_report(
        &self,
        result: &AnalysisResult,
        writer: &mut dyn Write,
    ) -> Result<(), ReportError> {
        let report = self.generate(result)?;
        writer.write_all(report.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create a report generator for the given format
#[must_use]
pub fn create_reporter(format: ReportFormat) -> Box<dyn ReportGenerator> {
    create_reporter_with_options(format, true)
}

/// Create a report generator with color control
#[must_use]
pub fn create_reporter_with_options(
    format: ReportFormat,
    use_color: bool,
) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Summary => {
            if use_color {
                Box::new(SummaryReporter::new())
            } else {
                Box::new(SummaryReporter::new().no_color())
            }
        }
        ReportFormat::Json => Box::new(JsonReporter::new()),
    }
}
