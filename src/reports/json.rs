//! JSON report generator.

use super::{ReportError, ReportFormat, ReportGenerator, ReportMetadata};
use crate::analysis::AnalysisResult;
use serde::Serialize;

/// JSON report generator
pub struct JsonReporter {
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Top-level JSON document: report metadata plus the result fields.
///
/// The generation timestamp lives here rather than in the result, so the
/// result itself stays identical across runs on the same inputs.
#[derive(Serialize)]
pub struct JsonAnalysisReport<'a> {
    pub metadata: ReportMetadata,
    #[serde(flatten)]
    pub result: &'a AnalysisResult,
}

impl ReportGenerator for JsonReporter {
    fn generate(&self, result: &AnalysisResult) -> Result<String, ReportError> {
        let report = JsonAnalysisReport {
            metadata: ReportMetadata::now(),
            result,
        };
        let json = if self.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        };
        json.map_err(|e| ReportError::SerializationError(e.to_string()))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}
