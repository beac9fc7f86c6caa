//! Validate command handler.
//!
//! Implements the `validate` subcommand: parse each AIBOM file and report
//! whether it is usable for comparison.

use super::exit_codes;
use super::output::{write_output, OutputTarget};
use crate::error::ErrorKind;
use crate::parsers::parse_aibom;
use crate::reports::ReportFormat;
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

/// Validation outcome for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationEntry {
    pub path: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    pub component_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationEntry {
    fn check(path: &PathBuf) -> Self {
        let display = path.display().to_string();
        match parse_aibom(path) {
            Ok(doc) => Self {
                path: display,
                valid: true,
                subject: Some(doc.subject().to_string()),
                schema_version: Some(doc.metadata.schema_version.clone()),
                component_count: doc.component_count(),
                error_kind: None,
                message: None,
            },
            Err(e) => Self {
                path: display,
                valid: false,
                subject: None,
                schema_version: None,
                component_count: 0,
                error_kind: Some(e.kind()),
                message: Some(e.to_string()),
            },
        }
    }
}

/// Run the validate command, returning the desired exit code.
#[allow(clippy::needless_pass_by_value)]
pub fn run_validate(
    paths: Vec<PathBuf>,
    format: ReportFormat,
    output_file: Option<PathBuf>,
    quiet: bool,
) -> Result<i32> {
    let entries: Vec<ValidationEntry> = paths.iter().map(ValidationEntry::check).collect();

    let content = match format {
        ReportFormat::Json => serde_json::to_string_pretty(&entries)?,
        ReportFormat::Summary => entries
            .iter()
            .map(|e| {
                if e.valid {
                    format!(
                        "✓ {}: {} ({} components, schema {})",
                        e.path,
                        e.subject.as_deref().unwrap_or_default(),
                        e.component_count,
                        e.schema_version.as_deref().unwrap_or_default()
                    )
                } else {
                    format!(
                        "✗ {}: {}",
                        e.path,
                        e.message.as_deref().unwrap_or_default()
                    )
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
    };
    write_output(&content, &OutputTarget::from_option(output_file), quiet)?;

    if entries.iter().all(|e| e.valid) {
        Ok(exit_codes::SUCCESS)
    } else {
        Ok(exit_codes::PARTIAL)
    }
}
