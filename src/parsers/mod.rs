//! AIBOM document parsers.
//!
//! Converts CycloneDX-shaped AIBOM JSON into the typed [`AibomDocument`]
//! model, validating the fields the comparison engine depends on.
//!
//! ## Usage
//!
//! ```no_run
//! use aibom_diff::parsers::parse_aibom;
//! use std::path::Path;
//!
//! let doc = parse_aibom(Path::new("model.aibom.json")).unwrap();
//! println!("{} components in {}", doc.component_count(), doc.subject());
//! ```

mod cyclonedx;

pub use cyclonedx::CycloneDxAibomParser;

use crate::error::{AibomDiffError, ErrorContext, Result};
use crate::model::AibomDocument;
use std::path::Path;

/// Maximum AIBOM file size (64 MB).
pub const MAX_AIBOM_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Reject files larger than [`MAX_AIBOM_FILE_SIZE`] before reading them.
pub fn check_file_size(path: &Path, len: u64) -> Result<()> {
    if len > MAX_AIBOM_FILE_SIZE {
        return Err(AibomDiffError::config(format!(
            "{} is {} MB, exceeding the {} MB limit",
            path.display(),
            len / (1024 * 1024),
            MAX_AIBOM_FILE_SIZE / (1024 * 1024),
        )));
    }
    Ok(())
}

/// Read and parse an AIBOM file.
///
/// Returns an error if the file exceeds [`MAX_AIBOM_FILE_SIZE`].
pub fn parse_aibom(path: &Path) -> Result<AibomDocument> {
    let metadata = std::fs::metadata(path).map_err(|e| AibomDiffError::io(path, e))?;
    check_file_size(path, metadata.len())?;
    let content = std::fs::read_to_string(path).map_err(|e| AibomDiffError::io(path, e))?;
    parse_aibom_str(&content).with_context(|| path.display().to_string())
}

/// Parse an AIBOM document from JSON text.
pub fn parse_aibom_str(content: &str) -> Result<AibomDocument> {
    CycloneDxAibomParser::new().parse_str(content)
}

/// Parse an AIBOM document from a decoded JSON value.
pub fn parse_aibom_value(value: serde_json::Value) -> Result<AibomDocument> {
    CycloneDxAibomParser::new().parse_value(value)
}
