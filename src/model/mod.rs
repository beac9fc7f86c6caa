//! Typed in-memory representation of AIBOM documents.
//!
//! Parsers normalize source documents into these structures; everything
//! downstream (matching, diffing, classification) works only on them.

mod component;
mod document;
mod identifiers;
mod license;

pub use component::*;
pub use document::*;
pub use identifiers::*;
pub use license::*;

/// Inclusive range of supported CycloneDX schema versions (major, minor).
pub const SUPPORTED_SCHEMA_VERSIONS: ((u64, u64), (u64, u64)) = ((1, 4), (1, 6));
