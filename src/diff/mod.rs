//! Deterministic diffing of AIBOM documents.
//!
//! The engine is a pure function of two documents and their [`MatchSet`]:
//! every match-set entry yields exactly one [`ComponentDelta`], so
//! `deltas == matched + old-only + new-only` always holds. Metadata and
//! dependency-edge differences are reported in separate lists.
//!
//! [`MatchSet`]: crate::matching::MatchSet

mod engine;
mod result;

pub use engine::{compare_fields, diff_components, diff_edges, diff_metadata, DiffEngine};
pub use result::{
    ChangedField, ComponentDelta, DeltaKind, DiffResult, DiffSummary, EdgeChangeKind, EdgeDelta,
    FieldChange, MetadataDelta, MetadataField,
};
