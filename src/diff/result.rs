//! Diff result structures.

use crate::matching::MatchTier;
use crate::model::{Component, ComponentId};
use serde::{Deserialize, Serialize};

/// Kind of change recorded for one component relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeltaKind {
    Added,
    Removed,
    Modified,
    Unchanged,
}

impl DeltaKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Modified => "modified",
            Self::Unchanged => "unchanged",
        }
    }
}

impl std::fmt::Display for DeltaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Component attribute compared by the diff engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangedField {
    Version,
    Format,
    License,
    Checksum,
    SourceUrl,
    SourceCommit,
    UploadedAt,
}

impl std::fmt::Display for ChangedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Version => "version",
            Self::Format => "format",
            Self::License => "license",
            Self::Checksum => "checksum",
            Self::SourceUrl => "source-url",
            Self::SourceCommit => "source-commit",
            Self::UploadedAt => "uploaded-at",
        };
        f.write_str(name)
    }
}

/// Individual field change within a modified component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: ChangedField,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

impl FieldChange {
    pub fn new(field: ChangedField, old_value: Option<String>, new_value: Option<String>) -> Self {
        Self {
            field,
            old_value,
            new_value,
        }
    }
}

/// The change recorded for one [`crate::matching::ComponentMatch`].
///
/// Component snapshots are copied out of the documents so a delta stays
/// meaningful after the documents are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDelta {
    pub kind: DeltaKind,
    /// Component as it was in the old document
    pub old: Option<Component>,
    /// Component as it is in the new document
    pub new: Option<Component>,
    pub match_tier: MatchTier,
    pub match_score: f64,
    /// Changed fields, non-empty only for [`DeltaKind::Modified`]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<FieldChange>,
}

impl ComponentDelta {
    /// Identifier of the component this delta is about, new side preferred.
    #[must_use]
    pub fn id(&self) -> Option<&ComponentId> {
        self.new.as_ref().or(self.old.as_ref()).map(|c| &c.id)
    }

    /// The current state of the component, or its last state if removed.
    #[must_use]
    pub fn current(&self) -> Option<&Component> {
        self.new.as_ref().or(self.old.as_ref())
    }

    /// Change of a specific field, if any.
    #[must_use]
    pub fn change(&self, field: ChangedField) -> Option<&FieldChange> {
        self.changes.iter().find(|c| c.field == field)
    }

    #[must_use]
    pub fn has_change(&self, field: ChangedField) -> bool {
        self.change(field).is_some()
    }

    /// Display label, e.g. `model-weights:model.safetensors`.
    #[must_use]
    pub fn label(&self) -> String {
        self.id()
            .map(|id| format!("{}:{}", id.kind, id.name))
            .unwrap_or_default()
    }
}

/// Document metadata field compared by the diff engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetadataField {
    Subject,
    GeneratorName,
    GeneratorVersion,
    SchemaVersion,
}

/// A difference in document-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataDelta {
    pub field: MetadataField,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

/// Direction of a dependency-edge change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeChangeKind {
    Added,
    Removed,
}

/// A dependency edge that exists on one side only.
///
/// Endpoints use old-document identities where the component is matched,
/// so a version bump alone does not register as an edge change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeDelta {
    pub kind: EdgeChangeKind,
    pub from: ComponentId,
    pub to: ComponentId,
}

/// Counts by delta kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
    pub unchanged: usize,
}

impl DiffSummary {
    #[must_use]
    pub fn from_deltas(deltas: &[ComponentDelta]) -> Self {
        let mut summary = Self::default();
        for delta in deltas {
            match delta.kind {
                DeltaKind::Added => summary.added += 1,
                DeltaKind::Removed => summary.removed += 1,
                DeltaKind::Modified => summary.modified += 1,
                DeltaKind::Unchanged => summary.unchanged += 1,
            }
        }
        summary
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.added + self.removed + self.modified + self.unchanged
    }

    #[must_use]
    pub const fn has_changes(&self) -> bool {
        self.added + self.removed + self.modified > 0
    }
}

/// Complete diff of one ordered document pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct DiffResult {
    pub summary: DiffSummary,
    pub component_deltas: Vec<ComponentDelta>,
    pub metadata_deltas: Vec<MetadataDelta>,
    pub edge_deltas: Vec<EdgeDelta>,
}

impl DiffResult {
    pub fn new(
        component_deltas: Vec<ComponentDelta>,
        metadata_deltas: Vec<MetadataDelta>,
        edge_deltas: Vec<EdgeDelta>,
    ) -> Self {
        Self {
            summary: DiffSummary::from_deltas(&component_deltas),
            component_deltas,
            metadata_deltas,
            edge_deltas,
        }
    }

    /// Whether anything at all differs between the two documents.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.summary.has_changes()
            || !self.metadata_deltas.is_empty()
            || !self.edge_deltas.is_empty()
    }
}
