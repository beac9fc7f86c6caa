//! Diff engine implementation.

use super::{
    ChangedField, ComponentDelta, DeltaKind, DiffResult, EdgeChangeKind, EdgeDelta, FieldChange,
    MetadataDelta, MetadataField,
};
use crate::matching::{ComponentMatcher, FuzzyMatcher, MatchSet, MatcherConfig};
use crate::model::{AibomDocument, Component, ComponentId, DependencyEdge};
use std::collections::BTreeSet;

/// Computes deltas between an old and a new AIBOM document.
pub struct DiffEngine {
    matcher: Box<dyn ComponentMatcher>,
}

impl DiffEngine {
    /// Create a diff engine with the default fuzzy matcher.
    #[must_use]
    pub fn new() -> Self {
        Self::with_matcher_config(MatcherConfig::default())
    }

    #[must_use]
    pub fn with_matcher_config(config: MatcherConfig) -> Self {
        Self {
            matcher: Box::new(FuzzyMatcher::new(config)),
        }
    }

    /// Set a custom component matcher.
    #[must_use]
    pub fn with_matcher(mut self, matcher: Box<dyn ComponentMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// Align components of the two documents.
    #[must_use]
    pub fn match_documents(&self, old: &AibomDocument, new: &AibomDocument) -> MatchSet {
        self.matcher.match_documents(old, new)
    }

    /// Match and diff in one step.
    pub fn diff(&self, old: &AibomDocument, new: &AibomDocument) -> DiffResult {
        let matches = self.match_documents(old, new);
        Self::diff_with_matches(old, new, &matches)
    }

    /// Diff using an existing match set.
    pub fn diff_with_matches(
        old: &AibomDocument,
        new: &AibomDocument,
        matches: &MatchSet,
    ) -> DiffResult {
        DiffResult::new(
            diff_components(old, new, matches),
            diff_metadata(old, new),
            diff_edges(old, new, matches),
        )
    }
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// One delta per match-set entry, in canonical order.
///
/// Order: Added, Removed, Modified, Unchanged; within a group by the
/// new-side identifier, then the old-side identifier.
#[must_use]
pub fn diff_components(
    old: &AibomDocument,
    new: &AibomDocument,
    matches: &MatchSet,
) -> Vec<ComponentDelta> {
    let mut deltas: Vec<ComponentDelta> = matches
        .entries()
        .iter()
        .map(|m| {
            let old_comp = m.old.and_then(|i| old.component_at(i)).cloned();
            let new_comp = m.new.and_then(|j| new.component_at(j)).cloned();
            let (kind, changes) = match (&old_comp, &new_comp) {
                (Some(a), Some(b)) => {
                    let changes = compare_fields(a, b);
                    if changes.is_empty() {
                        (DeltaKind::Unchanged, changes)
                    } else {
                        (DeltaKind::Modified, changes)
                    }
                }
                (None, Some(_)) => (DeltaKind::Added, Vec::new()),
                _ => (DeltaKind::Removed, Vec::new()),
            };
            ComponentDelta {
                kind,
                old: old_comp,
                new: new_comp,
                match_tier: m.tier,
                match_score: m.score,
                changes,
            }
        })
        .collect();

    deltas.sort_by(|a, b| {
        a.kind
            .cmp(&b.kind)
            .then_with(|| side_id(&a.new).cmp(&side_id(&b.new)))
            .then_with(|| side_id(&a.old).cmp(&side_id(&b.old)))
    });
    deltas
}

fn side_id(comp: &Option<Component>) -> Option<&ComponentId> {
    comp.as_ref().map(|c| &c.id)
}

/// Field-by-field comparison of two matched components.
#[must_use]
pub fn compare_fields(old: &Component, new: &Component) -> Vec<FieldChange> {
    let mut changes = Vec::new();
    let mut push = |field, a: Option<String>, b: Option<String>| {
        if a != b {
            changes.push(FieldChange::new(field, a, b));
        }
    };

    push(
        ChangedField::Version,
        old.version().map(str::to_string),
        new.version().map(str::to_string),
    );
    push(ChangedField::Format, old.format.clone(), new.format.clone());
    push(
        ChangedField::License,
        old.license.as_ref().map(ToString::to_string),
        new.license.as_ref().map(ToString::to_string),
    );
    push(
        ChangedField::Checksum,
        old.checksum.as_ref().map(ToString::to_string),
        new.checksum.as_ref().map(ToString::to_string),
    );
    push(
        ChangedField::SourceUrl,
        old.provenance.source_url.clone(),
        new.provenance.source_url.clone(),
    );
    push(
        ChangedField::SourceCommit,
        old.provenance.source_commit.clone(),
        new.provenance.source_commit.clone(),
    );
    push(
        ChangedField::UploadedAt,
        old.provenance.uploaded_at.map(|t| t.to_rfc3339()),
        new.provenance.uploaded_at.map(|t| t.to_rfc3339()),
    );
    changes
}

/// Differences in subject, generator and schema version.
///
/// Generation timestamps always differ between runs and are not compared.
#[must_use]
pub fn diff_metadata(old: &AibomDocument, new: &AibomDocument) -> Vec<MetadataDelta> {
    let (a, b) = (&old.metadata, &new.metadata);
    let fields = [
        (
            MetadataField::Subject,
            Some(a.subject.clone()),
            Some(b.subject.clone()),
        ),
        (
            MetadataField::GeneratorName,
            a.generator.as_ref().map(|g| g.name.clone()),
            b.generator.as_ref().map(|g| g.name.clone()),
        ),
        (
            MetadataField::GeneratorVersion,
            a.generator.as_ref().and_then(|g| g.version.clone()),
            b.generator.as_ref().and_then(|g| g.version.clone()),
        ),
        (
            MetadataField::SchemaVersion,
            Some(a.schema_version.clone()),
            Some(b.schema_version.clone()),
        ),
    ];

    fields
        .into_iter()
        .filter(|(_, old_value, new_value)| old_value != new_value)
        .map(|(field, old_value, new_value)| MetadataDelta {
            field,
            old_value,
            new_value,
        })
        .collect()
}

/// Dependency edges present on one side only, in old-document identities.
#[must_use]
pub fn diff_edges(old: &AibomDocument, new: &AibomDocument, matches: &MatchSet) -> Vec<EdgeDelta> {
    let to_old_identity = |id: &ComponentId| -> ComponentId {
        new.components
            .get_index_of(id)
            .and_then(|j| matches.partner_of_new(j))
            .and_then(|i| old.component_at(i))
            .map_or_else(|| id.clone(), |c| c.id.clone())
    };

    let old_edges: BTreeSet<&DependencyEdge> = old.edges.iter().collect();
    let new_edges: BTreeSet<DependencyEdge> = new
        .edges
        .iter()
        .map(|e| DependencyEdge {
            from: to_old_identity(&e.from),
            to: to_old_identity(&e.to),
        })
        .collect();

    let mut deltas: Vec<EdgeDelta> = new_edges
        .iter()
        .filter(|e| !old_edges.contains(e))
        .map(|e| EdgeDelta {
            kind: EdgeChangeKind::Added,
            from: e.from.clone(),
            to: e.to.clone(),
        })
        .chain(
            old_edges
                .iter()
                .filter(|e| !new_edges.contains(**e))
                .map(|e| EdgeDelta {
                    kind: EdgeChangeKind::Removed,
                    from: e.from.clone(),
                    to: e.to.clone(),
                }),
        )
        .collect();
    deltas.sort();
    deltas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ComponentType, DocumentMetadata, Generator};

    fn doc(components: Vec<Component>, edges: Vec<(usize, usize)>) -> AibomDocument {
        let ids: Vec<ComponentId> = components.iter().map(|c| c.id.clone()).collect();
        let edges = edges
            .into_iter()
            .map(|(f, t)| DependencyEdge {
                from: ids[f].clone(),
                to: ids[t].clone(),
            })
            .collect();
        let map = components.into_iter().map(|c| (c.id.clone(), c)).collect();
        AibomDocument::from_parts(DocumentMetadata::new("org/model", "1.5"), map, edges, vec![])
    }

    fn lib(name: &str, version: &str) -> Component {
        Component::new(name, Some(version.to_string()), ComponentType::Library)
    }

    #[test]
    fn test_self_diff_is_unchanged() {
        let a = doc(vec![lib("torch", "2.1.0"), lib("numpy", "1.26.0")], vec![(0, 1)]);
        let result = DiffEngine::new().diff(&a, &a);
        assert!(result
            .component_deltas
            .iter()
            .all(|d| d.kind == DeltaKind::Unchanged));
        assert!(result.metadata_deltas.is_empty());
        assert!(result.edge_deltas.is_empty());
        assert!(!result.has_changes());
    }

    #[test]
    fn test_modified_carries_every_changed_field() {
        let a = doc(
            vec![Component::new("weights.bin", None, ComponentType::ModelWeights)
                .with_format("pickle")
                .with_license("MIT")],
            vec![],
        );
        let b = doc(
            vec![Component::new("weights.bin", None, ComponentType::ModelWeights)
                .with_format("safetensors")],
            vec![],
        );
        let result = DiffEngine::new().diff(&a, &b);
        assert_eq!(result.component_deltas.len(), 1);
        let delta = &result.component_deltas[0];
        assert_eq!(delta.kind, DeltaKind::Modified);
        assert_eq!(delta.changes.len(), 2);
        assert!(delta.has_change(ChangedField::Format));
        assert_eq!(
            delta.change(ChangedField::License).and_then(|c| c.old_value.as_deref()),
            Some("MIT")
        );
    }

    #[test]
    fn test_ordering_and_completeness() {
        let a = doc(vec![lib("zlib", "1.0"), lib("numpy", "1.0"), lib("torch", "2.0")], vec![]);
        let b = doc(
            vec![lib("torch", "2.1"), lib("numpy", "1.0"), lib("accelerate", "0.2")],
            vec![],
        );
        let result = DiffEngine::new().diff(&a, &b);
        let kinds: Vec<_> = result.component_deltas.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DeltaKind::Added,
                DeltaKind::Removed,
                DeltaKind::Modified,
                DeltaKind::Unchanged
            ]
        );
        assert_eq!(result.summary.total(), 4);
    }

    #[test]
    fn test_checksum_change_always_reported() {
        let a = doc(vec![lib("torch", "2.0").with_checksum("SHA-256", "aa")], vec![]);
        let b = doc(vec![lib("torch", "2.0").with_checksum("SHA-256", "bb")], vec![]);
        let result = DiffEngine::new().diff(&a, &b);
        assert!(result.component_deltas[0].has_change(ChangedField::Checksum));
    }

    #[test]
    fn test_metadata_deltas() {
        let a = doc(vec![lib("torch", "2.0")], vec![]);
        let mut b = doc(vec![lib("torch", "2.0")], vec![]);
        b.metadata.schema_version = "1.6".to_string();
        b.metadata.generator = Some(Generator {
            vendor: None,
            name: "aibom-generator".to_string(),
            version: Some("2.0".to_string()),
        });
        let deltas = diff_metadata(&a, &b);
        let fields: Vec<_> = deltas.iter().map(|d| d.field).collect();
        assert_eq!(
            fields,
            vec![
                MetadataField::GeneratorName,
                MetadataField::GeneratorVersion,
                MetadataField::SchemaVersion
            ]
        );
    }

    #[test]
    fn test_edge_deltas_use_matched_identities() {
        // torch bumps version; the torch -> numpy edge must not be reported
        let a = doc(vec![lib("torch", "2.0"), lib("numpy", "1.0")], vec![(0, 1)]);
        let b = doc(
            vec![lib("torch", "2.1"), lib("numpy", "1.0"), lib("triton", "2.1")],
            vec![(0, 1), (0, 2)],
        );
        let result = DiffEngine::new().diff(&a, &b);
        assert_eq!(result.edge_deltas.len(), 1);
        let edge = &result.edge_deltas[0];
        assert_eq!(edge.kind, EdgeChangeKind::Added);
        assert_eq!(edge.from.version.as_deref(), Some("2.0"));
        assert_eq!(edge.to.name, "triton");
    }
}
