//! Core AIBOM document structure.

use super::{Component, ComponentId, LicenseExpression};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

/// A parsed, validated AI Bill of Materials.
///
/// Documents are value objects: the engine only ever borrows them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AibomDocument {
    /// Document-level metadata
    pub metadata: DocumentMetadata,
    /// Components in declaration order, keyed by identifier
    pub components: IndexMap<ComponentId, Component>,
    /// Dependency edges between components
    pub edges: Vec<DependencyEdge>,
    /// Vulnerability records embedded by the generator
    pub vulnerabilities: Vec<EmbeddedVulnerability>,
    /// Content hash for quick equality checks
    pub content_hash: u64,
}

impl AibomDocument {
    /// Assemble a document from already-validated parts.
    ///
    /// Parsers are responsible for enforcing identifier uniqueness; use
    /// [`crate::parsers::parse_aibom_str`] for untrusted input.
    #[must_use]
    pub fn from_parts(
        metadata: DocumentMetadata,
        components: IndexMap<ComponentId, Component>,
        edges: Vec<DependencyEdge>,
        vulnerabilities: Vec<EmbeddedVulnerability>,
    ) -> Self {
        let mut doc = Self {
            metadata,
            components,
            edges,
            vulnerabilities,
            content_hash: 0,
        };
        doc.content_hash = doc.compute_content_hash();
        doc
    }

    /// Subject model identifier.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.metadata.subject
    }

    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Components in declaration order.
    pub fn iter_components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    /// Component at a declaration position.
    #[must_use]
    pub fn component_at(&self, index: usize) -> Option<&Component> {
        self.components.get_index(index).map(|(_, c)| c)
    }

    #[must_use]
    pub fn get_component(&self, id: &ComponentId) -> Option<&Component> {
        self.components.get(id)
    }

    /// Embedded vulnerability records that reference the given component.
    pub fn vulnerabilities_affecting<'a>(
        &'a self,
        component: &'a Component,
    ) -> impl Iterator<Item = &'a EmbeddedVulnerability> {
        self.vulnerabilities
            .iter()
            .filter(move |v| v.affects.contains(&component.id))
    }

    fn compute_content_hash(&self) -> u64 {
        let mut input = Vec::new();
        if let Ok(meta) = serde_json::to_vec(&self.metadata) {
            input.extend(meta);
        }
        for component in self.components.values() {
            if let Ok(bytes) = serde_json::to_vec(component) {
                input.extend(bytes);
            }
        }
        for edge in &self.edges {
            input.extend(edge.from.to_string().as_bytes());
            input.extend(edge.to.to_string().as_bytes());
        }
        xxh3_64(&input)
    }
}

/// Document-level metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Identifier of the model this AIBOM describes
    pub subject: String,
    /// Subject version, when declared
    pub subject_version: Option<String>,
    /// License declared for the subject model itself
    pub subject_license: Option<LicenseExpression>,
    /// Declared schema version (e.g. "1.5")
    pub schema_version: String,
    /// Serial number (`urn:uuid:...`)
    pub serial_number: Option<String>,
    /// Generation timestamp
    pub generated_at: Option<DateTime<Utc>>,
    /// Tool that produced the document
    pub generator: Option<Generator>,
}

impl DocumentMetadata {
    /// Minimal metadata for a subject, useful for building documents in code.
    pub fn new(subject: impl Into<String>, schema_version: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            subject_version: None,
            subject_license: None,
            schema_version: schema_version.into(),
            serial_number: None,
            generated_at: None,
            generator: None,
        }
    }
}

/// Tool that generated a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generator {
    pub vendor: Option<String>,
    pub name: String,
    pub version: Option<String>,
}

/// Directed dependency between two components of the same document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub from: ComponentId,
    pub to: ComponentId,
}

/// A vulnerability record embedded in the document by its generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedVulnerability {
    pub id: String,
    /// Textual severity as declared (`high`, `medium`, ...)
    pub severity: Option<String>,
    /// CVSS base score, when rated
    pub score: Option<f64>,
    pub description: Option<String>,
    /// Affected components, resolved from `bom-ref`s at parse time
    pub affects: Vec<ComponentId>,
}
