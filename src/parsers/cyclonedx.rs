//! CycloneDX-shaped AIBOM parser.
//!
//! Accepts the JSON emitted by AIBOM generators (CycloneDX 1.4 through 1.6,
//! including the generator-specific `dependencies` entries that list
//! frameworks by name) and validates it into an [`AibomDocument`].

use crate::error::{AibomDiffError, DocumentErrorKind, ErrorContext, OptionContext, Result};
use crate::model::{
    infer_format, AibomDocument, Checksum, Component, ComponentId, ComponentType,
    DependencyEdge, DocumentMetadata, EmbeddedVulnerability, Generator, LicenseExpression,
    Provenance, SUPPORTED_SCHEMA_VERSIONS,
};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;

const FORMAT_PROPERTIES: &[&str] = &["aibom:format", "aibom:serialization-format"];
const SOURCE_URL_PROPERTIES: &[&str] = &["aibom:source-url", "aibom:download-url"];
const COMMIT_PROPERTIES: &[&str] = &["aibom:source-commit", "aibom:commit", "aibom:revision"];
const UPLOADED_AT_PROPERTIES: &[&str] = &["aibom:uploaded-at", "aibom:upload-timestamp"];

/// Reference types that point at an artifact's origin, in priority order.
const SOURCE_REF_TYPES: &[&str] = &["distribution", "vcs", "website"];

/// Parser for CycloneDX-shaped AIBOM documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct CycloneDxAibomParser;

impl CycloneDxAibomParser {
    pub const fn new() -> Self {
        Self
    }

    /// Parse and validate a document from a JSON string.
    pub fn parse_str(&self, content: &str) -> Result<AibomDocument> {
        let bom: CdxBom = serde_json::from_str(content)?;
        self.convert(bom)
    }

    /// Parse and validate a document from an already-decoded JSON value.
    pub fn parse_value(&self, value: serde_json::Value) -> Result<AibomDocument> {
        let bom: CdxBom = serde_json::from_value(value)?;
        self.convert(bom)
    }

    fn convert(&self, bom: CdxBom) -> Result<AibomDocument> {
        if let Some(format) = &bom.bom_format {
            if !format.eq_ignore_ascii_case("CycloneDX") {
                return Err(AibomDiffError::document(
                    "bomFormat",
                    DocumentErrorKind::UnsupportedFormat(format.clone()),
                ));
            }
        }

        let schema_version = bom.spec_version.as_deref().required("specVersion", "document")?;
        check_schema_version(schema_version)?;

        let metadata = self.convert_metadata(&bom, schema_version)?;

        let mut components: IndexMap<ComponentId, Component> = IndexMap::new();
        let mut refs: HashMap<String, ComponentId> = HashMap::new();

        let named_dependencies = bom.dependencies.iter().filter_map(|entry| match entry {
            CdxDependencyEntry::Named(comp) => Some(comp),
            CdxDependencyEntry::Graph { .. } => None,
        });

        for (index, raw) in bom.components.iter().enumerate() {
            let component = convert_component(raw, None)
                .with_context(|| format!("components[{index}]"))?;
            insert_unique(&mut components, &mut refs, raw, component)?;
        }
        for (index, raw) in named_dependencies.enumerate() {
            let component = convert_component(raw, Some(ComponentType::Library))
                .with_context(|| format!("dependencies[{index}]"))?;
            insert_unique(&mut components, &mut refs, raw, component)?;
        }

        if components.is_empty() {
            return Err(AibomDiffError::missing_field("components", "document"));
        }

        let edges = convert_edges(&bom.dependencies, &refs);
        let vulnerabilities = bom
            .vulnerabilities
            .iter()
            .map(|raw| convert_vulnerability(raw, &refs, &components))
            .collect();

        let doc = AibomDocument::from_parts(metadata, components, edges, vulnerabilities);
        tracing::debug!(
            subject = doc.subject(),
            components = doc.component_count(),
            edges = doc.edges.len(),
            "Parsed AIBOM document"
        );
        Ok(doc)
    }

    fn convert_metadata(&self, bom: &CdxBom, schema_version: &str) -> Result<DocumentMetadata> {
        let meta = bom.metadata.as_ref();
        let subject_comp = meta.and_then(|m| m.component.as_ref());
        let subject = subject_comp
            .and_then(|c| c.name.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .required("metadata.component.name", "document")?;

        let generator = meta
            .and_then(|m| m.tools.as_ref())
            .and_then(CdxTools::first)
            .and_then(|tool| {
                tool.name.as_ref().map(|name| Generator {
                    vendor: tool.vendor.clone().or_else(|| tool.publisher.clone()),
                    name: name.clone(),
                    version: tool.version.clone(),
                })
            });

        Ok(DocumentMetadata {
            subject: subject.to_string(),
            subject_version: subject_comp.and_then(|c| normalize_version(c.version.as_deref())),
            subject_license: subject_comp.and_then(first_license),
            schema_version: schema_version.to_string(),
            serial_number: bom.serial_number.clone(),
            generated_at: meta
                .and_then(|m| m.timestamp.as_deref())
                .and_then(parse_timestamp),
            generator,
        })
    }
}

/// Validate a declared `specVersion` against the supported range.
fn check_schema_version(version: &str) -> Result<()> {
    let ((min_major, min_minor), (max_major, max_minor)) = SUPPORTED_SCHEMA_VERSIONS;
    let supported = format!("{min_major}.{min_minor}-{max_major}.{max_minor}");
    let unsupported = || {
        AibomDiffError::document(
            "specVersion",
            DocumentErrorKind::UnsupportedSchemaVersion {
                version: version.to_string(),
                supported: supported.clone(),
            },
        )
    };

    let mut parts = version.trim().split('.');
    let major: u64 = parts
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or_else(unsupported)?;
    let minor: u64 = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);

    if (major, minor) < (min_major, min_minor) || (major, minor) > (max_major, max_minor) {
        return Err(unsupported());
    }
    Ok(())
}

fn insert_unique(
    components: &mut IndexMap<ComponentId, Component>,
    refs: &mut HashMap<String, ComponentId>,
    raw: &CdxComponent,
    component: Component,
) -> Result<()> {
    let id = component.id.clone();
    if components.contains_key(&id) {
        return Err(AibomDiffError::document(
            "components",
            DocumentErrorKind::DuplicateComponent(id.to_string()),
        ));
    }
    let bom_ref = raw.bom_ref.clone().unwrap_or_else(|| id.name.clone());
    refs.insert(bom_ref, id.clone());
    components.insert(id, component);
    Ok(())
}

fn convert_component(raw: &CdxComponent, default_kind: Option<ComponentType>) -> Result<Component> {
    let name = raw
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .required("name", "component")?;

    let kind = match (&raw.kind, default_kind) {
        (Some(tag), _) => ComponentType::from_tag(tag),
        (None, Some(kind)) => kind,
        (None, None) => ComponentType::Other("unspecified".to_string()),
    };

    let format = property(raw, FORMAT_PROPERTIES)
        .map(str::to_lowercase)
        .or_else(|| infer_format(name).map(str::to_string));

    let provenance = Provenance {
        source_url: property(raw, SOURCE_URL_PROPERTIES)
            .map(str::to_string)
            .or_else(|| source_reference(raw)),
        source_commit: property(raw, COMMIT_PROPERTIES).map(str::to_string),
        uploaded_at: property(raw, UPLOADED_AT_PROPERTIES).and_then(parse_timestamp),
    };

    Ok(Component {
        id: ComponentId::new(name, normalize_version(raw.version.as_deref()), kind),
        format,
        license: first_license(raw),
        checksum: preferred_checksum(raw),
        provenance,
        supplier: raw.supplier.as_ref().and_then(CdxSupplier::name),
    })
}

fn convert_edges(
    entries: &[CdxDependencyEntry],
    refs: &HashMap<String, ComponentId>,
) -> Vec<DependencyEdge> {
    let mut edges = Vec::new();
    for entry in entries {
        let CdxDependencyEntry::Graph { reference, depends_on } = entry else {
            continue;
        };
        let Some(from) = refs.get(reference) else {
            tracing::debug!(reference, "Skipping dependency entry with unresolved ref");
            continue;
        };
        for target in depends_on {
            match refs.get(target) {
                Some(to) => edges.push(DependencyEdge {
                    from: from.clone(),
                    to: to.clone(),
                }),
                None => tracing::debug!(target, "Skipping edge to unresolved ref"),
            }
        }
    }
    edges.sort();
    edges.dedup();
    edges
}

fn convert_vulnerability(
    raw: &CdxVulnerability,
    refs: &HashMap<String, ComponentId>,
    components: &IndexMap<ComponentId, Component>,
) -> EmbeddedVulnerability {
    let rating = raw.ratings.iter().find(|r| r.score.is_some() || r.severity.is_some());
    let id = raw.id.clone().unwrap_or_else(|| "UNIDENTIFIED".to_string());

    let mut affects: Vec<ComponentId> = Vec::with_capacity(raw.affects.len());
    for affected in &raw.affects {
        let reference = affected.reference.as_str();
        let resolved = refs
            .get(reference)
            .or_else(|| components.keys().find(|key| key.name == reference))
            .cloned();
        match resolved {
            Some(component) if !affects.contains(&component) => affects.push(component),
            Some(_) => {}
            None => {
                tracing::debug!(vulnerability = %id, reference, "Dropping unresolved affects ref");
            }
        }
    }

    EmbeddedVulnerability {
        id,
        severity: rating.and_then(|r| r.severity.clone()),
        score: rating.and_then(|r| r.score),
        description: raw.description.clone(),
        affects,
    }
}

fn property<'a>(raw: &'a CdxComponent, names: &[&str]) -> Option<&'a str> {
    raw.properties
        .iter()
        .flatten()
        .find(|p| names.iter().any(|n| p.name.eq_ignore_ascii_case(n)))
        .map(|p| p.value.trim())
        .filter(|v| !v.is_empty())
}

fn source_reference(raw: &CdxComponent) -> Option<String> {
    let refs = raw.external_references.as_ref()?;
    SOURCE_REF_TYPES.iter().find_map(|wanted| {
        refs.iter()
            .find(|r| r.ref_type.eq_ignore_ascii_case(wanted))
            .map(|r| r.url.clone())
    })
}

fn first_license(raw: &CdxComponent) -> Option<LicenseExpression> {
    raw.licenses.iter().flatten().find_map(|choice| {
        choice
            .expression
            .as_deref()
            .or_else(|| {
                choice
                    .license
                    .as_ref()
                    .and_then(|l| l.id.as_deref().or(l.name.as_deref()))
            })
            .and_then(LicenseExpression::from_declared)
    })
}

fn preferred_checksum(raw: &CdxComponent) -> Option<Checksum> {
    let hashes = raw.hashes.as_ref()?;
    hashes
        .iter()
        .find(|h| h.alg.eq_ignore_ascii_case("SHA-256"))
        .or_else(|| hashes.first())
        .filter(|h| !h.content.trim().is_empty())
        .map(|h| Checksum::new(h.alg.clone(), h.content.trim()))
}

/// Generators write `unknown` or `latest` when no real version exists.
fn normalize_version(version: Option<&str>) -> Option<String> {
    let v = version?.trim();
    if v.is_empty() || v.eq_ignore_ascii_case("unknown") || v.eq_ignore_ascii_case("latest") {
        None
    } else {
        Some(v.to_string())
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(value.trim()) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            tracing::debug!(value, error = %e, "Ignoring unparseable timestamp");
            None
        }
    }
}

// ============================================================================
// CycloneDX JSON structures
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxBom {
    bom_format: Option<String>,
    spec_version: Option<String>,
    serial_number: Option<String>,
    metadata: Option<CdxMetadata>,
    #[serde(default)]
    components: Vec<CdxComponent>,
    #[serde(default)]
    dependencies: Vec<CdxDependencyEntry>,
    #[serde(default)]
    vulnerabilities: Vec<CdxVulnerability>,
}

#[derive(Debug, Deserialize)]
struct CdxMetadata {
    timestamp: Option<String>,
    tools: Option<CdxTools>,
    component: Option<CdxComponent>,
}

/// `tools` is an array before CycloneDX 1.5 and an object afterwards.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CdxTools {
    Legacy(Vec<CdxTool>),
    Modern {
        #[serde(default)]
        components: Vec<CdxTool>,
    },
}

impl CdxTools {
    fn first(&self) -> Option<&CdxTool> {
        match self {
            Self::Legacy(tools) => tools.first(),
            Self::Modern { components } => components.first(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CdxTool {
    vendor: Option<String>,
    publisher: Option<String>,
    name: Option<String>,
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CdxComponent {
    #[serde(rename = "type")]
    kind: Option<String>,
    name: Option<String>,
    version: Option<String>,
    #[serde(rename = "bom-ref")]
    bom_ref: Option<String>,
    supplier: Option<CdxSupplier>,
    licenses: Option<Vec<CdxLicenseChoice>>,
    hashes: Option<Vec<CdxHash>>,
    external_references: Option<Vec<CdxExternalRef>>,
    properties: Option<Vec<CdxProperty>>,
}

/// Generators emit the supplier either as a bare string or an organization.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CdxSupplier {
    Name(String),
    Organization { name: Option<String> },
}

impl CdxSupplier {
    fn name(&self) -> Option<String> {
        match self {
            Self::Name(name) => Some(name.clone()),
            Self::Organization { name } => name.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CdxLicenseChoice {
    license: Option<CdxLicense>,
    expression: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxLicense {
    id: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CdxHash {
    alg: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct CdxExternalRef {
    #[serde(rename = "type")]
    ref_type: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct CdxProperty {
    name: String,
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CdxDependencyEntry {
    Graph {
        #[serde(rename = "ref")]
        reference: String,
        #[serde(default, rename = "dependsOn")]
        depends_on: Vec<String>,
    },
    Named(CdxComponent),
}

#[derive(Debug, Deserialize)]
struct CdxVulnerability {
    id: Option<String>,
    #[serde(default)]
    ratings: Vec<CdxRating>,
    description: Option<String>,
    #[serde(default)]
    affects: Vec<CdxAffects>,
}

#[derive(Debug, Deserialize)]
struct CdxRating {
    severity: Option<String>,
    score: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CdxAffects {
    #[serde(rename = "ref")]
    reference: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn minimal(spec_version: &str) -> String {
        format!(
            r#"{{
                "bomFormat": "CycloneDX",
                "specVersion": "{spec_version}",
                "metadata": {{ "component": {{ "type": "machine-learning-model", "name": "org/model" }} }},
                "components": [ {{ "type": "model-weights", "name": "model.safetensors" }} ]
            }}"#
        )
    }

    #[test]
    fn test_parse_minimal() {
        let doc = CycloneDxAibomParser::new().parse_str(&minimal("1.5")).unwrap();
        assert_eq!(doc.subject(), "org/model");
        assert_eq!(doc.component_count(), 1);
        let comp = doc.component_at(0).unwrap();
        assert_eq!(comp.format.as_deref(), Some("safetensors"));
        assert_eq!(comp.kind(), &ComponentType::ModelWeights);
    }

    #[test]
    fn test_schema_version_range() {
        let parser = CycloneDxAibomParser::new();
        assert!(parser.parse_str(&minimal("1.4")).is_ok());
        assert!(parser.parse_str(&minimal("1.6")).is_ok());
        for bad in ["1.3", "1.7", "2.0", "abc"] {
            let err = parser.parse_str(&minimal(bad)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnsupportedSchemaVersion, "{bad}");
        }
    }

    #[test]
    fn test_missing_subject_is_malformed() {
        let json = r#"{"specVersion": "1.5", "components": [{"name": "a.bin"}]}"#;
        let err = CycloneDxAibomParser::new().parse_str(json).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDocument);
        assert!(err.to_string().contains("Invalid AIBOM document"));
    }

    #[test]
    fn test_missing_components_is_malformed() {
        let json = r#"{"specVersion": "1.5", "metadata": {"component": {"name": "m"}}, "components": []}"#;
        let err = CycloneDxAibomParser::new().parse_str(json).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDocument);
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = CycloneDxAibomParser::new().parse_str("{not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedDocument);
    }

    #[test]
    fn test_duplicate_identifier_is_malformed() {
        let json = r#"{
            "specVersion": "1.5",
            "metadata": {"component": {"name": "m"}},
            "components": [
                {"type": "configuration", "name": "config.json"},
                {"type": "configuration", "name": "config.json"}
            ]
        }"#;
        let err = CycloneDxAibomParser::new().parse_str(json).unwrap_err();
        assert!(matches!(
            err,
            AibomDiffError::Document {
                source: DocumentErrorKind::DuplicateComponent(_),
                ..
            }
        ));
    }

    #[test]
    fn test_generator_fields_and_named_dependencies() {
        let json = r#"{
            "bomFormat": "CycloneDX",
            "specVersion": "1.5",
            "serialNumber": "urn:uuid:1234",
            "metadata": {
                "timestamp": "2024-01-01T00:00:00Z",
                "tools": [{"vendor": "OWASP", "name": "AIBOM Generator", "version": "1.0.0"}],
                "component": {"type": "machine-learning-model", "name": "org/model", "version": "latest",
                              "licenses": [{"license": {"name": "unknown"}}]}
            },
            "components": [{
                "type": "model-weights",
                "name": "pytorch_model.bin",
                "version": "unknown",
                "supplier": "org",
                "licenses": [{"license": {"id": "Apache-2.0"}}],
                "hashes": [{"alg": "MD5", "content": "aa"}, {"alg": "SHA-256", "content": "BB"}],
                "externalReferences": [{"type": "website", "url": "https://w"}, {"type": "vcs", "url": "https://v"}],
                "properties": [{"name": "aibom:source-commit", "value": "abc123"}]
            }],
            "dependencies": [{"type": "framework", "name": "transformers", "version": "unknown"}]
        }"#;
        let doc = CycloneDxAibomParser::new().parse_str(json).unwrap();
        assert_eq!(doc.metadata.generator.as_ref().unwrap().name, "AIBOM Generator");
        assert!(doc.metadata.subject_license.is_none());
        assert!(doc.metadata.subject_version.is_none());
        assert!(doc.metadata.generated_at.is_some());
        assert_eq!(doc.component_count(), 2);

        let weights = doc.component_at(0).unwrap();
        assert_eq!(weights.version(), None);
        assert_eq!(weights.format.as_deref(), Some("pickle"));
        assert_eq!(weights.checksum.as_ref().unwrap().value, "bb");
        assert_eq!(weights.provenance.source_url.as_deref(), Some("https://v"));
        assert_eq!(weights.provenance.source_commit.as_deref(), Some("abc123"));
        assert_eq!(weights.supplier.as_deref(), Some("org"));

        let framework = doc.component_at(1).unwrap();
        assert_eq!(framework.kind(), &ComponentType::Library);
        assert_eq!(framework.name(), "transformers");
    }

    #[test]
    fn test_graph_edges_resolve_refs() {
        let json = r#"{
            "specVersion": "1.6",
            "metadata": {"component": {"name": "m"}},
            "components": [
                {"type": "library", "name": "torch", "version": "2.1.0", "bom-ref": "pkg:pypi/torch@2.1.0"},
                {"type": "library", "name": "numpy", "version": "1.26.0"}
            ],
            "dependencies": [
                {"ref": "pkg:pypi/torch@2.1.0", "dependsOn": ["numpy", "missing"]}
            ]
        }"#;
        let doc = CycloneDxAibomParser::new().parse_str(json).unwrap();
        assert_eq!(doc.edges.len(), 1);
        assert_eq!(doc.edges[0].from.name, "torch");
        assert_eq!(doc.edges[0].to.name, "numpy");
    }

    #[test]
    fn test_embedded_vulnerabilities() {
        let json = r#"{
            "specVersion": "1.5",
            "metadata": {"component": {"name": "m"}},
            "components": [{"type": "source-code", "name": "pickle_loader.py"}],
            "vulnerabilities": [{
                "id": "AIBOM-1",
                "ratings": [{"severity": "high", "method": "other"}],
                "affects": [{"ref": "pickle_loader.py"}]
            }]
        }"#;
        let doc = CycloneDxAibomParser::new().parse_str(json).unwrap();
        let comp = doc.component_at(0).unwrap();
        let vulns: Vec<_> = doc.vulnerabilities_affecting(comp).collect();
        assert_eq!(vulns.len(), 1);
        assert_eq!(vulns[0].severity.as_deref(), Some("high"));
    }

    #[test]
    fn test_affects_resolve_through_bom_refs() {
        let json = r#"{
            "specVersion": "1.6",
            "metadata": {"component": {"name": "m"}},
            "components": [
                {"type": "library", "name": "torch", "version": "2.1.0", "bom-ref": "pkg:pypi/torch@2.1.0"},
                {"type": "library", "name": "numpy", "version": "1.26.0", "bom-ref": "pkg:pypi/numpy@1.26.0"}
            ],
            "vulnerabilities": [{
                "id": "CVE-2024-0001",
                "ratings": [{"severity": "critical"}],
                "affects": [{"ref": "pkg:pypi/torch@2.1.0"}, {"ref": "numpy"}, {"ref": "pkg:pypi/gone@1.0"}]
            }]
        }"#;
        let doc = CycloneDxAibomParser::new().parse_str(json).unwrap();
        let affects = &doc.vulnerabilities[0].affects;
        assert_eq!(affects.len(), 2);
        assert_eq!(affects[0].name, "torch");
        assert_eq!(affects[1].name, "numpy");

        let torch = doc.component_at(0).unwrap();
        assert_eq!(doc.vulnerabilities_affecting(torch).count(), 1);
    }

    #[test]
    fn test_license_markers() {
        let json = r#"{
            "specVersion": "1.5",
            "metadata": {"component": {"name": "m"}},
            "components": [
                {"type": "data", "name": "a.json", "licenses": [{"license": {"name": "unknown"}}]},
                {"type": "data", "name": "b.json", "licenses": [{"license": {"id": "NOASSERTION"}}]},
                {"type": "data", "name": "c.json", "licenses": [{"expression": "NONE"}]},
                {"type": "data", "name": "d.json", "licenses": [{"license": {"name": " "}}]},
                {"type": "data", "name": "e.json", "licenses": [{"license": {"name": "other"}}]},
                {"type": "data", "name": "f.json", "licenses": [{"expression": "MIT OR Apache-2.0"}]}
            ]
        }"#;
        let doc = CycloneDxAibomParser::new().parse_str(json).unwrap();
        let licenses: Vec<Option<String>> = doc
            .iter_components()
            .map(|c| c.license.as_ref().map(ToString::to_string))
            .collect();
        assert_eq!(
            licenses,
            vec![
                None,
                None,
                None,
                None,
                Some("other".to_string()),
                Some("MIT OR Apache-2.0".to_string()),
            ]
        );
    }
}
