//! Cross-document overview: what the analyzed models share and where they
//! differ, independent of pair direction.

use super::score::round2;
use crate::model::AibomDocument;
use crate::risk::Severity;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Per-document standing within the set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPosture {
    pub index: usize,
    pub label: String,
    pub subject: String,
    /// Components (`type:name`) found in no other valid document
    pub unique_components: Vec<String>,
    /// Distinct declared licenses (subject and components)
    pub licenses: Vec<String>,
    /// Risk score of the document compared against itself, 0-100
    pub posture_score: f64,
    pub risk_level: Severity,
}

/// Overview across every valid document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossDocumentOverview {
    /// Components (`type:name`) present in every valid document
    pub common_components: Vec<String>,
    pub documents: Vec<DocumentPosture>,
    /// Licenses declared by more than one valid document
    pub common_licenses: Vec<String>,
    /// Labels of documents declaring no license at all
    pub unlicensed_documents: Vec<String>,
    /// Label of the document with the highest posture score
    pub highest_risk: Option<String>,
    /// Label of the document with the lowest posture score
    pub lowest_risk: Option<String>,
}

/// A valid document as seen by the overview.
pub struct OverviewInput<'a> {
    pub index: usize,
    pub label: &'a str,
    pub document: &'a AibomDocument,
    pub posture_score: f64,
}

impl CrossDocumentOverview {
    #[must_use]
    pub fn build(inputs: &[OverviewInput<'_>]) -> Self {
        let keys: Vec<BTreeSet<String>> =
            inputs.iter().map(|i| component_keys(i.document)).collect();

        let common_components: Vec<String> = match keys.split_first() {
            Some((first, rest)) => first
                .iter()
                .filter(|k| rest.iter().all(|other| other.contains(*k)))
                .cloned()
                .collect(),
            None => Vec::new(),
        };

        let documents: Vec<DocumentPosture> = inputs
            .iter()
            .enumerate()
            .map(|(pos, input)| {
                let unique_components = keys[pos]
                    .iter()
                    .filter(|k| {
                        keys.iter()
                            .enumerate()
                            .all(|(other, set)| other == pos || !set.contains(*k))
                    })
                    .cloned()
                    .collect();
                let score = round2(input.posture_score);
                DocumentPosture {
                    index: input.index,
                    label: input.label.to_string(),
                    subject: input.document.subject().to_string(),
                    unique_components,
                    licenses: declared_licenses(input.document),
                    posture_score: score,
                    risk_level: Severity::from_risk_score(score),
                }
            })
            .collect();

        let mut license_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for license in documents.iter().flat_map(|d| &d.licenses) {
            *license_counts.entry(license.as_str()).or_insert(0) += 1;
        }
        let common_licenses = license_counts
            .into_iter()
            .filter(|&(_, count)| count > 1)
            .map(|(license, _)| license.to_string())
            .collect();

        let unlicensed_documents = documents
            .iter()
            .filter(|d| d.licenses.is_empty())
            .map(|d| d.label.clone())
            .collect();

        // Ties go to the earliest document.
        let mut highest: Option<&DocumentPosture> = None;
        let mut lowest: Option<&DocumentPosture> = None;
        for doc in &documents {
            if highest.map_or(true, |h| doc.posture_score > h.posture_score) {
                highest = Some(doc);
            }
            if lowest.map_or(true, |l| doc.posture_score < l.posture_score) {
                lowest = Some(doc);
            }
        }

        Self {
            common_components,
            highest_risk: highest.map(|d| d.label.clone()),
            lowest_risk: lowest.map(|d| d.label.clone()),
            common_licenses,
            documents,
            unlicensed_documents,
        }
    }
}

fn component_keys(doc: &AibomDocument) -> BTreeSet<String> {
    doc.iter_components()
        .map(|c| format!("{}:{}", c.kind(), c.name()))
        .collect()
}

fn declared_licenses(doc: &AibomDocument) -> Vec<String> {
    let mut licenses: BTreeSet<String> = doc
        .iter_components()
        .filter_map(|c| c.license.as_ref())
        .map(ToString::to_string)
        .collect();
    if let Some(subject) = &doc.metadata.subject_license {
        licenses.insert(subject.to_string());
    }
    licenses.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Component, ComponentType, DocumentMetadata};

    fn doc(subject: &str, components: Vec<Component>) -> AibomDocument {
        let map = components.into_iter().map(|c| (c.id.clone(), c)).collect();
        AibomDocument::from_parts(DocumentMetadata::new(subject, "1.5"), map, vec![], vec![])
    }

    #[test]
    fn test_overview() {
        let a = doc(
            "org/a",
            vec![
                Component::new("config.json", None, ComponentType::Configuration)
                    .with_license("MIT"),
                Component::new("model.bin", None, ComponentType::ModelWeights),
            ],
        );
        let b = doc(
            "org/b",
            vec![
                Component::new("config.json", None, ComponentType::Configuration),
                Component::new("model.safetensors", None, ComponentType::ModelWeights),
            ],
        );
        let overview = CrossDocumentOverview::build(&[
            OverviewInput {
                index: 0,
                label: "a.json",
                document: &a,
                posture_score: 40.0,
            },
            OverviewInput {
                index: 1,
                label: "b.json",
                document: &b,
                posture_score: 12.5,
            },
        ]);

        assert_eq!(overview.common_components, vec!["configuration:config.json"]);
        assert_eq!(overview.documents[0].unique_components, vec!["model-weights:model.bin"]);
        assert_eq!(overview.documents[0].licenses, vec!["MIT"]);
        assert!(overview.common_licenses.is_empty());
        assert_eq!(overview.unlicensed_documents, vec!["b.json"]);
        assert_eq!(overview.highest_risk.as_deref(), Some("a.json"));
        assert_eq!(overview.lowest_risk.as_deref(), Some("b.json"));
        assert_eq!(overview.documents[0].risk_level, Severity::Medium);
    }

    #[test]
    fn test_common_licenses() {
        let config = |license: &str| {
            Component::new("config.json", None, ComponentType::Configuration).with_license(license)
        };
        let a = doc("org/a", vec![config("MIT")]);
        let script =
            Component::new("x.py", None, ComponentType::SourceCode).with_license("Apache-2.0");
        let b = doc("org/b", vec![config("MIT"), script]);
        let c = doc("org/c", vec![config("other")]);
        let inputs: Vec<OverviewInput<'_>> = [("a", &a), ("b", &b), ("c", &c)]
            .into_iter()
            .enumerate()
            .map(|(index, (label, document))| OverviewInput {
                index,
                label,
                document,
                posture_score: 0.0,
            })
            .collect();
        let overview = CrossDocumentOverview::build(&inputs);

        assert_eq!(overview.common_licenses, vec!["MIT"]);
        assert_eq!(overview.documents[1].licenses, vec!["Apache-2.0", "MIT"]);
        assert!(overview.unlicensed_documents.is_empty());
    }

    #[test]
    fn test_empty() {
        let overview = CrossDocumentOverview::build(&[]);
        assert!(overview.common_components.is_empty());
        assert!(overview.highest_risk.is_none());
    }
}
