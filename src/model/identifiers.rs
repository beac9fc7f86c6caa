//! Component identity within an AIBOM document.
//!
//! A component is identified by its name, version and type. The identifier is
//! unique within its owning document and totally ordered so that diff output
//! can be sorted reproducibly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of inventoried element.
///
/// Unrecognized CycloneDX component types are preserved verbatim in
/// [`ComponentType::Other`] rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentType {
    ModelWeights,
    Tokenizer,
    Dataset,
    Library,
    Configuration,
    SourceCode,
    MachineLearningModel,
    Other(String),
}

impl ComponentType {
    /// Parse a component type tag, accepting the aliases emitted by common
    /// AIBOM generators (e.g. `framework` for a library dependency).
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "model-weights" | "weights" => Self::ModelWeights,
            "tokenizer" => Self::Tokenizer,
            "dataset" | "data" => Self::Dataset,
            "library" | "framework" | "dependency" => Self::Library,
            "configuration" | "config" => Self::Configuration,
            "source-code" | "file" => Self::SourceCode,
            "machine-learning-model" | "model" => Self::MachineLearningModel,
            other => Self::Other(other.to_string()),
        }
    }

    /// Canonical tag for this type.
    #[must_use]
    pub fn as_tag(&self) -> &str {
        match self {
            Self::ModelWeights => "model-weights",
            Self::Tokenizer => "tokenizer",
            Self::Dataset => "dataset",
            Self::Library => "library",
            Self::Configuration => "configuration",
            Self::SourceCode => "source-code",
            Self::MachineLearningModel => "machine-learning-model",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for ComponentType {
    fn from(value: String) -> Self {
        Self::from_tag(&value)
    }
}

impl From<ComponentType> for String {
    fn from(value: ComponentType) -> Self {
        value.as_tag().to_string()
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Identifier of a component: `type:name@version`.
///
/// Field order matters: the derived ordering sorts by name first, which keeps
/// related components adjacent in reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId {
    pub name: String,
    pub version: Option<String>,
    #[serde(rename = "type")]
    pub kind: ComponentType,
}

impl ComponentId {
    pub fn new(name: impl Into<String>, version: Option<String>, kind: ComponentType) -> Self {
        Self {
            name: name.into(),
            version,
            kind,
        }
    }

    /// Key used by the exact matching pass: version is deliberately excluded
    /// so that version bumps pair up.
    #[must_use]
    pub fn match_key(&self) -> (&str, &ComponentType) {
        (self.name.as_str(), &self.kind)
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.name)?;
        if let Some(version) = &self.version {
            write!(f, "@{version}")?;
        }
        Ok(())
    }
}
