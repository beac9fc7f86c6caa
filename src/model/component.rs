//! Component data structures.

use super::{ComponentId, ComponentType, LicenseExpression};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One inventoried element of an AIBOM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Identifier, unique within the owning document
    pub id: ComponentId,
    /// Serialized-tensor (or other artifact) format tag, lowercase
    pub format: Option<String>,
    /// Declared license
    pub license: Option<LicenseExpression>,
    /// Content checksum
    pub checksum: Option<Checksum>,
    /// Where the artifact came from
    #[serde(default)]
    pub provenance: Provenance,
    /// Supplier or author name
    pub supplier: Option<String>,
}

impl Component {
    /// Create a component with only its identity set.
    pub fn new(name: impl Into<String>, version: Option<String>, kind: ComponentType) -> Self {
        Self {
            id: ComponentId::new(name, version, kind),
            format: None,
            license: None,
            checksum: None,
            provenance: Provenance::default(),
            supplier: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.id.name
    }

    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.id.version.as_deref()
    }

    #[must_use]
    pub const fn kind(&self) -> &ComponentType {
        &self.id.kind
    }

    /// Builder-style format setter.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into().to_lowercase());
        self
    }

    /// Builder-style license setter.
    #[must_use]
    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = Some(LicenseExpression::new(license));
        self
    }

    /// Builder-style checksum setter.
    #[must_use]
    pub fn with_checksum(mut self, algorithm: impl Into<String>, value: impl Into<String>) -> Self {
        self.checksum = Some(Checksum::new(algorithm, value));
        self
    }

    /// Builder-style source commit setter.
    #[must_use]
    pub fn with_source_commit(mut self, commit: impl Into<String>) -> Self {
        self.provenance.source_commit = Some(commit.into());
        self
    }
}

/// A content hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Checksum {
    /// Algorithm tag, e.g. `SHA-256`
    pub algorithm: String,
    /// Hex digest, lowercase
    pub value: String,
}

impl Checksum {
    pub fn new(algorithm: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            algorithm: algorithm.into(),
            value: value.into().to_lowercase(),
        }
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.value)
    }
}

/// Provenance metadata for a component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub source_url: Option<String>,
    pub source_commit: Option<String>,
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// Infer an artifact format tag from a file name's extension.
///
/// PyTorch `.bin`/`.pt` checkpoints are pickle archives, so they share the
/// `pickle` tag.
#[must_use]
pub fn infer_format(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_lowercase();
    let format = match ext.as_str() {
        "safetensors" => "safetensors",
        "bin" | "pt" | "pth" | "pkl" | "pickle" | "ckpt" => "pickle",
        "joblib" => "joblib",
        "h5" | "hdf5" => "hdf5",
        "onnx" => "onnx",
        "gguf" => "gguf",
        "msgpack" => "msgpack",
        "npy" | "npz" => "numpy",
        "keras" => "keras",
        _ => return None,
    };
    Some(format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_format() {
        assert_eq!(infer_format("pytorch_model.bin"), Some("pickle"));
        assert_eq!(infer_format("model.SafeTensors"), Some("safetensors"));
        assert_eq!(infer_format("tokenizer.json"), None);
        assert_eq!(infer_format("README"), None);
    }

    #[test]
    fn test_builders_normalize() {
        let comp = Component::new("model.bin", None, ComponentType::ModelWeights)
            .with_format("Pickle")
            .with_checksum("SHA-256", "ABCD");
        assert_eq!(comp.format.as_deref(), Some("pickle"));
        assert_eq!(comp.checksum.unwrap().value, "abcd");
    }
}
