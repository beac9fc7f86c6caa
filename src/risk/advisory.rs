//! Known-vulnerable version ranges.
//!
//! An advisory feed is a YAML or JSON file:
//!
//! ```yaml
//! advisories:
//!   - id: GHSA-xxxx-yyyy-zzzz
//!     package: transformers
//!     affected: "<4.36.0"
//!     severity: high
//!     score: 8.8
//!     summary: Deserialization of untrusted data
//! ```
//!
//! Ranges use Cargo-style semver requirements. Component versions that are
//! not full semver (`2.1`, `v1.0`) are padded before comparison.

use super::Severity;
use crate::error::{AibomDiffError, Result};
use crate::model::{Component, EmbeddedVulnerability};
use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One vulnerable version range for a named package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    pub id: String,
    /// Package name, matched case-insensitively against component names
    pub package: String,
    pub affected: VersionReq,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub summary: Option<String>,
}

impl Advisory {
    /// Whether the advisory applies to a component.
    ///
    /// Components without a parseable version never match.
    #[must_use]
    pub fn affects(&self, component: &Component) -> bool {
        if !self.package.eq_ignore_ascii_case(component.name()) {
            return false;
        }
        component
            .version()
            .and_then(parse_lenient)
            .is_some_and(|v| self.affected.matches(&v))
    }

    #[must_use]
    pub fn resolved_severity(&self) -> Severity {
        Severity::resolve(self.severity.as_deref(), self.score)
    }
}

/// A loaded collection of advisories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryFeed {
    #[serde(default)]
    pub advisories: Vec<Advisory>,
}

impl AdvisoryFeed {
    #[must_use]
    pub fn new(advisories: Vec<Advisory>) -> Self {
        Self { advisories }
    }

    /// Load a feed from a YAML or JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AibomDiffError::io(path, e))?;
        let feed = Self::parse(&content)
            .map_err(|e| AibomDiffError::config(format!("{}: {e}", path.display())))?;
        tracing::debug!(
            path = %path.display(),
            advisories = feed.advisories.len(),
            "Loaded advisory feed"
        );
        Ok(feed)
    }

    /// Parse a feed from YAML (JSON is accepted as a YAML subset).
    pub fn parse(content: &str) -> std::result::Result<Self, serde_yaml_ng::Error> {
        serde_yaml_ng::from_str(content)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.advisories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.advisories.is_empty()
    }

    /// Advisories that apply to a component.
    pub fn matching<'a>(&'a self, component: &'a Component) -> impl Iterator<Item = &'a Advisory> {
        self.advisories.iter().filter(move |a| a.affects(component))
    }
}

/// A vulnerability hit from either the feed or the document itself.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisoryHit {
    pub id: String,
    pub severity: Severity,
}

impl From<&Advisory> for AdvisoryHit {
    fn from(advisory: &Advisory) -> Self {
        Self {
            id: advisory.id.clone(),
            severity: advisory.resolved_severity(),
        }
    }
}

impl From<&EmbeddedVulnerability> for AdvisoryHit {
    fn from(vuln: &EmbeddedVulnerability) -> Self {
        Self {
            id: vuln.id.clone(),
            severity: Severity::resolve(vuln.severity.as_deref(), vuln.score),
        }
    }
}

/// Parse a version, padding missing minor/patch parts.
#[must_use]
pub fn parse_lenient(version: &str) -> Option<Version> {
    let trimmed = version.trim().trim_start_matches(['v', 'V']);
    if let Ok(v) = Version::parse(trimmed) {
        return Some(v);
    }
    let (core, rest) = match trimmed.find(['-', '+']) {
        Some(pos) => trimmed.split_at(pos),
        None => (trimmed, ""),
    };
    let padded = match core.matches('.').count() {
        0 => format!("{core}.0.0{rest}"),
        1 => format!("{core}.0{rest}"),
        _ => return None,
    };
    Version::parse(&padded).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ComponentType;

    fn lib(name: &str, version: Option<&str>) -> Component {
        Component::new(name, version.map(str::to_string), ComponentType::Library)
    }

    const FEED: &str = r#"
advisories:
  - id: GHSA-0001
    package: transformers
    affected: "<4.36.0"
    severity: high
  - id: GHSA-0002
    package: torch
    affected: ">=1.0.0, <2.2.0"
    score: 9.8
"#;

    #[test]
    fn test_parse_lenient() {
        assert_eq!(parse_lenient("2.1"), Some(Version::new(2, 1, 0)));
        assert_eq!(parse_lenient("v3"), Some(Version::new(3, 0, 0)));
        assert_eq!(parse_lenient("1.2.3"), Some(Version::new(1, 2, 3)));
        assert!(parse_lenient("2.1-rc1").is_some());
        assert_eq!(parse_lenient("latest"), None);
        assert_eq!(parse_lenient("1.2.3.4"), None);
    }

    #[test]
    fn test_feed_matching() {
        let feed = AdvisoryFeed::parse(FEED).unwrap();
        assert_eq!(feed.len(), 2);

        let old_tf = lib("Transformers", Some("4.30.0"));
        let ids: Vec<_> = feed.matching(&old_tf).map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["GHSA-0001"]);

        assert_eq!(feed.matching(&lib("transformers", Some("4.36.0"))).count(), 0);
        assert_eq!(feed.matching(&lib("transformers", None)).count(), 0);

        let torch = lib("torch", Some("2.1"));
        let hit: Vec<AdvisoryHit> = feed.matching(&torch).map(AdvisoryHit::from).collect();
        assert_eq!(hit[0].severity, Severity::Critical);
    }

    #[test]
    fn test_feed_accepts_json() {
        let json = r#"{"advisories": [{"id": "X-1", "package": "numpy", "affected": "<1.22.0"}]}"#;
        let feed = AdvisoryFeed::parse(json).unwrap();
        assert_eq!(feed.advisories[0].resolved_severity(), Severity::Medium);
    }

    #[test]
    fn test_invalid_range_rejected() {
        let bad = "advisories:\n  - id: X\n    package: numpy\n    affected: \"not a range\"\n";
        assert!(AdvisoryFeed::parse(bad).is_err());
    }

    #[test]
    fn test_from_path_reports_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed.yaml");
        std::fs::write(&path, "advisories: 3").unwrap();
        let err = AdvisoryFeed::from_path(&path).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Config);
    }
}
