//! Findings and the closed set of rule categories.

use super::Severity;
use crate::error::{AibomDiffError, Result};
use crate::model::ComponentId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rule categories, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleCategory {
    UnsafeFormat,
    MissingLicense,
    LicenseChange,
    VulnerableDependency,
    ProvenanceGap,
    Other,
}

impl RuleCategory {
    /// Every category, in the order the classifier evaluates them.
    pub const ALL: [Self; 6] = [
        Self::UnsafeFormat,
        Self::MissingLicense,
        Self::LicenseChange,
        Self::VulnerableDependency,
        Self::ProvenanceGap,
        Self::Other,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnsafeFormat => "unsafe-format",
            Self::MissingLicense => "missing-license",
            Self::LicenseChange => "license-change",
            Self::VulnerableDependency => "vulnerable-dependency",
            Self::ProvenanceGap => "provenance-gap",
            Self::Other => "other",
        }
    }

    /// Parse a configured rule reference.
    ///
    /// Accepts the kebab-case name with either `-` or `_` separators.
    pub fn parse(name: &str) -> Result<Self> {
        let normalized = name.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| AibomDiffError::UnknownRuleReference {
                rule: name.to_string(),
                known: Self::ALL.map(Self::as_str).join(", "),
            })
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A severity-tagged observation about one delta.
///
/// Findings hold copies of everything they describe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub category: RuleCategory,
    /// Machine-readable rule identifier, e.g. `unsafe-format/denylisted`
    pub rule_id: String,
    pub message: String,
    /// Position of the referenced delta in the pair's delta list
    pub delta_index: usize,
    pub component: ComponentId,
    /// Advisory identifiers behind a vulnerable-dependency finding
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advisory_ids: Vec<String>,
}

impl Finding {
    pub fn new(
        category: RuleCategory,
        rule: &str,
        severity: Severity,
        delta_index: usize,
        component: ComponentId,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            rule_id: format!("{category}/{rule}"),
            message: message.into(),
            delta_index,
            component,
            advisory_ids: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_advisories(mut self, ids: Vec<String>) -> Self {
        self.advisory_ids = ids;
        self
    }
}

/// Finding counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub info: usize,
}

impl SeverityCounts {
    #[must_use]
    pub fn from_findings<'a>(findings: impl IntoIterator<Item = &'a Finding>) -> Self {
        let mut counts = Self::default();
        for finding in findings {
            counts.add(finding.severity);
        }
        counts
    }

    pub fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
            Severity::Info => self.info += 1,
        }
    }

    pub fn merge(&mut self, other: &Self) {
        self.critical += other.critical;
        self.high += other.high;
        self.medium += other.medium;
        self.low += other.low;
        self.info += other.info;
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low + self.info
    }
}
