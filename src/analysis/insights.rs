//! Narrative insights layered on top of a finished analysis.
//!
//! Insights are text for humans. They are derived from an
//! [`AnalysisResult`] after it is built and never feed back into deltas,
//! findings or scores.

use super::AnalysisResult;
use crate::error::Result;
use crate::risk::{RuleCategory, Severity};
use serde::{Deserialize, Serialize};

/// Human-readable commentary on an analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeInsights {
    pub summary: String,
    pub key_differences: Vec<String>,
    pub security_recommendations: Vec<String>,
    pub best_practices: Vec<String>,
    pub risk_assessment: String,
}

impl NarrativeInsights {
    /// Placeholder used when a provider fails.
    #[must_use]
    pub fn limited() -> Self {
        Self {
            summary: "Comparison analysis completed with limited insights".to_string(),
            key_differences: vec!["Manual analysis required".to_string()],
            security_recommendations: vec!["Review all models for security issues".to_string()],
            best_practices: vec!["Follow ML security best practices".to_string()],
            risk_assessment: "Unable to assess risk automatically".to_string(),
        }
    }
}

/// Source of narrative insights (a language model, a template engine, ...).
pub trait InsightProvider: Send + Sync {
    fn generate(&self, result: &AnalysisResult) -> Result<NarrativeInsights>;

    /// Short name for logging.
    fn name(&self) -> &'static str;
}

/// Deterministic insights computed from findings alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBasedInsights;

impl InsightProvider for RuleBasedInsights {
    fn generate(&self, result: &AnalysisResult) -> Result<NarrativeInsights> {
        Ok(NarrativeInsights {
            summary: summary(result),
            key_differences: key_differences(result),
            security_recommendations: recommendations(result),
            best_practices: best_practices(result),
            risk_assessment: risk_assessment(result),
        })
    }

    fn name(&self) -> &'static str {
        "rule-based"
    }
}

fn summary(result: &AnalysisResult) -> String {
    let valid = result.documents.iter().filter(|d| d.valid).count();
    let mut text = format!(
        "Compared {valid} of {} document(s) in {} pair(s); overall risk is {} (score {:.2}).",
        result.documents.len(),
        result.summary.pairs_compared,
        result.summary.risk_level,
        result.summary.score
    );
    if !result.failures.is_empty() {
        text.push_str(&format!(
            " {} input(s) could not be analyzed.",
            result.failures.len()
        ));
    }
    text
}

fn key_differences(result: &AnalysisResult) -> Vec<String> {
    let mut lines: Vec<String> = result
        .pairs
        .iter()
        .filter(|p| p.diff.has_changes())
        .map(|p| {
            let s = &p.diff.summary;
            format!(
                "{} -> {}: {} added, {} removed, {} modified",
                result.document_label(p.old),
                result.document_label(p.new),
                s.added,
                s.removed,
                s.modified
            )
        })
        .collect();

    let common = result.overview.common_components.len();
    if common > 0 {
        lines.push(format!("{common} component(s) are shared by every model"));
    }
    for doc in &result.overview.documents {
        if !doc.unique_components.is_empty() {
            lines.push(format!(
                "{} has {} unique component(s)",
                doc.label,
                doc.unique_components.len()
            ));
        }
    }
    if lines.is_empty() {
        lines.push("No component differences detected".to_string());
    }
    lines
}

fn recommendations(result: &AnalysisResult) -> Vec<String> {
    let counts = &result.summary.category_counts;
    let present = |c: RuleCategory| counts.get(&c).copied().unwrap_or(0) > 0;
    let critical_unsafe = result
        .all_findings()
        .any(|f| f.category == RuleCategory::UnsafeFormat && f.severity == Severity::Critical);

    let mut out = Vec::new();
    if critical_unsafe {
        out.push(
            "Convert pickle-based weights to safetensors and avoid loading untrusted pickle files"
                .to_string(),
        );
    }
    if present(RuleCategory::VulnerableDependency) {
        let mut ids: Vec<&str> = result
            .all_findings()
            .flat_map(|f| f.advisory_ids.iter().map(String::as_str))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        out.push(format!(
            "Upgrade dependencies affected by {}",
            ids.join(", ")
        ));
    }
    if present(RuleCategory::MissingLicense) || present(RuleCategory::LicenseChange) {
        out.push("Review license declarations before redistribution".to_string());
    }
    if present(RuleCategory::Other) {
        out.push("Verify artifacts whose content changed without a version bump".to_string());
    }
    if present(RuleCategory::ProvenanceGap) {
        out.push("Record checksums and source commits for every artifact".to_string());
    }
    if out.is_empty() {
        out.push("No security issues detected".to_string());
    }
    out
}

fn best_practices(result: &AnalysisResult) -> Vec<String> {
    let mut out = vec![
        "Pin model revisions by commit when downloading from a registry".to_string(),
        "Regenerate the AIBOM whenever model artifacts change".to_string(),
    ];
    if !result.overview.unlicensed_documents.is_empty() {
        out.push(format!(
            "Declare a license for {}",
            result.overview.unlicensed_documents.join(", ")
        ));
    }
    out
}

fn risk_assessment(result: &AnalysisResult) -> String {
    let c = &result.summary.severity_counts;
    let mut text = format!(
        "Overall risk: {}. Findings: {} critical, {} high, {} medium, {} low, {} info.",
        result.summary.risk_level, c.critical, c.high, c.medium, c.low, c.info
    );
    if let Some(label) = &result.overview.highest_risk {
        text.push_str(&format!(" Highest-risk model: {label}."));
    }
    text
}
