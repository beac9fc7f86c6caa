//! Analysis result structures.

use super::{ComparisonMode, CrossDocumentOverview, NarrativeInsights};
use crate::diff::DiffResult;
use crate::error::{AibomDiffError, ErrorKind};
use crate::matching::{MatchSet, MatchTier};
use crate::risk::{Finding, RuleCategory, Severity, SeverityCounts};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Orchestrator lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunState {
    FetchingInputs,
    Matching,
    Diffing,
    Classifying,
    Aggregating,
    Done,
    Partial,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FetchingInputs => "fetching-inputs",
            Self::Matching => "matching",
            Self::Diffing => "diffing",
            Self::Classifying => "classifying",
            Self::Aggregating => "aggregating",
            Self::Done => "done",
            Self::Partial => "partial",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Terminal status of a run that produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunStatus {
    /// Every document was valid and every pair completed
    Done,
    /// At least one document or pair failed or was cancelled
    Partial,
}

/// What a failure entry refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "kebab-case")]
pub enum FailureScope {
    Document { index: usize, label: String },
    Pair { old: usize, new: usize },
}

/// A document or pair that did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEntry {
    #[serde(flatten)]
    pub scope: FailureScope,
    pub kind: ErrorKind,
    pub message: String,
}

impl FailureEntry {
    #[must_use]
    pub fn document(index: usize, label: impl Into<String>, error: &AibomDiffError) -> Self {
        Self {
            scope: FailureScope::Document {
                index,
                label: label.into(),
            },
            kind: error.kind(),
            message: error.to_string(),
        }
    }

    #[must_use]
    pub fn pair(old: usize, new: usize, error: &AibomDiffError) -> Self {
        Self {
            scope: FailureScope::Pair { old, new },
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Back-reference to one input document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub index: usize,
    pub label: String,
    /// Subject model, when the document parsed
    pub subject: Option<String>,
    pub valid: bool,
    pub component_count: usize,
}

/// Match tier counts for one pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub exact: usize,
    pub fuzzy: usize,
    pub old_only: usize,
    pub new_only: usize,
}

impl MatchSummary {
    #[must_use]
    pub fn from_matches(matches: &MatchSet) -> Self {
        let mut summary = Self {
            old_only: matches.old_only_count(),
            new_only: matches.new_only_count(),
            ..Self::default()
        };
        for m in matches.matched() {
            match m.tier {
                MatchTier::Exact => summary.exact += 1,
                MatchTier::Fuzzy => summary.fuzzy += 1,
                MatchTier::Unmatched => {}
            }
        }
        summary
    }
}

/// Outcome of one successful pairwise comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairResult {
    /// Position in the requested pair list
    pub pair_index: usize,
    /// Index of the old (baseline) document
    pub old: usize,
    /// Index of the new document
    pub new: usize,
    pub matches: MatchSummary,
    pub diff: DiffResult,
    pub findings: Vec<Finding>,
    pub severity_counts: SeverityCounts,
    /// Risk score, 0-100
    pub score: f64,
    pub risk_level: Severity,
}

impl PairResult {
    /// Findings of one category.
    pub fn findings_in(&self, category: RuleCategory) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.category == category)
    }

    #[must_use]
    pub fn max_severity(&self) -> Option<Severity> {
        self.findings.iter().map(|f| f.severity).max()
    }
}

/// Result of one pair task, before aggregation.
#[derive(Debug, Clone)]
pub enum PairOutcome {
    Completed(Box<PairResult>),
    Failed(FailureEntry),
}

/// Run-wide figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Mean of per-pair scores over successful pairs, two decimals
    pub score: f64,
    pub risk_level: Severity,
    pub pairs_compared: usize,
    pub pairs_failed: usize,
    pub documents_failed: usize,
    pub severity_counts: SeverityCounts,
    pub category_counts: BTreeMap<RuleCategory, usize>,
}

/// Complete result of an analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct AnalysisResult {
    pub status: RunStatus,
    pub mode: ComparisonMode,
    /// Effective baseline index (baseline mode only)
    pub baseline: Option<usize>,
    pub documents: Vec<DocumentRef>,
    /// Successful pairs, sorted by pair index
    pub pairs: Vec<PairResult>,
    /// Document failures first (by index), then pair failures (by pair)
    pub failures: Vec<FailureEntry>,
    pub summary: AnalysisSummary,
    pub overview: CrossDocumentOverview,
    /// Narrative text, attached after the result is built
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<NarrativeInsights>,
}

impl AnalysisResult {
    /// All findings across pairs, in pair order.
    pub fn all_findings(&self) -> impl Iterator<Item = &Finding> {
        self.pairs.iter().flat_map(|p| p.findings.iter())
    }

    /// Highest severity found in any pair.
    #[must_use]
    pub fn max_severity(&self) -> Option<Severity> {
        self.all_findings().map(|f| f.severity).max()
    }

    #[must_use]
    pub fn document_label(&self, index: usize) -> &str {
        self.documents
            .get(index)
            .map_or("<unknown>", |d| d.label.as_str())
    }

    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.status == RunStatus::Partial
    }

    /// Attach narrative insights produced from this result.
    ///
    /// The provider only reads the result; deltas, findings and scores are
    /// left untouched. A failing provider yields [`NarrativeInsights::limited`].
    pub fn with_insights(mut self, provider: &dyn super::InsightProvider) -> Self {
        let insights = match provider.generate(&self) {
            Ok(insights) => insights,
            Err(e) => {
                tracing::warn!(provider = provider.name(), error = %e, "Insight generation failed");
                NarrativeInsights::limited()
            }
        };
        self.insights = Some(insights);
        self
    }
}
