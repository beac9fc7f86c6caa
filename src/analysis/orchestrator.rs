//! Analysis orchestration.
//!
//! The orchestrator validates every input document, forms comparison pairs,
//! runs match → diff → classify for each pair on a bounded rayon pool and
//! aggregates the outcomes into an [`AnalysisResult`].
//!
//! Invalid documents and cancelled pairs never abort a run; they become
//! failure entries and turn the status to [`RunStatus::Partial`]. Only
//! `InsufficientInputs` and configuration errors escape.

use super::score::{pair_score, risk_level, round2, summary_score};
use super::{
    AnalysisResult, AnalysisSummary, CancellationSignal, CrossDocumentOverview, DocumentProvider,
    DocumentRef, FailureEntry, Fetcher, MatchSummary, OverviewInput, PairOutcome, PairResult,
    RawDocument, RetryPolicy, RunState, RunStatus,
};
use crate::config::AppConfig;
use crate::diff::DiffEngine;
use crate::error::{AibomDiffError, ErrorContext, Result};
use crate::matching::MatcherConfig;
use crate::model::AibomDocument;
use crate::parsers::parse_aibom_str;
use crate::risk::{AdvisoryFeed, RiskClassifier, SeverityCounts};
use clap::ValueEnum;
use rayon::prelude::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Minimum number of valid documents for a run.
const MIN_VALID_DOCUMENTS: usize = 2;

/// Called as `(finished, total)` each time a pair completes, fails or is
/// skipped by cancellation.
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// How comparison pairs are formed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ComparisonMode {
    /// The baseline document against each other valid document
    #[default]
    Baseline,
    /// Every ordered pair of distinct valid documents
    AllPairs,
}

impl fmt::Display for ComparisonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Baseline => f.write_str("baseline"),
            Self::AllPairs => f.write_str("all-pairs"),
        }
    }
}

/// Run-level knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    pub mode: ComparisonMode,
    /// Requested baseline index; defaults to the first document
    pub baseline: Option<usize>,
    pub max_parallel_pairs: usize,
    /// Time box for each external fetch attempt
    pub timeout_per_pair: Duration,
    pub retry: RetryPolicy,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            mode: ComparisonMode::Baseline,
            baseline: None,
            max_parallel_pairs: 4,
            timeout_per_pair: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }
}

/// One input after parsing: a label plus the document or the reason it was
/// rejected.
#[derive(Debug)]
pub struct LabeledDocument {
    pub label: String,
    pub document: Result<AibomDocument>,
}

impl LabeledDocument {
    pub fn new(label: impl Into<String>, document: Result<AibomDocument>) -> Self {
        Self {
            label: label.into(),
            document,
        }
    }

    /// Parse raw content, attaching the label to any error.
    pub fn parse(raw: &RawDocument) -> Self {
        let document = parse_aibom_str(&raw.content).with_context(|| raw.label.clone());
        Self::new(raw.label.clone(), document)
    }
}

/// Drives a complete analysis run.
pub struct AnalysisOrchestrator {
    engine: DiffEngine,
    classifier: RiskClassifier,
    options: AnalysisOptions,
    cancel: CancellationSignal,
    progress: Option<ProgressCallback>,
}

impl AnalysisOrchestrator {
    #[must_use]
    pub fn new(
        matcher: MatcherConfig,
        classifier: RiskClassifier,
        options: AnalysisOptions,
    ) -> Self {
        Self {
            engine: DiffEngine::with_matcher_config(matcher),
            classifier,
            options,
            cancel: CancellationSignal::new(),
            progress: None,
        }
    }

    /// Build an orchestrator from application configuration.
    ///
    /// Rule names are validated here, before any document is read, so an
    /// unknown rule fails the run with `UnknownRuleReference`.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mut builder = RiskClassifier::builder()
            .rule_set(config.rules.rule_set.iter().cloned())
            .unsafe_formats(config.rules.unsafe_formats.iter().cloned());
        if let Some(path) = &config.rules.advisories {
            let feed = AdvisoryFeed::from_path(path)?;
            tracing::info!(path = %path.display(), advisories = feed.len(), "Loaded advisory feed");
            builder = builder.advisories(Arc::new(feed));
        }
        let classifier = builder.build()?;

        let options = AnalysisOptions {
            mode: config.comparison.mode,
            baseline: config.comparison.baseline,
            max_parallel_pairs: config.comparison.max_parallel_pairs,
            timeout_per_pair: config.comparison.timeout()?,
            retry: config.comparison.retry.to_policy()?,
        };
        Ok(Self::new(config.matching.to_matcher_config(), classifier, options))
    }

    /// Share a cancellation signal with the caller.
    #[must_use]
    pub fn with_cancellation(mut self, signal: CancellationSignal) -> Self {
        self.cancel = signal;
        self
    }

    /// Report pair progress to the caller.
    #[must_use]
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    #[must_use]
    pub fn cancellation(&self) -> &CancellationSignal {
        &self.cancel
    }

    #[must_use]
    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    #[must_use]
    pub fn classifier(&self) -> &RiskClassifier {
        &self.classifier
    }

    /// Fetch subjects through a provider, then analyze them.
    ///
    /// Fetch failures (after retries) become document failure entries.
    pub async fn analyze_subjects(
        &self,
        provider: Arc<dyn DocumentProvider>,
        subjects: &[String],
    ) -> Result<AnalysisResult> {
        log_state(RunState::FetchingInputs);
        let fetcher = Fetcher::new(
            provider,
            self.options.timeout_per_pair,
            self.options.max_parallel_pairs,
        )
        .with_retry(self.options.retry);

        let fetched = fetcher.fetch_all(subjects, &self.cancel).await;
        let inputs = subjects
            .iter()
            .zip(fetched)
            .map(|(subject, result)| match result {
                Ok(raw) => LabeledDocument::parse(&raw),
                Err(e) => LabeledDocument::new(subject.clone(), Err(e)),
            })
            .collect();
        self.analyze_documents(inputs)
    }

    /// Parse in-memory documents, then analyze them.
    pub fn analyze_raw(&self, documents: &[RawDocument]) -> Result<AnalysisResult> {
        log_state(RunState::FetchingInputs);
        let inputs = documents.iter().map(LabeledDocument::parse).collect();
        self.analyze_documents(inputs)
    }

    /// Analyze already-parsed inputs. Input order defines document indices.
    pub fn analyze_documents(&self, inputs: Vec<LabeledDocument>) -> Result<AnalysisResult> {
        let mut refs = Vec::with_capacity(inputs.len());
        let mut failures = Vec::new();
        let mut documents: Vec<Option<AibomDocument>> = Vec::with_capacity(inputs.len());

        for (index, input) in inputs.into_iter().enumerate() {
            match input.document {
                Ok(doc) => {
                    refs.push(DocumentRef {
                        index,
                        label: input.label,
                        subject: Some(doc.subject().to_string()),
                        valid: true,
                        component_count: doc.component_count(),
                    });
                    documents.push(Some(doc));
                }
                Err(e) => {
                    tracing::warn!(index, label = %input.label, error = %e, "Document rejected");
                    failures.push(FailureEntry::document(index, input.label.clone(), &e));
                    refs.push(DocumentRef {
                        index,
                        label: input.label,
                        subject: None,
                        valid: false,
                        component_count: 0,
                    });
                    documents.push(None);
                }
            }
        }

        let valid: Vec<usize> = (0..documents.len())
            .filter(|&i| documents[i].is_some())
            .collect();
        if valid.len() < MIN_VALID_DOCUMENTS {
            log_state(RunState::Failed);
            return Err(AibomDiffError::InsufficientInputs {
                valid: valid.len(),
                required: MIN_VALID_DOCUMENTS,
            });
        }

        let baseline = match self.options.mode {
            ComparisonMode::Baseline => Some(self.effective_baseline(&valid)),
            ComparisonMode::AllPairs => None,
        };
        let pairs = form_pairs(self.options.mode, baseline, &valid);
        tracing::info!(
            documents = documents.len(),
            valid = valid.len(),
            pairs = pairs.len(),
            mode = %self.options.mode,
            "Starting analysis"
        );

        let outcomes = self.run_pairs(&documents, &pairs)?;

        log_state(RunState::Aggregating);
        let mut completed = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                PairOutcome::Completed(result) => completed.push(*result),
                PairOutcome::Failed(entry) => failures.push(entry),
            }
        }
        completed.sort_by_key(|p| p.pair_index);

        let documents_failed = refs.iter().filter(|r| !r.valid).count();
        let summary = summarize(&completed, failures.len() - documents_failed, documents_failed);
        let overview = self.build_overview(&documents, &refs);

        let status = if failures.is_empty() {
            RunStatus::Done
        } else {
            RunStatus::Partial
        };
        log_state(match status {
            RunStatus::Done => RunState::Done,
            RunStatus::Partial => RunState::Partial,
        });
        tracing::info!(
            score = summary.score,
            risk = %summary.risk_level,
            compared = summary.pairs_compared,
            failed = failures.len(),
            "Analysis finished"
        );

        Ok(AnalysisResult {
            status,
            mode: self.options.mode,
            baseline,
            documents: refs,
            pairs: completed,
            failures,
            summary,
            overview,
            insights: None,
        })
    }

    /// Compare two documents directly, outside of a run.
    pub fn compare_pair(&self, old: &AibomDocument, new: &AibomDocument) -> PairResult {
        self.compare(0, 0, 1, old, new)
    }

    fn effective_baseline(&self, valid: &[usize]) -> usize {
        let requested = self.options.baseline.unwrap_or(0);
        if valid.contains(&requested) {
            return requested;
        }
        // valid holds at least two entries here
        let fallback = valid[0];
        tracing::warn!(
            requested,
            fallback,
            "Baseline document is invalid; using the first valid document"
        );
        fallback
    }

    fn run_pairs(
        &self,
        documents: &[Option<AibomDocument>],
        pairs: &[(usize, usize)],
    ) -> Result<Vec<PairOutcome>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.max_parallel_pairs.max(1))
            .build()
            .map_err(|e| AibomDiffError::config(format!("cannot build worker pool: {e}")))?;

        let total = pairs.len();
        let finished = AtomicUsize::new(0);
        let mut outcomes: Vec<(usize, PairOutcome)> = pool.install(|| {
            pairs
                .par_iter()
                .enumerate()
                .map(|(pair_index, &(old, new))| {
                    let outcome = self.run_pair(pair_index, old, new, documents);
                    let done = finished.fetch_add(1, Ordering::SeqCst) + 1;
                    tracing::debug!(pair_index, finished = done, total, "Pair finished");
                    if let Some(progress) = &self.progress {
                        progress(done, total);
                    }
                    (pair_index, outcome)
                })
                .collect()
        });
        outcomes.sort_by_key(|(pair_index, _)| *pair_index);
        Ok(outcomes.into_iter().map(|(_, outcome)| outcome).collect())
    }

    fn run_pair(
        &self,
        pair_index: usize,
        old: usize,
        new: usize,
        documents: &[Option<AibomDocument>],
    ) -> PairOutcome {
        if self.cancel.is_cancelled() {
            let err = AibomDiffError::Cancelled(format!("pair {old} -> {new}"));
            return PairOutcome::Failed(FailureEntry::pair(old, new, &err));
        }
        match (&documents[old], &documents[new]) {
            (Some(a), Some(b)) => {
                PairOutcome::Completed(Box::new(self.compare(pair_index, old, new, a, b)))
            }
            _ => {
                let err = AibomDiffError::missing_field("document", format!("pair {old} -> {new}"));
                PairOutcome::Failed(FailureEntry::pair(old, new, &err))
            }
        }
    }

    fn compare(
        &self,
        pair_index: usize,
        old: usize,
        new: usize,
        a: &AibomDocument,
        b: &AibomDocument,
    ) -> PairResult {
        tracing::debug!(pair_index, old, new, state = %RunState::Matching, "Pair state");
        let matches = self.engine.match_documents(a, b);

        tracing::debug!(pair_index, old, new, state = %RunState::Diffing, "Pair state");
        let diff = DiffEngine::diff_with_matches(a, b, &matches);

        tracing::debug!(pair_index, old, new, state = %RunState::Classifying, "Pair state");
        let findings = self.classifier.classify(b, &diff.component_deltas);

        let score = round2(pair_score(&findings, diff.component_deltas.len()));
        PairResult {
            pair_index,
            old,
            new,
            matches: MatchSummary::from_matches(&matches),
            severity_counts: SeverityCounts::from_findings(&findings),
            risk_level: risk_level(score),
            score,
            diff,
            findings,
        }
    }

    /// A document's own risk posture: its self-comparison score.
    fn posture_score(&self, doc: &AibomDocument) -> f64 {
        let diff = self.engine.diff(doc, doc);
        let findings = self.classifier.classify(doc, &diff.component_deltas);
        pair_score(&findings, diff.component_deltas.len())
    }

    fn build_overview(
        &self,
        documents: &[Option<AibomDocument>],
        refs: &[DocumentRef],
    ) -> CrossDocumentOverview {
        let inputs: Vec<OverviewInput<'_>> = documents
            .iter()
            .zip(refs)
            .filter_map(|(doc, r)| {
                doc.as_ref().map(|document| OverviewInput {
                    index: r.index,
                    label: &r.label,
                    document,
                    posture_score: self.posture_score(document),
                })
            })
            .collect();
        CrossDocumentOverview::build(&inputs)
    }
}

impl Default for AnalysisOrchestrator {
    fn default() -> Self {
        Self::new(
            MatcherConfig::default(),
            RiskClassifier::default(),
            AnalysisOptions::default(),
        )
    }
}

/// Pairs as (old, new) document indices, in request order.
#[must_use]
pub fn form_pairs(
    mode: ComparisonMode,
    baseline: Option<usize>,
    valid: &[usize],
) -> Vec<(usize, usize)> {
    match (mode, baseline) {
        (ComparisonMode::Baseline, Some(base)) => valid
            .iter()
            .filter(|&&j| j != base)
            .map(|&j| (base, j))
            .collect(),
        (ComparisonMode::Baseline, None) => Vec::new(),
        (ComparisonMode::AllPairs, _) => valid
            .iter()
            .flat_map(|&i| valid.iter().filter(move |&&j| j != i).map(move |&j| (i, j)))
            .collect(),
    }
}

fn summarize(
    pairs: &[PairResult],
    pairs_failed: usize,
    documents_failed: usize,
) -> AnalysisSummary {
    let scores: Vec<f64> = pairs.iter().map(|p| p.score).collect();
    let score = summary_score(&scores);

    let mut severity_counts = SeverityCounts::default();
    let mut category_counts = BTreeMap::new();
    for pair in pairs {
        severity_counts.merge(&pair.severity_counts);
        for finding in &pair.findings {
            *category_counts.entry(finding.category).or_insert(0) += 1;
        }
    }

    AnalysisSummary {
        score,
        risk_level: risk_level(score),
        pairs_compared: pairs.len(),
        pairs_failed,
        documents_failed,
        severity_counts,
        category_counts,
    }
}

fn log_state(state: RunState) {
    tracing::debug!(state = %state, "Run state");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{FailureScope, RuleBasedInsights};
    use crate::diff::DeltaKind;
    use crate::error::ErrorKind;
    use crate::model::{Component, ComponentType, DocumentMetadata};
    use crate::risk::{RuleCategory, Severity};

    fn doc(subject: &str, components: Vec<Component>) -> AibomDocument {
        let map = components.into_iter().map(|c| (c.id.clone(), c)).collect();
        AibomDocument::from_parts(DocumentMetadata::new(subject, "1.6"), map, vec![], vec![])
    }

    fn weights(name: &str, format: &str) -> Component {
        Component::new(name, Some("1.0".to_string()), ComponentType::ModelWeights)
            .with_format(format)
            .with_license("apache-2.0")
            .with_checksum("SHA-256", "aa")
            .with_source_commit("abc123")
    }

    fn ok(label: &str, document: AibomDocument) -> LabeledDocument {
        LabeledDocument::new(label, Ok(document))
    }

    fn malformed(label: &str) -> LabeledDocument {
        LabeledDocument::new(
            label,
            Err(AibomDiffError::missing_field("components", "document")),
        )
    }

    #[test]
    fn test_form_pairs() {
        assert_eq!(
            form_pairs(ComparisonMode::Baseline, Some(1), &[0, 1, 3]),
            vec![(1, 0), (1, 3)]
        );
        assert_eq!(
            form_pairs(ComparisonMode::AllPairs, None, &[0, 2, 3]),
            vec![(0, 2), (0, 3), (2, 0), (2, 3), (3, 0), (3, 2)]
        );
    }

    #[test]
    fn test_insufficient_inputs() {
        let orchestrator = AnalysisOrchestrator::default();
        let err = orchestrator
            .analyze_documents(vec![
                ok("a", doc("org/a", vec![weights("model.bin", "pickle")])),
                malformed("b"),
            ])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientInputs);
    }

    #[test]
    fn test_baseline_fallback() {
        let orchestrator = AnalysisOrchestrator::default();
        let result = orchestrator
            .analyze_documents(vec![
                malformed("a"),
                ok("b", doc("org/b", vec![weights("model.bin", "safetensors")])),
                ok("c", doc("org/c", vec![weights("model.bin", "safetensors")])),
            ])
            .unwrap();
        assert_eq!(result.baseline, Some(1));
        assert_eq!(result.pairs.len(), 1);
        assert_eq!((result.pairs[0].old, result.pairs[0].new), (1, 2));
        assert_eq!(result.status, RunStatus::Partial);
        assert_eq!(result.summary.documents_failed, 1);
    }

    #[test]
    fn test_unsafe_format_introduced() {
        let orchestrator = AnalysisOrchestrator::default();
        let result = orchestrator
            .analyze_documents(vec![
                ok("old", doc("org/m", vec![weights("model.safetensors", "safetensors")])),
                ok("new", doc("org/m", vec![weights("model.safetensors", "pickle")])),
            ])
            .unwrap();

        assert_eq!(result.status, RunStatus::Done);
        let pair = &result.pairs[0];
        assert_eq!(pair.diff.component_deltas[0].kind, DeltaKind::Modified);
        let unsafe_findings: Vec<_> = pair.findings_in(RuleCategory::UnsafeFormat).collect();
        assert_eq!(unsafe_findings.len(), 1);
        assert_eq!(unsafe_findings[0].severity, Severity::Critical);
        assert!((pair.score - 100.0).abs() < 1e-9);
        assert_eq!(result.summary.risk_level, Severity::Critical);
        assert_eq!(result.overview.highest_risk.as_deref(), Some("new"));
    }

    #[test]
    fn test_cancelled_run_is_partial() {
        let signal = CancellationSignal::new();
        signal.cancel();
        let orchestrator = AnalysisOrchestrator::default().with_cancellation(signal);
        let result = orchestrator
            .analyze_documents(vec![
                ok("a", doc("org/a", vec![weights("model.bin", "pickle")])),
                ok("b", doc("org/b", vec![weights("model.bin", "pickle")])),
                ok("c", doc("org/c", vec![weights("model.bin", "pickle")])),
            ])
            .unwrap();

        assert_eq!(result.status, RunStatus::Partial);
        assert!(result.pairs.is_empty());
        assert_eq!(result.failures.len(), 2);
        assert!(result.failures.iter().all(|f| f.kind == ErrorKind::Cancelled));
        assert_eq!(result.failures[0].scope, FailureScope::Pair { old: 0, new: 1 });
        assert!(result.summary.score.abs() < 1e-9);
    }

    #[test]
    fn test_cancel_during_run() {
        let signal = CancellationSignal::new();
        let trigger = signal.clone();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_by_callback = Arc::clone(&seen);
        // A single worker runs pairs in order, so exactly one finishes.
        let options = AnalysisOptions {
            max_parallel_pairs: 1,
            ..AnalysisOptions::default()
        };
        let orchestrator =
            AnalysisOrchestrator::new(MatcherConfig::default(), RiskClassifier::default(), options)
                .with_cancellation(signal)
                .with_progress(Arc::new(move |finished, total| {
                    assert_eq!(total, 3);
                    seen_by_callback.store(finished, Ordering::SeqCst);
                    if finished == 1 {
                        trigger.cancel();
                    }
                }));

        let result = orchestrator
            .analyze_documents(vec![
                ok("a", doc("org/a", vec![weights("model.bin", "safetensors")])),
                ok("b", doc("org/b", vec![weights("model.bin", "pickle")])),
                ok("c", doc("org/c", vec![weights("model.bin", "safetensors")])),
                ok("d", doc("org/d", vec![weights("model.bin", "safetensors")])),
            ])
            .unwrap();

        assert_eq!(seen.load(Ordering::SeqCst), 3);
        assert_eq!(result.status, RunStatus::Partial);
        assert_eq!(result.pairs.len(), 1);
        assert_eq!((result.pairs[0].old, result.pairs[0].new), (0, 1));
        assert!(!result.pairs[0].findings.is_empty());
        assert_eq!(result.failures.len(), 2);
        assert!(result.failures.iter().all(|f| f.kind == ErrorKind::Cancelled));
        assert_eq!(result.failures[0].scope, FailureScope::Pair { old: 0, new: 2 });
        assert_eq!(result.failures[1].scope, FailureScope::Pair { old: 0, new: 3 });
        assert_eq!(result.summary.pairs_compared, 1);
        assert_eq!(result.summary.pairs_failed, 2);
    }

    #[test]
    fn test_insights_do_not_change_result() {
        let orchestrator = AnalysisOrchestrator::default();
        let result = orchestrator
            .analyze_documents(vec![
                ok("old", doc("org/m", vec![weights("model.safetensors", "safetensors")])),
                ok("new", doc("org/m", vec![weights("model.bin", "pickle")])),
            ])
            .unwrap();
        let before = result.clone();
        let with = result.with_insights(&RuleBasedInsights);

        assert_eq!(with.pairs, before.pairs);
        assert_eq!(with.summary, before.summary);
        let insights = with.insights.unwrap();
        assert!(insights.summary.contains("1 pair(s)"));
        assert!(insights
            .security_recommendations
            .iter()
            .any(|r| r.contains("safetensors")));
    }

    #[tokio::test]
    async fn test_analyze_subjects_reports_fetch_failures() {
        use async_trait::async_trait;

        struct MapProvider;

        #[async_trait]
        impl DocumentProvider for MapProvider {
            async fn fetch(&self, subject: &str) -> Result<RawDocument> {
                if subject == "org/missing" {
                    return Err(AibomDiffError::Provider {
                        subject: subject.to_string(),
                        message: "404".to_string(),
                    });
                }
                let content = format!(
                    r#"{{"bomFormat":"CycloneDX","specVersion":"1.6",
                        "metadata":{{"component":{{"name":"{subject}"}}}},
                        "components":[{{"type":"data","name":"weights.safetensors"}}]}}"#
                );
                Ok(RawDocument::new(subject, content))
            }

            fn name(&self) -> &'static str {
                "map"
            }
        }

        let options = AnalysisOptions {
            retry: RetryPolicy::none(),
            ..AnalysisOptions::default()
        };
        let orchestrator =
            AnalysisOrchestrator::new(MatcherConfig::default(), RiskClassifier::default(), options);
        let subjects = vec![
            "org/a".to_string(),
            "org/missing".to_string(),
            "org/b".to_string(),
        ];
        let result = orchestrator
            .analyze_subjects(Arc::new(MapProvider), &subjects)
            .await
            .unwrap();

        assert_eq!(result.status, RunStatus::Partial);
        assert_eq!(result.pairs.len(), 1);
        assert_eq!(result.failures[0].kind, ErrorKind::Provider);
        assert_eq!(result.document_label(1), "org/missing");
    }
}
