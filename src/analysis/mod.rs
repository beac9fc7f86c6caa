//! Multi-document analysis.
//!
//! Ties matching, diffing and risk classification together across two or
//! more AIBOM documents:
//!
//! - [`AnalysisOrchestrator`] validates inputs, forms pairs and runs them on
//!   a bounded worker pool
//! - [`Fetcher`] wraps a [`DocumentProvider`] with time boxes and retries
//! - [`AnalysisResult`] is the serializable outcome, including per-document
//!   and per-pair failure entries
//! - [`InsightProvider`] attaches narrative text after the result is built

mod cancel;
mod fetch;
mod insights;
mod orchestrator;
mod overview;
mod result;
pub mod score;

pub use cancel::CancellationSignal;
pub use fetch::{DocumentProvider, Fetcher, FileProvider, RawDocument, RetryPolicy};
pub use insights::{InsightProvider, NarrativeInsights, RuleBasedInsights};
pub use orchestrator::{
    form_pairs, AnalysisOptions, AnalysisOrchestrator, ComparisonMode, LabeledDocument,
    ProgressCallback,
};
pub use overview::{CrossDocumentOverview, DocumentPosture, OverviewInput};
pub use result::{
    AnalysisResult, AnalysisSummary, DocumentRef, FailureEntry, FailureScope, MatchSummary,
    PairOutcome, PairResult, RunState, RunStatus,
};
