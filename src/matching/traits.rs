//! Trait definitions for document-level component matching.
//!
//! A matcher aligns the components of an old and a new document and returns
//! an explicit [`MatchSet`]. Keeping the result a plain value lets the diff
//! engine and the tests consume it without re-running the matcher.

use super::MatchSet;
use crate::model::AibomDocument;
use serde::{Deserialize, Serialize};

/// The tier at which a component pair was aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchTier {
    /// Same name and type
    Exact,
    /// Combined similarity at or above the threshold
    Fuzzy,
    /// Present on one side only
    Unmatched,
}

impl MatchTier {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Fuzzy => "fuzzy",
            Self::Unmatched => "unmatched",
        }
    }
}

impl std::fmt::Display for MatchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relation between a component of the old document and at most one
/// component of the new document.
///
/// Positions index into the documents' declaration order. One-sided
/// entries carry `None` on the missing side and [`MatchTier::Unmatched`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentMatch {
    pub old: Option<usize>,
    pub new: Option<usize>,
    pub tier: MatchTier,
    /// Similarity score (1.0 for exact, 0.0 for unmatched)
    pub score: f64,
}

impl ComponentMatch {
    #[must_use]
    pub const fn is_matched(&self) -> bool {
        self.old.is_some() && self.new.is_some()
    }
}

/// Pluggable document matcher.
pub trait ComponentMatcher: Send + Sync {
    /// Align the components of `old` with those of `new`.
    ///
    /// Implementations must be deterministic and must not drop components:
    /// every component of either document appears in exactly one entry.
    fn match_documents(&self, old: &AibomDocument, new: &AibomDocument) -> MatchSet;

    /// Short name for logging.
    fn name(&self) -> &'static str;
}
