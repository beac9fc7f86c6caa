//! Component matching between two AIBOM documents.
//!
//! Matching runs in two passes:
//!
//! 1. **Exact**: components with the same name and type are paired,
//!    regardless of version. When several candidates share the key, the one
//!    with the same version wins, then the earliest position.
//! 2. **Fuzzy**: remaining components are scored by
//!    `name_weight * levenshtein(name) + type_weight * (type equal)` and
//!    pairs at or above the threshold are accepted greedily, best score
//!    first, ties broken by position in the old then the new document.
//!
//! Everything left over is one-sided. Matching never fails.
//!
//! # Example
//!
//! ```ignore
//! use aibom_diff::matching::{ComponentMatcher, FuzzyMatcher, MatcherConfig};
//!
//! let matcher = FuzzyMatcher::new(MatcherConfig::balanced());
//! let matches = matcher.match_documents(&old_doc, &new_doc);
//! println!("{} matched", matches.matched_count());
//! ```

mod config;
mod match_set;
pub mod string_similarity;
mod traits;

pub use config::MatcherConfig;
pub use match_set::MatchSet;
pub use string_similarity::name_similarity;
pub use traits::{ComponentMatch, ComponentMatcher, MatchTier};

use crate::model::{AibomDocument, Component, ComponentType};
use std::collections::HashMap;

/// Two-pass exact + fuzzy matcher.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct FuzzyMatcher {
    config: MatcherConfig,
}

impl FuzzyMatcher {
    pub const fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Combined similarity of two components (0.0 - 1.0).
    #[must_use]
    pub fn similarity(&self, a: &Component, b: &Component) -> f64 {
        let name = name_similarity(a.name(), b.name());
        let kind = if a.kind() == b.kind() { 1.0 } else { 0.0 };
        (self.config.name_weight * name + self.config.type_weight * kind).clamp(0.0, 1.0)
    }

    fn exact_pass(
        old: &[&Component],
        new: &[&Component],
        old_used: &mut [bool],
        new_used: &mut [bool],
    ) -> Vec<(usize, usize, MatchTier, f64)> {
        let mut by_key: HashMap<(&str, &ComponentType), Vec<usize>> = HashMap::new();
        for (j, comp) in new.iter().enumerate() {
            by_key.entry(comp.id.match_key()).or_default().push(j);
        }

        // (version differs, old position, new position): false sorts first
        let mut candidates: Vec<(bool, usize, usize)> = Vec::new();
        for (i, comp) in old.iter().enumerate() {
            if let Some(js) = by_key.get(&comp.id.match_key()) {
                for &j in js {
                    candidates.push((comp.version() != new[j].version(), i, j));
                }
            }
        }
        candidates.sort_unstable();

        let mut pairs = Vec::new();
        for (_, i, j) in candidates {
            if old_used[i] || new_used[j] {
                continue;
            }
            old_used[i] = true;
            new_used[j] = true;
            pairs.push((i, j, MatchTier::Exact, 1.0));
        }
        pairs
    }

    fn fuzzy_pass(
        &self,
        old: &[&Component],
        new: &[&Component],
        old_used: &mut [bool],
        new_used: &mut [bool],
    ) -> Vec<(usize, usize, MatchTier, f64)> {
        let old_remaining: Vec<usize> = (0..old.len()).filter(|&i| !old_used[i]).collect();
        let new_remaining: Vec<usize> = (0..new.len()).filter(|&j| !new_used[j]).collect();

        let mut candidates: Vec<(f64, usize, usize)> = Vec::new();
        for &i in &old_remaining {
            for &j in &new_remaining {
                let score = self.similarity(old[i], new[j]);
                if score >= self.config.threshold {
                    candidates.push((score, i, j));
                }
            }
        }
        // Positions in the remaining lists preserve document order, so
        // ordering by document position is the same as by list position.
        candidates.sort_by(|a, b| {
            b.0.total_cmp(&a.0)
                .then_with(|| a.1.cmp(&b.1))
                .then_with(|| a.2.cmp(&b.2))
        });

        let mut pairs = Vec::new();
        for (score, i, j) in candidates {
            if old_used[i] || new_used[j] {
                continue;
            }
            old_used[i] = true;
            new_used[j] = true;
            tracing::trace!(
                old = old[i].name(),
                new = new[j].name(),
                score,
                "Fuzzy match accepted"
            );
            pairs.push((i, j, MatchTier::Fuzzy, score));
        }
        pairs
    }
}

impl ComponentMatcher for FuzzyMatcher {
    fn match_documents(&self, old: &AibomDocument, new: &AibomDocument) -> MatchSet {
        let old_components: Vec<&Component> = old.iter_components().collect();
        let new_components: Vec<&Component> = new.iter_components().collect();
        let mut old_used = vec![false; old_components.len()];
        let mut new_used = vec![false; new_components.len()];

        let mut pairs =
            Self::exact_pass(&old_components, &new_components, &mut old_used, &mut new_used);
        let exact = pairs.len();
        pairs.extend(self.fuzzy_pass(
            &old_components,
            &new_components,
            &mut old_used,
            &mut new_used,
        ));

        tracing::debug!(
            exact,
            fuzzy = pairs.len() - exact,
            old_only = old_used.iter().filter(|u| !**u).count(),
            new_only = new_used.iter().filter(|u| !**u).count(),
            "Matched components"
        );

        MatchSet::from_pairs(old_components.len(), new_components.len(), pairs)
    }

    fn name(&self) -> &'static str {
        "fuzzy"
    }
}
