//! The explicit result of aligning two documents.

use super::{ComponentMatch, MatchTier};
use serde::{Deserialize, Serialize};

/// All component relations between an old and a new document.
///
/// Entries are ordered: matched pairs in old-document order, then old-only
/// components, then new-only components. Lookups work in both directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSet {
    entries: Vec<ComponentMatch>,
    old_to_new: Vec<Option<usize>>,
    new_to_old: Vec<Option<usize>>,
}

impl MatchSet {
    /// Build a match set from accepted pairs.
    ///
    /// `pairs` holds `(old_position, new_position, tier, score)`; components
    /// not named in any pair become one-sided entries.
    #[must_use]
    pub fn from_pairs(
        old_len: usize,
        new_len: usize,
        pairs: impl IntoIterator<Item = (usize, usize, MatchTier, f64)>,
    ) -> Self {
        let mut old_to_new = vec![None; old_len];
        let mut new_to_old = vec![None; new_len];
        let mut accepted: Vec<ComponentMatch> = Vec::new();

        for (old, new, tier, score) in pairs {
            if old >= old_len || new >= new_len {
                continue;
            }
            if old_to_new[old].is_some() || new_to_old[new].is_some() {
                continue;
            }
            old_to_new[old] = Some(new);
            new_to_old[new] = Some(old);
            accepted.push(ComponentMatch {
                old: Some(old),
                new: Some(new),
                tier,
                score,
            });
        }
        accepted.sort_by_key(|m| m.old);

        let old_only = (0..old_len)
            .filter(|&i| old_to_new[i].is_none())
            .map(|i| ComponentMatch {
                old: Some(i),
                new: None,
                tier: MatchTier::Unmatched,
                score: 0.0,
            });
        let new_only = (0..new_len)
            .filter(|&j| new_to_old[j].is_none())
            .map(|j| ComponentMatch {
                old: None,
                new: Some(j),
                tier: MatchTier::Unmatched,
                score: 0.0,
            });

        let mut entries = accepted;
        entries.extend(old_only.collect::<Vec<_>>());
        entries.extend(new_only.collect::<Vec<_>>());

        Self {
            entries,
            old_to_new,
            new_to_old,
        }
    }

    /// Every relation, in canonical order.
    #[must_use]
    pub fn entries(&self) -> &[ComponentMatch] {
        &self.entries
    }

    /// Matched pairs only.
    pub fn matched(&self) -> impl Iterator<Item = &ComponentMatch> {
        self.entries.iter().filter(|m| m.is_matched())
    }

    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.matched().count()
    }

    /// Number of components present only in the old document.
    #[must_use]
    pub fn old_only_count(&self) -> usize {
        self.old_to_new.iter().filter(|p| p.is_none()).count()
    }

    /// Number of components present only in the new document.
    #[must_use]
    pub fn new_only_count(&self) -> usize {
        self.new_to_old.iter().filter(|p| p.is_none()).count()
    }

    /// Partner in the new document of an old-document position.
    #[must_use]
    pub fn partner_of_old(&self, old: usize) -> Option<usize> {
        self.old_to_new.get(old).copied().flatten()
    }

    /// Partner in the old document of a new-document position.
    #[must_use]
    pub fn partner_of_new(&self, new: usize) -> Option<usize> {
        self.new_to_old.get(new).copied().flatten()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The same relations seen from the other side.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let pairs: Vec<_> = self
            .matched()
            .filter_map(|m| Some((m.new?, m.old?, m.tier, m.score)))
            .collect();
        Self::from_pairs(self.new_to_old.len(), self.old_to_new.len(), pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_position_appears_once() {
        let set = MatchSet::from_pairs(3, 2, vec![(2, 0, MatchTier::Exact, 1.0)]);
        assert_eq!(set.len(), 4);
        assert_eq!(set.matched_count(), 1);
        assert_eq!(set.old_only_count(), 2);
        assert_eq!(set.new_only_count(), 1);
        assert_eq!(set.partner_of_old(2), Some(0));
        assert_eq!(set.partner_of_new(0), Some(2));
        assert_eq!(set.partner_of_old(0), None);
    }

    #[test]
    fn test_conflicting_pairs_keep_first() {
        let set = MatchSet::from_pairs(
            2,
            2,
            vec![
                (0, 0, MatchTier::Fuzzy, 0.9),
                (1, 0, MatchTier::Fuzzy, 0.9),
                (0, 1, MatchTier::Fuzzy, 0.9),
            ],
        );
        assert_eq!(set.matched_count(), 1);
        assert_eq!(set.partner_of_new(0), Some(0));
    }

    #[test]
    fn test_reversed() {
        let set = MatchSet::from_pairs(2, 1, vec![(1, 0, MatchTier::Exact, 1.0)]);
        let rev = set.reversed();
        assert_eq!(rev.partner_of_old(0), Some(1));
        assert_eq!(rev.old_only_count(), 0);
        assert_eq!(rev.new_only_count(), 1);
    }
}
