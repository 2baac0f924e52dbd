#![forbid(unsafe_code)]

//! Filter projector: text query → visible subset of ids.
//!
//! The projector never touches canonical order. A `None` visible set means
//! "everything is visible"; a `Some` set is recomputed wholesale on every
//! query change and only ever shrinks in between (when a card is deleted).

use std::collections::BTreeSet;

use tracing::debug;

use crate::card::{CardId, CardRecord};

/// Ids currently visible under an active query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    ids: BTreeSet<CardId>,
}

impl FilterSet {
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.ids.contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = CardId> + '_ {
        self.ids.iter().copied()
    }

    fn remove(&mut self, id: CardId) -> bool {
        self.ids.remove(&id)
    }
}

impl FromIterator<CardId> for FilterSet {
    fn from_iter<T: IntoIterator<Item = CardId>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Compute the visible set for `query` without keeping any state.
///
/// Whitespace-only queries clear the filter. Matching is a case-insensitive
/// substring test against [`CardRecord::searchable_text`].
#[must_use]
pub fn project(query: &str, records: &[CardRecord]) -> Option<FilterSet> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    Some(
        records
            .iter()
            .filter(|record| record.searchable_text().contains(&needle))
            .map(|record| record.id)
            .collect(),
    )
}

/// Owns the current query and its visible set.
#[derive(Debug, Clone, Default)]
pub struct FilterProjector {
    query: String,
    visible: Option<FilterSet>,
}

impl FilterProjector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the query and recompute the visible set from `records`.
    pub fn apply(&mut self, query: &str, records: &[CardRecord]) -> Option<&FilterSet> {
        self.query = query.to_string();
        self.visible = project(query, records);
        debug!(
            query = %self.query.trim(),
            visible = self.visible.as_ref().map_or(records.len(), FilterSet::len),
            total = records.len(),
            "filter.apply"
        );
        self.visible.as_ref()
    }

    /// Drop a deleted card from the visible set, if one is active.
    pub fn forget(&mut self, id: CardId) -> bool {
        self.visible.as_mut().is_some_and(|set| set.remove(id))
    }

    /// The visible set, or `None` when unfiltered.
    #[must_use]
    pub fn visible(&self) -> Option<&FilterSet> {
        self.visible.as_ref()
    }

    #[must_use]
    pub fn is_visible(&self, id: CardId) -> bool {
        self.visible.as_ref().is_none_or(|set| set.contains(id))
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.visible.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardKind, IssueDate};

    fn named(id: u32, title: &str) -> CardRecord {
        CardRecord {
            id: CardId(id),
            holder: "Sara Moreau".into(),
            title: title.into(),
            subtitle: "Carte Gold".into(),
            issued: IssueDate { day: 1, month: 1 },
            kind: CardKind::Loyalty { points: 10 },
        }
    }

    fn ids(set: Option<&FilterSet>) -> Option<Vec<u32>> {
        set.map(|set| set.iter().map(|id| id.0).collect())
    }

    #[test]
    fn alpha_beta_queries() {
        let records = vec![named(1, "Alpha"), named(2, "Beta")];
        let mut filter = FilterProjector::new();

        assert_eq!(ids(filter.apply("alp", &records)), Some(vec![1]));
        assert!(filter.apply("", &records).is_none());
        assert!(filter.is_visible(CardId(2)));
        assert_eq!(ids(filter.apply("zzz", &records)), Some(vec![]));
        assert!(!filter.is_visible(CardId(1)));
    }

    #[test]
    fn whitespace_query_clears() {
        let records = vec![named(1, "Alpha")];
        assert!(project("   \t", &records).is_none());
    }

    #[test]
    fn query_is_case_insensitive_and_trimmed() {
        let records = vec![named(1, "Alpha"), named(2, "Beta")];
        assert_eq!(ids(project("  BETA ", &records).as_ref()), Some(vec![2]));
    }

    #[test]
    fn matches_holder_and_kind_label() {
        let records = vec![named(1, "Alpha")];
        assert_eq!(ids(project("moreau", &records).as_ref()), Some(vec![1]));
        assert_eq!(ids(project("fidélité", &records).as_ref()), Some(vec![1]));
    }

    #[test]
    fn forget_shrinks_active_set_only() {
        let records = vec![named(1, "Alpha"), named(2, "Alpine")];
        let mut filter = FilterProjector::new();
        assert!(!filter.forget(CardId(1)));

        filter.apply("alp", &records);
        assert!(filter.forget(CardId(1)));
        assert_eq!(ids(filter.visible()), Some(vec![2]));
        assert!(!filter.forget(CardId(1)));
        assert_eq!(filter.query(), "alp");
        assert!(filter.is_active());
    }
}
