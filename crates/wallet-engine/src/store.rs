#![forbid(unsafe_code)]

//! Ordered collection store.
//!
//! The canonical, ordered list of cards. Order is significant: it defines
//! grid position and stacking precedence.
//!
//! # Invariants
//!
//! 1. Exactly one record per [`CardId`].
//! 2. Order is a total order with no gaps (a plain `Vec`).
//! 3. [`CardStore::revision`] increases by one per successful mutation and
//!    never on a no-op.
//!
//! # Failure Modes
//!
//! Operations on absent ids are no-ops that return `None`; they never panic.

use tracing::{debug, trace};

use crate::card::{CardId, CardRecord};

/// Where a moved card came from and where it landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub from: usize,
    pub to: usize,
}

impl MoveOutcome {
    /// Whether the card actually changed position.
    #[must_use]
    pub const fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Canonical ordered list of card records.
#[derive(Debug, Clone, Default)]
pub struct CardStore {
    cards: Vec<CardRecord>,
    revision: u64,
}

impl CardStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from records in order. Records whose id is already
    /// present are dropped.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = CardRecord>) -> Self {
        let mut store = Self::new();
        for record in records {
            store.push(record);
        }
        store.revision = 0;
        store
    }

    /// Append a record. Returns `false` if its id is already present.
    pub fn push(&mut self, record: CardRecord) -> bool {
        if self.contains(record.id) {
            debug!(card = %record.id, "store.push: duplicate id ignored");
            return false;
        }
        self.cards.push(record);
        self.revision += 1;
        true
    }

    /// Drop the record with `id`, keeping the relative order of the rest.
    pub fn remove(&mut self, id: CardId) -> Option<CardRecord> {
        let Some(index) = self.index_of(id) else {
            debug!(card = %id, "store.remove: not found");
            return None;
        };
        let record = self.cards.remove(index);
        self.revision += 1;
        trace!(card = %id, index, len = self.cards.len(), "store.remove");
        Some(record)
    }

    /// Move `id` so that it ends up at `target` (clamped to the valid range).
    ///
    /// Moving a card to its own index leaves the order unchanged and does not
    /// bump the revision.
    pub fn move_to_index(&mut self, id: CardId, target: usize) -> Option<MoveOutcome> {
        let Some(from) = self.index_of(id) else {
            debug!(card = %id, "store.move_to_index: not found");
            return None;
        };
        let to = target.min(self.cards.len() - 1);
        if from != to {
            let record = self.cards.remove(from);
            self.cards.insert(to, record);
            self.revision += 1;
        }
        trace!(card = %id, from, to, "store.move_to_index");
        Some(MoveOutcome { from, to })
    }

    /// Current order, read-only.
    #[must_use]
    pub fn snapshot(&self) -> &[CardRecord] {
        &self.cards
    }

    /// Ids in order.
    #[must_use]
    pub fn ids(&self) -> Vec<CardId> {
        self.cards.iter().map(|card| card.id).collect()
    }

    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardRecord> {
        self.cards.iter().find(|card| card.id == id)
    }

    #[must_use]
    pub fn index_of(&self, id: CardId) -> Option<usize> {
        self.cards.iter().position(|card| card.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.index_of(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Mutation counter.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::CardGenerator;

    fn store(n: u32) -> CardStore {
        CardStore::from_records(CardGenerator::new(1).cards(n))
    }

    fn ids(store: &CardStore) -> Vec<u32> {
        store.ids().into_iter().map(|id| id.0).collect()
    }

    #[test]
    fn from_records_drops_duplicates() {
        let generator = CardGenerator::new(1);
        let records = vec![generator.card(1), generator.card(2), generator.card(1)];
        let store = CardStore::from_records(records);
        assert_eq!(ids(&store), vec![1, 2]);
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn remove_keeps_relative_order() {
        let mut store = store(5);
        let removed = store.remove(CardId(3)).map(|r| r.id);
        assert_eq!(removed, Some(CardId(3)));
        assert_eq!(ids(&store), vec![1, 2, 4, 5]);
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn remove_missing_is_noop() {
        let mut store = store(3);
        assert!(store.remove(CardId(99)).is_none());
        assert_eq!(store.revision(), 0);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn move_forward_and_backward() {
        let mut store = store(5);
        let outcome = store.move_to_index(CardId(1), 3);
        assert_eq!(outcome, Some(MoveOutcome { from: 0, to: 3 }));
        assert_eq!(ids(&store), vec![2, 3, 4, 1, 5]);

        let outcome = store.move_to_index(CardId(5), 0);
        assert_eq!(outcome, Some(MoveOutcome { from: 4, to: 0 }));
        assert_eq!(ids(&store), vec![5, 2, 3, 4, 1]);
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn move_clamps_target() {
        let mut store = store(4);
        let outcome = store.move_to_index(CardId(2), 100);
        assert_eq!(outcome, Some(MoveOutcome { from: 1, to: 3 }));
        assert_eq!(ids(&store), vec![1, 3, 4, 2]);
    }

    #[test]
    fn move_to_own_index_is_identity() {
        let mut store = store(4);
        let outcome = store.move_to_index(CardId(3), 2).expect("present");
        assert!(!outcome.changed());
        assert_eq!(ids(&store), vec![1, 2, 3, 4]);
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn move_missing_is_noop() {
        let mut store = store(2);
        assert!(store.move_to_index(CardId(7), 0).is_none());
        assert_eq!(ids(&store), vec![1, 2]);
    }

    #[test]
    fn push_rejects_duplicate() {
        let mut store = store(2);
        let again = CardGenerator::new(5).card(2);
        assert!(!store.push(again));
        assert!(store.push(CardGenerator::new(5).card(3)));
        assert_eq!(ids(&store), vec![1, 2, 3]);
        assert!(store.get(CardId(3)).is_some());
        assert!(store.contains(CardId(1)));
    }
}
