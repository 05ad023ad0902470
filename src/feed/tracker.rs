//! Card lifecycle tracker.
//!
//! The `CardTracker` records which bookkeeping slot every touched card
//! occupies and handles movement between slots. A card id is in at most one
//! slot at a time - seen, preparing, or ready - and an untracked id is a
//! selection candidate. Keeping all three sets in a single location map
//! makes that invariant structural rather than something to re-check.
//!
//! Lifecycle: untracked -> `Preparing` on selection, then `Ready` on
//! hydration success or `Seen` on failure; `Ready` -> `Seen` when the card
//! is shifted for display. `Seen` slots of a kind are dropped when that
//! kind's candidates are exhausted, and everything is dropped on full reset.

use rustc_hash::FxHashMap;

use crate::cards::{CardKey, CardKind};

/// The bookkeeping slot a tracked card occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Slot {
    /// Already displayed this session, or skipped after a failed hydration.
    Seen,
    /// Mid-hydration.
    Preparing,
    /// Hydrated and buffered for display.
    Ready,
}

/// Tracks the lifecycle slot of every card the session has touched.
#[derive(Clone, Debug, Default)]
pub(crate) struct CardTracker {
    locations: FxHashMap<CardKey, Slot>,
}

impl CardTracker {
    /// Create a new empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The slot a card occupies, if tracked.
    #[must_use]
    pub fn slot(&self, key: CardKey) -> Option<Slot> {
        self.locations.get(&key).copied()
    }

    /// Whether a card is tracked at all (and therefore not a candidate).
    #[must_use]
    pub fn contains(&self, key: CardKey) -> bool {
        self.locations.contains_key(&key)
    }

    /// Mark a freshly selected card as preparing.
    ///
    /// Panics if the id is already tracked - selection must never
    /// double-pick an id.
    pub fn mark_preparing(&mut self, key: CardKey) {
        if let Some(slot) = self.locations.insert(key, Slot::Preparing) {
            panic!("{} selected while already tracked as {:?}", key, slot);
        }
    }

    /// Move a card from preparing to ready after successful hydration.
    pub fn promote_ready(&mut self, key: CardKey) {
        debug_assert_eq!(self.slot(key), Some(Slot::Preparing), "{} not preparing", key);
        self.locations.insert(key, Slot::Ready);
    }

    /// Move a card from preparing to seen after a failed hydration (the
    /// skip-never-retry policy).
    pub fn preparing_to_seen(&mut self, key: CardKey) {
        debug_assert_eq!(self.slot(key), Some(Slot::Preparing), "{} not preparing", key);
        self.locations.insert(key, Slot::Seen);
    }

    /// Move a card from ready to seen as it is shifted for display.
    pub fn ready_to_seen(&mut self, key: CardKey) {
        debug_assert_eq!(self.slot(key), Some(Slot::Ready), "{} not ready", key);
        self.locations.insert(key, Slot::Seen);
    }

    /// Drop a card from the tracker entirely, returning whether it was
    /// tracked. Used when pruning disabled kinds from the ready queue.
    pub fn untrack(&mut self, key: CardKey) -> bool {
        self.locations.remove(&key).is_some()
    }

    /// Drop the seen slots of one kind (the exhaustion-reuse policy).
    /// Preparing and ready slots of that kind are kept.
    pub fn clear_seen(&mut self, kind: CardKind) {
        self.locations.retain(|key, slot| key.kind != kind || *slot != Slot::Seen);
    }

    /// Drop everything (full reset).
    pub fn clear(&mut self) {
        self.locations.clear();
    }

    /// Number of cards currently preparing, across all kinds.
    #[must_use]
    pub fn preparing_count(&self) -> usize {
        self.count_slot(Slot::Preparing)
    }

    /// Number of cards in a given slot, across all kinds.
    #[must_use]
    pub fn count_slot(&self, slot: Slot) -> usize {
        self.locations.values().filter(|&&s| s == slot).count()
    }

    /// Number of a kind's cards in a given slot.
    #[must_use]
    pub fn count_kind_slot(&self, kind: CardKind, slot: Slot) -> usize {
        self.locations
            .iter()
            .filter(|(key, &s)| key.kind == kind && s == slot)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardId;

    fn key(kind: CardKind, id: u32) -> CardKey {
        CardKey::new(kind, CardId::new(id))
    }

    #[test]
    fn test_untracked_is_candidate() {
        let tracker = CardTracker::new();
        assert!(!tracker.contains(key(CardKind::Text, 1)));
        assert_eq!(tracker.slot(key(CardKind::Text, 1)), None);
    }

    #[test]
    fn test_success_lifecycle() {
        let mut tracker = CardTracker::new();
        let k = key(CardKind::Text, 1);

        tracker.mark_preparing(k);
        assert_eq!(tracker.slot(k), Some(Slot::Preparing));

        tracker.promote_ready(k);
        assert_eq!(tracker.slot(k), Some(Slot::Ready));

        tracker.ready_to_seen(k);
        assert_eq!(tracker.slot(k), Some(Slot::Seen));
    }

    #[test]
    fn test_failure_lifecycle() {
        let mut tracker = CardTracker::new();
        let k = key(CardKind::Topic, 4);

        tracker.mark_preparing(k);
        tracker.preparing_to_seen(k);

        assert_eq!(tracker.slot(k), Some(Slot::Seen));
        assert_eq!(tracker.preparing_count(), 0);
    }

    #[test]
    #[should_panic(expected = "already tracked")]
    fn test_double_selection_panics() {
        let mut tracker = CardTracker::new();
        let k = key(CardKind::Text, 1);

        tracker.mark_preparing(k);
        tracker.mark_preparing(k);
    }

    #[test]
    fn test_same_id_across_kinds_is_distinct() {
        let mut tracker = CardTracker::new();

        tracker.mark_preparing(key(CardKind::Text, 1));
        tracker.mark_preparing(key(CardKind::Topic, 1));

        assert_eq!(tracker.preparing_count(), 2);
    }

    #[test]
    fn test_clear_seen_is_per_kind_and_slot() {
        let mut tracker = CardTracker::new();

        // Seen text card, seen topic card, preparing text card.
        tracker.mark_preparing(key(CardKind::Text, 1));
        tracker.preparing_to_seen(key(CardKind::Text, 1));
        tracker.mark_preparing(key(CardKind::Topic, 2));
        tracker.preparing_to_seen(key(CardKind::Topic, 2));
        tracker.mark_preparing(key(CardKind::Text, 3));

        tracker.clear_seen(CardKind::Text);

        // Text 1 is a candidate again; topic 2 stays seen; text 3 stays preparing.
        assert!(!tracker.contains(key(CardKind::Text, 1)));
        assert_eq!(tracker.slot(key(CardKind::Topic, 2)), Some(Slot::Seen));
        assert_eq!(tracker.slot(key(CardKind::Text, 3)), Some(Slot::Preparing));
    }

    #[test]
    fn test_untrack() {
        let mut tracker = CardTracker::new();
        let k = key(CardKind::Genre, 7);

        tracker.mark_preparing(k);
        tracker.promote_ready(k);

        assert!(tracker.untrack(k));
        assert!(!tracker.contains(k));
        assert!(!tracker.untrack(k));
    }

    #[test]
    fn test_clear() {
        let mut tracker = CardTracker::new();
        tracker.mark_preparing(key(CardKind::Text, 1));
        tracker.mark_preparing(key(CardKind::Meme, 2));

        tracker.clear();

        assert_eq!(tracker.preparing_count(), 0);
        assert!(!tracker.contains(key(CardKind::Text, 1)));
    }

    #[test]
    fn test_counts() {
        let mut tracker = CardTracker::new();

        tracker.mark_preparing(key(CardKind::Text, 1));
        tracker.mark_preparing(key(CardKind::Text, 2));
        tracker.promote_ready(key(CardKind::Text, 2));
        tracker.mark_preparing(key(CardKind::Meme, 3));

        assert_eq!(tracker.preparing_count(), 2);
        assert_eq!(tracker.count_slot(Slot::Ready), 1);
        assert_eq!(tracker.count_kind_slot(CardKind::Text, Slot::Preparing), 1);
        assert_eq!(tracker.count_kind_slot(CardKind::Meme, Slot::Preparing), 1);
    }
}
