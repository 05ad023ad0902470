//! Card pool - the per-kind candidate lists the selector draws from.
//!
//! The pool is supplied by the catalog collaborator, which guarantees the
//! candidates already passed description validation. The engine owns its
//! copy and replaces it wholesale when upstream content changes; per-session
//! bookkeeping (seen, preparing, ready) lives outside the pool so a refresh
//! never disturbs it.

use rustc_hash::FxHashMap;

use super::card::{Card, CardId, CardKind};

/// Per-kind ordered candidate lists.
///
/// ## Example
///
/// ```
/// use card_feed::cards::{Card, CardId, CardKind, CardPool};
///
/// let pool = CardPool::new()
///     .with_card(Card::text(CardId::new(1), "Moby-Dick"))
///     .with_card(Card::text(CardId::new(2), "Middlemarch"));
///
/// assert_eq!(pool.cards(CardKind::Text).len(), 2);
/// assert!(pool.cards(CardKind::Genre).is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardPool {
    cards: FxHashMap<CardKind, Vec<Card>>,
}

impl CardPool {
    /// Create a new empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate card.
    ///
    /// Panics if a card with the same ID already exists in that kind's list,
    /// or if the card is the loading sentinel.
    pub fn add(&mut self, card: Card) {
        let kind = card.kind();
        assert!(
            kind != CardKind::Loading,
            "Loading sentinel cannot be pooled"
        );

        let list = self.cards.entry(kind).or_default();
        if list.iter().any(|c| c.id == card.id) {
            panic!("Card {} already pooled for kind {}", card.id, kind);
        }
        list.push(card);
    }

    /// Add a candidate card (builder pattern).
    #[must_use]
    pub fn with_card(mut self, card: Card) -> Self {
        self.add(card);
        self
    }

    /// Add a batch of candidate cards.
    pub fn add_all(&mut self, cards: impl IntoIterator<Item = Card>) {
        for card in cards {
            self.add(card);
        }
    }

    /// Candidates of a kind, in catalog order.
    #[must_use]
    pub fn cards(&self, kind: CardKind) -> &[Card] {
        self.cards.get(&kind).map_or(&[], |v| v.as_slice())
    }

    /// Look up a candidate by kind and ID.
    #[must_use]
    pub fn get(&self, kind: CardKind, id: CardId) -> Option<&Card> {
        self.cards(kind).iter().find(|c| c.id == id)
    }

    /// Whether a kind has any candidates.
    #[must_use]
    pub fn has_candidates(&self, kind: CardKind) -> bool {
        !self.cards(kind).is_empty()
    }

    /// Number of candidates of a kind.
    #[must_use]
    pub fn kind_len(&self, kind: CardKind) -> usize {
        self.cards(kind).len()
    }

    /// Total candidates across all kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.values().map(Vec::len).sum()
    }

    /// Whether the pool holds no candidates at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
