//! Consumer-side scroll adapter.
//!
//! `FeedView` maintains the stream of cards a presentation layer has shown,
//! in display order. It handles the fast-scroll degenerate case: when the
//! consumer outruns the ready queue, the view appends the reserved loading
//! sentinel instead of failing, and swaps the real card in once one becomes
//! ready - never inserting mid-stream, so earlier cards keep their
//! positions and the scroll offset survives.
//!
//! The view also discharges the demand contract: every real card it shows
//! is reported with exactly one `on_card_displayed` call.

use crate::cards::Card;
use crate::feed::FeedEngine;

/// The displayed card stream for one consumer.
#[derive(Clone)]
pub struct FeedView {
    engine: FeedEngine,
    cards: Vec<Card>,
}

impl FeedView {
    /// Create a view over an engine.
    #[must_use]
    pub fn new(engine: FeedEngine) -> Self {
        Self {
            engine,
            cards: Vec::new(),
        }
    }

    /// Scroll forward one card.
    ///
    /// Shifts the next ready card and reports its display. If the ready
    /// queue is empty, the loading sentinel is appended instead (at most
    /// one - scrolling further just stays on it) and no display is
    /// reported.
    pub fn advance(&mut self) -> &Card {
        match self.engine.shift_card() {
            Some(card) => {
                self.cards.push(card);
                self.engine.on_card_displayed();
            }
            None => {
                let tail_is_sentinel = self.cards.last().map_or(false, Card::is_loading);
                if !tail_is_sentinel {
                    self.cards.push(Card::loading());
                }
            }
        }

        self.cards.last().expect("advance always leaves a tail card")
    }

    /// React to a card-ready notification.
    ///
    /// If the stream currently ends in the loading sentinel, replace it
    /// with the newly ready card and report the display. Returns whether a
    /// replacement happened.
    pub fn on_card_ready(&mut self) -> bool {
        match self.cards.last_mut() {
            Some(tail) if tail.is_loading() => match self.engine.shift_card() {
                Some(card) => {
                    *tail = card;
                    self.engine.on_card_displayed();
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// The displayed stream, in display order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Number of cards in the displayed stream.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether nothing has been displayed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The engine this view consumes from.
    #[must_use]
    pub fn engine(&self) -> &FeedEngine {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardId, CardPool};
    use crate::core::EngineConfig;
    use crate::hydrate::{ExcerptSource, HydrationError};
    use crate::Excerpt;
    use async_trait::async_trait;
    use std::sync::Arc;

    /// A source that never finds excerpts. Meme cards need no call, so
    /// they hydrate regardless.
    struct NoExcerpts;

    #[async_trait]
    impl ExcerptSource for NoExcerpts {
        async fn excerpt_by_title(&self, _: &str) -> Result<Option<Excerpt>, HydrationError> {
            Ok(None)
        }

        async fn excerpt_by_slug(&self, _: &str) -> Result<Option<Excerpt>, HydrationError> {
            Ok(None)
        }
    }

    fn meme_pool(n: u32) -> CardPool {
        let mut pool = CardPool::new();
        for i in 1..=n {
            pool.add(Card::meme(CardId::new(i), format!("meme-{i}"), "https://img"));
        }
        pool
    }

    fn engine(target: usize) -> FeedEngine {
        FeedEngine::new(
            EngineConfig::new().with_target_size(target).with_seed(7),
            Arc::new(NoExcerpts),
        )
    }

    #[tokio::test]
    async fn test_advance_shows_ready_card() {
        let engine = engine(2);
        let mut events = engine.subscribe();
        engine.initialize(meme_pool(3), vec![], vec![], crate::Preferences::all());

        // Let the pipeline commit a card.
        events.recv().await.unwrap();

        let mut view = FeedView::new(engine);
        assert!(!view.advance().is_loading());
        assert_eq!(view.len(), 1);
    }

    #[tokio::test]
    async fn test_fast_scroll_appends_single_sentinel() {
        // Empty pool: nothing will ever be ready.
        let engine = engine(2);
        engine.initialize(CardPool::new(), vec![], vec![], crate::Preferences::all());

        let mut view = FeedView::new(engine);
        assert!(view.advance().is_loading());
        assert!(view.advance().is_loading());

        // Scrolling repeatedly does not stack sentinels.
        assert_eq!(view.len(), 1);
    }

    #[tokio::test]
    async fn test_ready_card_replaces_trailing_sentinel() {
        let engine = engine(1);
        let mut events = engine.subscribe();

        // Outrun the queue before hydration has committed anything.
        let mut view = FeedView::new(engine.clone());
        engine.initialize(meme_pool(2), vec![], vec![], crate::Preferences::all());
        assert!(view.advance().is_loading());

        events.recv().await.unwrap();
        assert!(view.on_card_ready());

        // The sentinel was replaced in place, not appended after.
        assert_eq!(view.len(), 1);
        assert!(!view.cards()[0].is_loading());
    }

    #[tokio::test]
    async fn test_earlier_cards_keep_positions() {
        let engine = engine(2);
        let mut events = engine.subscribe();
        engine.initialize(meme_pool(2), vec![], vec![], crate::Preferences::all());

        events.recv().await.unwrap();
        events.recv().await.unwrap();

        let mut view = FeedView::new(engine);
        let first_title = view.advance().title.clone();
        view.advance();

        // Queue is drained (pool exhausted cards are reused only via new
        // hydrations); scroll past the end.
        while !view.cards().last().unwrap().is_loading() {
            view.advance();
        }

        assert_eq!(view.cards()[0].title, first_title);
    }

    #[tokio::test]
    async fn test_on_card_ready_without_sentinel_is_noop() {
        let engine = engine(2);
        let mut events = engine.subscribe();
        engine.initialize(meme_pool(3), vec![], vec![], crate::Preferences::all());
        events.recv().await.unwrap();

        let mut view = FeedView::new(engine);
        view.advance();

        assert!(!view.on_card_ready());
    }
}
