//! Type selector - decides which card to prepare next.
//!
//! Selection is two-level: round robin over the enabled kinds picks *what
//! kind* comes next, then a uniform-random draw over that kind's untouched
//! candidates picks *which card*. The cursor advances exactly once per call
//! whether or not the kind under it yields a candidate, which is what gives
//! every enabled kind the same long-run share of the feed.
//!
//! When a kind's candidates are exhausted (every pool entry is seen,
//! preparing, or ready), its seen slots are dropped and the draw is retried
//! against everything not currently in flight or buffered - a session never
//! goes quiet just because the catalog is small.

use tracing::trace;

use crate::cards::{Card, CardKind, CardPool};
use crate::core::FeedRng;

use super::tracker::CardTracker;

/// Round-robin cursor over the enabled kinds.
#[derive(Clone, Debug, Default)]
pub(crate) struct TypeSelector {
    cursor: usize,
}

impl TypeSelector {
    /// Create a selector with the cursor at the first enabled kind.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick the next card to prepare, or `None` if every enabled kind is
    /// dry.
    ///
    /// Tries each enabled kind at most once, starting at the cursor. With
    /// `reuse_exhausted`, a kind whose candidates are all tracked gets its
    /// seen slots cleared and is redrawn; replacement selections after a
    /// hydration failure pass `false` so a failed id is never immediately
    /// re-offered (failures are skipped, not retried).
    ///
    /// The caller must mark the returned card as preparing before releasing
    /// the engine lock.
    pub fn pick_next(
        &mut self,
        enabled: &[CardKind],
        pool: &CardPool,
        tracker: &mut CardTracker,
        rng: &mut FeedRng,
        reuse_exhausted: bool,
    ) -> Option<Card> {
        if enabled.is_empty() {
            return None;
        }

        let start = self.cursor % enabled.len();
        self.cursor = (start + 1) % enabled.len();

        for offset in 0..enabled.len() {
            let kind = enabled[(start + offset) % enabled.len()];
            if let Some(card) = pick_from_kind(kind, pool, tracker, rng, reuse_exhausted) {
                trace!(kind = %kind, id = card.id.raw(), "selected candidate");
                return Some(card);
            }
        }

        None
    }
}

/// Uniform-random draw over one kind's available candidates, applying the
/// exhaustion-reuse policy when the first draw comes up empty.
fn pick_from_kind(
    kind: CardKind,
    pool: &CardPool,
    tracker: &mut CardTracker,
    rng: &mut FeedRng,
    reuse_exhausted: bool,
) -> Option<Card> {
    let candidates: Vec<&Card> = pool
        .cards(kind)
        .iter()
        .filter(|c| !tracker.contains(c.key()))
        .collect();

    if let Some(card) = rng.choose(&candidates) {
        return Some((*card).clone());
    }

    if !reuse_exhausted {
        return None;
    }

    // Exhausted: forget what was seen and redraw, now excluding only
    // cards that are in flight or buffered.
    tracker.clear_seen(kind);
    let candidates: Vec<&Card> = pool
        .cards(kind)
        .iter()
        .filter(|c| !tracker.contains(c.key()))
        .collect();

    rng.choose(&candidates).map(|card| (*card).clone())
}
