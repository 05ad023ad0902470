//! The feed scheduling engine.
//!
//! `FeedEngine` owns all session state behind one lock: the candidate pool,
//! the lifecycle tracker, the ready queue, the round-robin selector, the
//! enabled-kind list, and the reset epoch. Public entry points lock, mutate,
//! and return - nothing inside the lock awaits. Hydration runs in spawned
//! tasks and is the only suspension point, so the consumer is never blocked
//! by the engine.
//!
//! ## Backpressure
//!
//! `ready + preparing` never exceeds the configured target size. A fill
//! pass computes the deficit and performs that many select-and-mark steps
//! while still holding the lock, so concurrent fills cannot overshoot; only
//! then are hydration tasks spawned.
//!
//! ## Resets and the epoch
//!
//! There is no cancel API. Every hydration task carries the epoch captured
//! at selection; a full reset bumps the engine epoch, and any completion
//! whose epoch no longer matches is dropped without touching state. A task
//! that outlives a reset therefore cannot resurrect pre-reset bookkeeping.
//!
//! ## Ordering
//!
//! The ready queue is FIFO in hydration *completion* order. Two cards
//! selected in round-robin order A, B may commit as B, A when B's fetch is
//! faster; consumers must not assume selection order survives into the
//! queue.

use std::sync::Arc;

use im::Vector;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::cards::{Card, CardKind, CardPool};
use crate::core::{EngineConfig, FeedRng, KindList, Preferences};
use crate::hydrate::{hydrate_card, ExcerptSource};

use super::events::FeedEvent;
use super::reconciler::{classify, Reconciliation};
use super::selector::TypeSelector;
use super::tracker::CardTracker;

/// Everything behind the engine lock.
struct EngineState {
    pool: CardPool,
    tracker: CardTracker,
    ready: Vector<Card>,
    selector: TypeSelector,
    enabled: KindList,
    prefs: Preferences,
    epoch: u64,
    rng: FeedRng,
}

impl EngineState {
    /// Recompute which kinds the selector visits: preference flag on and
    /// pool non-empty.
    fn recompute_enabled(&mut self) {
        let pool = &self.pool;
        self.enabled = self
            .prefs
            .enabled_kinds()
            .into_iter()
            .filter(|&kind| pool.has_candidates(kind))
            .collect();
    }

    /// Pick the next candidate and atomically mark it preparing, capturing
    /// the epoch its hydration belongs to.
    ///
    /// `reuse_exhausted` is false for replacement selections after a
    /// failure, so a skipped id cannot be immediately re-offered.
    fn select_and_mark(&mut self, reuse_exhausted: bool) -> Option<(Card, u64)> {
        let card = self.selector.pick_next(
            &self.enabled,
            &self.pool,
            &mut self.tracker,
            &mut self.rng,
            reuse_exhausted,
        )?;
        self.tracker.mark_preparing(card.key());
        Some((card, self.epoch))
    }
}

struct EngineInner {
    state: Mutex<EngineState>,
    source: Arc<dyn ExcerptSource>,
    events: broadcast::Sender<FeedEvent>,
    target_size: usize,
    runtime: Handle,
}

/// A per-session feed scheduling engine handle.
///
/// Cheap to clone; clones share the same session. Construct one engine per
/// session rather than holding a process-wide instance - parallel sessions
/// (and parallel tests) then share nothing.
///
/// ```no_run
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use card_feed::{Card, CardId, CardPool, EngineConfig, Excerpt, FeedEngine, Preferences};
/// use card_feed::hydrate::{ExcerptSource, HydrationError};
///
/// struct NoExcerpts;
///
/// #[async_trait]
/// impl ExcerptSource for NoExcerpts {
///     async fn excerpt_by_title(&self, _: &str) -> Result<Option<Excerpt>, HydrationError> {
///         Ok(None)
///     }
///     async fn excerpt_by_slug(&self, _: &str) -> Result<Option<Excerpt>, HydrationError> {
///         Ok(None)
///     }
/// }
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let engine = FeedEngine::new(EngineConfig::new(), Arc::new(NoExcerpts));
///     let pool = CardPool::new().with_card(Card::meme(CardId::new(1), "m", "https://img"));
///     engine.initialize(pool, vec![], vec![], Preferences::all());
///
///     // Meme cards need no network call, so one becomes ready shortly;
///     // subscribe() delivers the notification.
/// }
/// ```
#[derive(Clone)]
pub struct FeedEngine {
    inner: Arc<EngineInner>,
}

impl FeedEngine {
    /// Create an engine.
    ///
    /// Captures the current tokio runtime handle for hydration tasks, so
    /// this must be called from within a runtime. The engine starts empty;
    /// call [`initialize`](Self::initialize) to load content.
    #[must_use]
    pub fn new(config: EngineConfig, source: Arc<dyn ExcerptSource>) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity);

        Self {
            inner: Arc::new(EngineInner {
                state: Mutex::new(EngineState {
                    pool: CardPool::new(),
                    tracker: CardTracker::new(),
                    ready: Vector::new(),
                    selector: TypeSelector::new(),
                    enabled: KindList::new(),
                    prefs: Preferences::none(),
                    epoch: 0,
                    rng: FeedRng::new(config.seed),
                }),
                source,
                events,
                target_size: config.target_size,
                runtime: Handle::current(),
            }),
        }
    }

    /// Load the catalog pool plus the pre-hydrated meme and comment cards,
    /// set the initial preferences, and start filling the lookahead window.
    ///
    /// Re-initializing mid-session behaves like a full reset: in-flight
    /// hydrations from before the call are discarded on completion.
    pub fn initialize(
        &self,
        pool: CardPool,
        meme_cards: Vec<Card>,
        comment_cards: Vec<Card>,
        preferences: Preferences,
    ) {
        debug_assert!(meme_cards.iter().all(|c| c.kind() == CardKind::Meme));
        debug_assert!(comment_cards.iter().all(|c| c.kind() == CardKind::Comment));

        let mut pool = pool;
        pool.add_all(meme_cards);
        pool.add_all(comment_cards);

        {
            let mut state = self.inner.state.lock();
            state.pool = pool;
            state.prefs = preferences;
            state.tracker.clear();
            state.ready = Vector::new();
            state.epoch += 1;
            state.recompute_enabled();
        }

        self.fill();
    }

    /// Apply a preference change.
    ///
    /// Any newly enabled kind forces a full reset (clearing seen, preparing
    /// and ready, and bumping the epoch); kinds that were only disabled get
    /// their buffered cards pruned; otherwise nothing changes.
    pub fn on_preferences_change(&self, preferences: Preferences) {
        // Classify and apply under one lock; notifying and refilling can
        // happen after it is released.
        let applied = {
            let mut state = self.inner.state.lock();
            let action = classify(&state.prefs, &preferences);
            state.prefs = preferences;

            match action {
                Reconciliation::FullReset => {
                    state.tracker.clear();
                    state.ready = Vector::new();
                    state.epoch += 1;
                    state.recompute_enabled();
                    Some(FeedEvent::Reset)
                }

                Reconciliation::PartialPrune { disabled } => {
                    let state = &mut *state;
                    let kept: Vector<Card> = state
                        .ready
                        .iter()
                        .filter(|card| !disabled.contains(&card.kind()))
                        .cloned()
                        .collect();
                    let removed = state.ready.len() - kept.len();

                    for card in state.ready.iter() {
                        if disabled.contains(&card.kind()) {
                            state.tracker.untrack(card.key());
                        }
                    }
                    state.ready = kept;
                    state.recompute_enabled();
                    Some(FeedEvent::Pruned { removed })
                }

                Reconciliation::Idle => None,
            }
        };

        match applied {
            Some(FeedEvent::Reset) => {
                debug!("preferences enabled new kinds, full reset");
                let _ = self.inner.events.send(FeedEvent::Reset);
                self.fill();
            }
            Some(event @ FeedEvent::Pruned { .. }) => {
                debug!("preferences disabled kinds, pruned ready queue");
                let _ = self.inner.events.send(event);
                self.fill();
            }
            _ => {}
        }
    }

    /// Replace the candidate pool after an upstream catalog change.
    ///
    /// Session bookkeeping is untouched - no reset, no prune - but a fill
    /// pass runs because new candidates may end an exhaustion idle.
    pub fn refresh_pool(&self, pool: CardPool) {
        {
            let mut state = self.inner.state.lock();
            state.pool = pool;
            state.recompute_enabled();
        }
        self.fill();
    }

    /// Report that a card obtained from [`shift_card`](Self::shift_card)
    /// was displayed. Triggers exactly one fill pass; at the backpressure
    /// cap this starts zero hydrations.
    pub fn on_card_displayed(&self) {
        self.fill();
    }

    /// Snapshot of the ready queue, head first. O(1); the engine's own
    /// queue cannot be mutated through it.
    #[must_use]
    pub fn ready_queue(&self) -> Vector<Card> {
        self.inner.state.lock().ready.clone()
    }

    /// Pop the next ready card, or `None` when the buffer is empty.
    ///
    /// Callers must not assume a card is available - during fast scrolling
    /// the presentation layer substitutes the loading sentinel instead
    /// (see [`FeedView`](crate::view::FeedView)).
    #[must_use]
    pub fn shift_card(&self) -> Option<Card> {
        let mut state = self.inner.state.lock();
        let card = state.ready.pop_front()?;
        state.tracker.ready_to_seen(card.key());
        Some(card)
    }

    /// Subscribe to feed change notifications. Dropping the receiver
    /// unsubscribes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.inner.events.subscribe()
    }

    /// Whether any kind is currently selectable (preference flag on and
    /// pool non-empty). When false the engine performs no work until
    /// preferences or the pool change.
    #[must_use]
    pub fn has_enabled_content(&self) -> bool {
        !self.inner.state.lock().enabled.is_empty()
    }

    /// Whether at least one card is buffered for display.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        !self.inner.state.lock().ready.is_empty()
    }

    /// Number of hydrations currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.inner.state.lock().tracker.preparing_count()
    }

    /// The configured backpressure cap.
    #[must_use]
    pub fn target_size(&self) -> usize {
        self.inner.target_size
    }

    /// One fill pass: select and mark the whole deficit under the lock,
    /// then spawn one hydration task per selection.
    fn fill(&self) {
        let picks = {
            let mut state = self.inner.state.lock();
            let buffered = state.ready.len() + state.tracker.preparing_count();
            let needed = self.inner.target_size.saturating_sub(buffered);

            let mut picks = Vec::with_capacity(needed);
            for _ in 0..needed {
                match state.select_and_mark(true) {
                    Some(pick) => picks.push(pick),
                    // No kind has a candidate; the engine idles.
                    None => break,
                }
            }
            picks
        };

        for (card, epoch) in picks {
            let inner = Arc::clone(&self.inner);
            self.inner.runtime.spawn(async move {
                prepare(inner, card, epoch).await;
            });
        }
    }
}

/// Drive one backpressure slot to completion.
///
/// Hydrates outside the lock, then commits under it. A failed card is
/// skipped (never retried) and a replacement is selected in the same task,
/// repeating until the slot fills or no candidate remains. A completion
/// from a stale epoch is dropped without touching any state.
async fn prepare(inner: Arc<EngineInner>, card: Card, epoch: u64) {
    // What the commit step decided while the lock was held.
    enum Commit {
        Ready,
        Stale,
        GiveUp,
        Replace(Card, u64),
    }

    let mut card = card;
    let mut epoch = epoch;

    loop {
        let key = card.key();
        let outcome = hydrate_card(inner.source.as_ref(), card).await;

        // The lock is confined to this block; the next hydration await
        // must start with it released.
        let commit = {
            let mut state = inner.state.lock();
            if state.epoch != epoch {
                Commit::Stale
            } else {
                match outcome {
                    Ok(ready_card) => {
                        state.tracker.promote_ready(key);
                        state.ready.push_back(ready_card);
                        Commit::Ready
                    }
                    Err(error) => {
                        warn!(%key, %error, "hydration failed, skipping card");
                        state.tracker.preparing_to_seen(key);
                        match state.select_and_mark(false) {
                            Some((next_card, next_epoch)) => {
                                Commit::Replace(next_card, next_epoch)
                            }
                            // Nothing left to try anywhere; give the slot up.
                            None => Commit::GiveUp,
                        }
                    }
                }
            }
        };

        match commit {
            Commit::Ready => {
                debug!(%key, "card ready");
                let _ = inner.events.send(FeedEvent::CardReady { key });
                return;
            }
            Commit::Stale => {
                debug!(%key, "dropping hydration result from a previous epoch");
                return;
            }
            Commit::GiveUp => return,
            Commit::Replace(next_card, next_epoch) => {
                card = next_card;
                epoch = next_epoch;
            }
        }
    }
}
