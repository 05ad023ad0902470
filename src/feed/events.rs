//! Feed change notifications.
//!
//! Subscribers get a `tokio::sync::broadcast` receiver of these events.
//! Every variant carries owned data - listeners never see a live reference
//! into engine state, so a reader can never observe a partial mutation.
//! For the queue contents, call `FeedEngine::ready_queue()`; the snapshot
//! is an O(1) clone.

use crate::cards::CardKey;

/// A change in the feed a consumer may want to react to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedEvent {
    /// A hydrated card was committed to the ready queue.
    CardReady {
        /// Identity of the newly ready card.
        key: CardKey,
    },

    /// A full reset ran: all bookkeeping cleared, refill underway. Any
    /// previously snapshotted queue contents are stale.
    Reset,

    /// A partial prune dropped buffered cards of newly disabled kinds.
    Pruned {
        /// How many buffered cards were dropped.
        removed: usize,
    },
}
