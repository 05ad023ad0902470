//! # card-feed
//!
//! A card feed scheduling engine for short-form content streams.
//!
//! ## Design Principles
//!
//! 1. **Engine Per Session**: No global state. Each consumer constructs its
//!    own `FeedEngine`; parallel sessions (and parallel tests) share
//!    nothing.
//!
//! 2. **Never Block the Consumer**: Every public entry point locks, mutates
//!    and returns. Hydration is the only suspension point and runs in
//!    spawned tasks. An empty buffer is answered with `None`, not a wait.
//!
//! 3. **Bounded Lookahead**: At most `target_size` cards are ever ready or
//!    in flight. Demand (a displayed card) releases exactly one slot.
//!
//! ## Architecture
//!
//! - **Two-Level Selection**: round robin over enabled kinds for fairness,
//!   uniform-random draw within a kind via a seeded, replayable RNG.
//!
//! - **Single Location Map**: a card id lives in at most one lifecycle slot
//!   (seen, preparing, ready); the invariant is structural, not re-checked.
//!
//! - **Epoch Cancellation**: there is no cancel API. Resets bump a
//!   generation counter and stale hydration completions are dropped on
//!   arrival.
//!
//! ## Modules
//!
//! - `core`: Seeded RNG, engine configuration, preference flags
//! - `cards`: Card data model and candidate pools
//! - `feed`: The scheduling engine, its events, and its internals
//! - `hydrate`: The external excerpt contract and per-kind hydration rules
//! - `view`: Consumer-side scroll adapter (loading-sentinel handling)

pub mod cards;
pub mod core;
pub mod feed;
pub mod hydrate;
pub mod view;

// Re-export commonly used types
pub use crate::cards::{Card, CardId, CardKey, CardKind, CardPayload, CardPool, Excerpt};

pub use crate::core::{EngineConfig, FeedRng, KindList, Preferences, DEFAULT_TARGET_SIZE};

pub use crate::feed::{FeedEngine, FeedEvent};

pub use crate::hydrate::{ExcerptSource, HydrationError};

pub use crate::view::FeedView;
