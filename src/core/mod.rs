//! Core engine types: RNG, configuration, preferences.
//!
//! This module contains the session-agnostic building blocks. Consumers
//! configure the engine via `EngineConfig` and `Preferences` rather than
//! modifying the core.

pub mod config;
pub mod rng;

pub use config::{EngineConfig, KindList, Preferences, DEFAULT_TARGET_SIZE};
pub use rng::FeedRng;
