//! Engine configuration types.
//!
//! Consumers configure the engine at startup by providing:
//! - `EngineConfig`: lookahead target size, RNG seed, event capacity
//! - `Preferences`: which card kinds the user wants to see
//!
//! The engine never hardcodes a session's shape - consumers define it here.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::CardKind;

/// Small inline list of enabled kinds. There are at most seven pooled
/// kinds, so this never spills to the heap.
pub type KindList = SmallVec<[CardKind; 8]>;

/// Engine tuning knobs.
///
/// ## Example
///
/// ```
/// use card_feed::core::EngineConfig;
///
/// let config = EngineConfig::new().with_target_size(3).with_seed(42);
/// assert_eq!(config.target_size, 3);
/// ```
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Maximum combined ready + preparing cards. This is the backpressure
    /// cap: the engine never has more than this many cards buffered or in
    /// flight.
    pub target_size: usize,

    /// Seed for the selection RNG. Same seed, same selection sequence.
    pub seed: u64,

    /// Buffer capacity of the subscriber broadcast channel.
    pub event_capacity: usize,
}

/// Default lookahead window.
pub const DEFAULT_TARGET_SIZE: usize = 5;

impl EngineConfig {
    /// Create a configuration with the default target size of 5.
    #[must_use]
    pub fn new() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            seed: 0,
            event_capacity: 32,
        }
    }

    /// Set the lookahead target size.
    ///
    /// Panics if `target_size` is zero.
    #[must_use]
    pub fn with_target_size(mut self, target_size: usize) -> Self {
        assert!(target_size > 0, "target size must be at least 1");
        self.target_size = target_size;
        self
    }

    /// Set the selection RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the subscriber channel capacity.
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "event capacity must be at least 1");
        self.event_capacity = capacity;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// User preference flags.
///
/// Each flag enables one or more card kinds. The mapping is fixed:
///
/// | Flag | Kinds |
/// |---|---|
/// | `genres` | genre |
/// | `texts` | text |
/// | `commentary` | commentary |
/// | `topics` | topic **and** author |
/// | `memes` | meme |
/// | `comments` | comment |
///
/// Note the one-to-many `topics` mapping: author cards ride on the topics
/// flag rather than having their own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub genres: bool,
    pub texts: bool,
    pub commentary: bool,
    pub topics: bool,
    pub memes: bool,
    pub comments: bool,
}

impl Preferences {
    /// Everything on.
    #[must_use]
    pub fn all() -> Self {
        Self {
            genres: true,
            texts: true,
            commentary: true,
            topics: true,
            memes: true,
            comments: true,
        }
    }

    /// Everything off.
    #[must_use]
    pub fn none() -> Self {
        Self {
            genres: false,
            texts: false,
            commentary: false,
            topics: false,
            memes: false,
            comments: false,
        }
    }

    /// Toggle the genres flag (builder pattern).
    #[must_use]
    pub fn with_genres(mut self, on: bool) -> Self {
        self.genres = on;
        self
    }

    /// Toggle the texts flag (builder pattern).
    #[must_use]
    pub fn with_texts(mut self, on: bool) -> Self {
        self.texts = on;
        self
    }

    /// Toggle the commentary flag (builder pattern).
    #[must_use]
    pub fn with_commentary(mut self, on: bool) -> Self {
        self.commentary = on;
        self
    }

    /// Toggle the topics flag (builder pattern). Controls both topic and
    /// author cards.
    #[must_use]
    pub fn with_topics(mut self, on: bool) -> Self {
        self.topics = on;
        self
    }

    /// Toggle the memes flag (builder pattern).
    #[must_use]
    pub fn with_memes(mut self, on: bool) -> Self {
        self.memes = on;
        self
    }

    /// Toggle the comments flag (builder pattern).
    #[must_use]
    pub fn with_comments(mut self, on: bool) -> Self {
        self.comments = on;
        self
    }

    /// The kinds these flags enable, in round-robin order.
    ///
    /// The order is stable across calls so the selector's cursor stays
    /// meaningful between preference changes.
    #[must_use]
    pub fn enabled_kinds(&self) -> KindList {
        let mut kinds = KindList::new();
        if self.genres {
            kinds.push(CardKind::Genre);
        }
        if self.texts {
            kinds.push(CardKind::Text);
        }
        if self.commentary {
            kinds.push(CardKind::Commentary);
        }
        if self.topics {
            kinds.push(CardKind::Topic);
            kinds.push(CardKind::Author);
        }
        if self.memes {
            kinds.push(CardKind::Meme);
        }
        if self.comments {
            kinds.push(CardKind::Comment);
        }
        kinds
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self::all()
    }
}
