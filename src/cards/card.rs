//! Card data model - the items the feed schedules.
//!
//! A `Card` is a tagged variant over the kinds the feed can show. Some kinds
//! arrive from the catalog complete (author, meme, comment); the rest carry
//! an `excerpt` slot that is only populated by background hydration.
//!
//! Identity is per kind: a `CardId` is unique within its kind's pool, and
//! `CardKey` (kind + id) is the identity all engine bookkeeping uses.

use serde::{Deserialize, Serialize};

/// The kinds of card the feed can schedule.
///
/// `Loading` is a reserved sentinel used by the presentation layer when the
/// consumer outruns the ready queue. It never appears in a pool and is never
/// selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    Genre,
    Text,
    Commentary,
    Author,
    Topic,
    Meme,
    Comment,
    Loading,
}

impl CardKind {
    /// Every kind that can hold pooled candidates, in a stable order.
    pub const POOLED: [CardKind; 7] = [
        CardKind::Genre,
        CardKind::Text,
        CardKind::Commentary,
        CardKind::Author,
        CardKind::Topic,
        CardKind::Meme,
        CardKind::Comment,
    ];

    /// A short lowercase label (for logging).
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CardKind::Genre => "genre",
            CardKind::Text => "text",
            CardKind::Commentary => "commentary",
            CardKind::Author => "author",
            CardKind::Topic => "topic",
            CardKind::Meme => "meme",
            CardKind::Comment => "comment",
            CardKind::Loading => "loading",
        }
    }
}

impl std::fmt::Display for CardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifier for a card, unique within its kind's pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Composite identity: kind plus per-kind ID.
///
/// All lifecycle bookkeeping (seen, preparing, ready) is keyed by this.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardKey {
    pub kind: CardKind,
    pub id: CardId,
}

impl CardKey {
    /// Create a new card key.
    #[must_use]
    pub const fn new(kind: CardKind, id: CardId) -> Self {
        Self { kind, id }
    }
}

impl std::fmt::Display for CardKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, self.id.raw())
    }
}

/// A hydrated display excerpt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Excerpt {
    /// The quoted passage.
    pub body: String,

    /// Where the passage comes from, when the source reports it.
    pub attribution: Option<String>,
}

impl Excerpt {
    /// Create an excerpt with no attribution.
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            attribution: None,
        }
    }

    /// Set the attribution (builder pattern).
    #[must_use]
    pub fn with_attribution(mut self, attribution: impl Into<String>) -> Self {
        self.attribution = Some(attribution.into());
        self
    }
}

/// Kind-specific payload.
///
/// The excerpt-bearing variants start out with `excerpt: None` in the pool;
/// hydration fills them in. Author, meme and comment cards arrive complete.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CardPayload {
    Genre {
        /// Titles of books filed under this genre. Hydration may attach an
        /// excerpt from the first one.
        books: Vec<String>,
        excerpt: Option<Excerpt>,
    },
    Text {
        excerpt: Option<Excerpt>,
    },
    Commentary {
        excerpt: Option<Excerpt>,
    },
    Author {
        /// One-line blurb shown under the author's name. Required.
        headline: String,
    },
    Topic {
        /// Catalog slug used to look up an excerpt for this topic.
        slug: String,
        excerpt: Option<Excerpt>,
    },
    Meme {
        /// Required image location.
        image_url: String,
        caption: Option<String>,
    },
    Comment {
        /// Required comment body.
        body: String,
        source_title: Option<String>,
    },
    Loading,
}

/// A single feed item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Identifier, unique within this card's kind.
    pub id: CardId,

    /// Display title.
    pub title: String,

    /// Kind-specific payload.
    pub payload: CardPayload,
}

impl Card {
    /// Create a genre card. Hydration may attach an excerpt from the first
    /// listed book.
    #[must_use]
    pub fn genre(id: CardId, title: impl Into<String>, books: Vec<String>) -> Self {
        Self {
            id,
            title: title.into(),
            payload: CardPayload::Genre { books, excerpt: None },
        }
    }

    /// Create a text card. Its excerpt is fetched by title during hydration.
    #[must_use]
    pub fn text(id: CardId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            payload: CardPayload::Text { excerpt: None },
        }
    }

    /// Create a commentary card. Its excerpt is fetched by title during
    /// hydration.
    #[must_use]
    pub fn commentary(id: CardId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            payload: CardPayload::Commentary { excerpt: None },
        }
    }

    /// Create an author card. Arrives complete; `headline` must be
    /// non-empty to be displayable.
    #[must_use]
    pub fn author(id: CardId, name: impl Into<String>, headline: impl Into<String>) -> Self {
        Self {
            id,
            title: name.into(),
            payload: CardPayload::Author { headline: headline.into() },
        }
    }

    /// Create a topic card. Its excerpt is fetched by slug during hydration,
    /// but the card is displayable without one.
    #[must_use]
    pub fn topic(id: CardId, title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            payload: CardPayload::Topic { slug: slug.into(), excerpt: None },
        }
    }

    /// Create a meme card. Arrives complete; `image_url` must be non-empty
    /// to be displayable.
    #[must_use]
    pub fn meme(id: CardId, title: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            payload: CardPayload::Meme { image_url: image_url.into(), caption: None },
        }
    }

    /// Create a comment card. Arrives complete; `body` must be non-empty to
    /// be displayable.
    #[must_use]
    pub fn comment(id: CardId, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            payload: CardPayload::Comment { body: body.into(), source_title: None },
        }
    }

    /// The reserved loading sentinel shown while the consumer outruns the
    /// ready queue.
    #[must_use]
    pub fn loading() -> Self {
        Self {
            id: CardId::new(0),
            title: String::new(),
            payload: CardPayload::Loading,
        }
    }

    /// This card's kind, derived from its payload.
    #[must_use]
    pub fn kind(&self) -> CardKind {
        match self.payload {
            CardPayload::Genre { .. } => CardKind::Genre,
            CardPayload::Text { .. } => CardKind::Text,
            CardPayload::Commentary { .. } => CardKind::Commentary,
            CardPayload::Author { .. } => CardKind::Author,
            CardPayload::Topic { .. } => CardKind::Topic,
            CardPayload::Meme { .. } => CardKind::Meme,
            CardPayload::Comment { .. } => CardKind::Comment,
            CardPayload::Loading => CardKind::Loading,
        }
    }

    /// This card's bookkeeping key.
    #[must_use]
    pub fn key(&self) -> CardKey {
        CardKey::new(self.kind(), self.id)
    }

    /// Whether this is the loading sentinel.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.payload, CardPayload::Loading)
    }

    /// The hydrated excerpt, for kinds that carry one.
    #[must_use]
    pub fn excerpt(&self) -> Option<&Excerpt> {
        match &self.payload {
            CardPayload::Genre { excerpt, .. }
            | CardPayload::Text { excerpt }
            | CardPayload::Commentary { excerpt }
            | CardPayload::Topic { excerpt, .. } => excerpt.as_ref(),
            _ => None,
        }
    }

    /// Attach a hydrated excerpt. No-op for kinds without an excerpt slot.
    pub fn attach_excerpt(&mut self, value: Excerpt) {
        match &mut self.payload {
            CardPayload::Genre { excerpt, .. }
            | CardPayload::Text { excerpt }
            | CardPayload::Commentary { excerpt }
            | CardPayload::Topic { excerpt, .. } => *excerpt = Some(value),
            _ => {}
        }
    }

    /// For pre-complete kinds, the name of the first missing required field,
    /// if any. Returns `None` for hydratable kinds and for valid cards.
    #[must_use]
    pub fn missing_field(&self) -> Option<&'static str> {
        match &self.payload {
            CardPayload::Author { headline } => {
                if self.title.trim().is_empty() {
                    Some("title")
                } else if headline.trim().is_empty() {
                    Some("headline")
                } else {
                    None
                }
            }
            CardPayload::Meme { image_url, .. } => {
                if image_url.trim().is_empty() {
                    Some("image_url")
                } else {
                    None
                }
            }
            CardPayload::Comment { body, .. } => {
                if body.trim().is_empty() {
                    Some("body")
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}
