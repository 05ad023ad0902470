//! Hydration - attaching display payloads to selected cards.
//!
//! The engine does not fetch anything itself. An `ExcerptSource` is the
//! external collaborator that resolves excerpts; the engine applies the
//! per-kind accept/reject rules on top of it:
//!
//! | Kind | Call | Null/failure handling |
//! |---|---|---|
//! | text, commentary | by title | reject (card is skipped) |
//! | topic | by slug | accept without excerpt |
//! | genre | by title of first book, if any | accept regardless |
//! | author, meme, comment | none | reject if a required field is missing |
//!
//! The topic row is deliberately asymmetric with text/commentary: a topic
//! card is displayable without an excerpt, a text card is not. The original
//! system shipped with that split and consumers depend on topic cards
//! surviving a flaky excerpt service, so it is preserved exactly.

use async_trait::async_trait;
use thiserror::Error;

use crate::cards::{Card, CardPayload, Excerpt};

/// Why a card failed hydration.
///
/// These never reach the consumer: a failed card is skipped (moved to the
/// seen set) and a replacement is selected instead.
#[derive(Debug, Error)]
pub enum HydrationError {
    /// The excerpt service call itself failed.
    #[error("excerpt service failed: {0}")]
    Service(String),

    /// The service returned no excerpt for a kind that requires one.
    #[error("no excerpt available")]
    EmptyExcerpt,

    /// A pre-complete card is missing a required field.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The loading sentinel reached the pipeline. Indicates a caller bug.
    #[error("loading sentinel is not hydratable")]
    NotHydratable,
}

/// External excerpt provider.
///
/// Implementations wrap whatever transport actually serves excerpts.
/// `Ok(None)` means the lookup succeeded but found nothing; `Err` means the
/// call itself failed. The engine treats those differently per kind (see
/// the module table).
#[async_trait]
pub trait ExcerptSource: Send + Sync {
    /// Look up an excerpt for a work by its title.
    async fn excerpt_by_title(&self, title: &str) -> Result<Option<Excerpt>, HydrationError>;

    /// Look up an excerpt for a topic by its catalog slug.
    async fn excerpt_by_slug(&self, slug: &str) -> Result<Option<Excerpt>, HydrationError>;
}

/// Hydrate one card, applying the per-kind accept/reject rules.
///
/// Returns the card ready for display, or the error that disqualifies it.
pub(crate) async fn hydrate_card(
    source: &dyn ExcerptSource,
    mut card: Card,
) -> Result<Card, HydrationError> {
    match &card.payload {
        CardPayload::Text { .. } | CardPayload::Commentary { .. } => {
            match source.excerpt_by_title(&card.title).await? {
                Some(excerpt) => {
                    card.attach_excerpt(excerpt);
                    Ok(card)
                }
                None => Err(HydrationError::EmptyExcerpt),
            }
        }

        CardPayload::Topic { slug, .. } => {
            // Accept with or without an excerpt; even a failed call does
            // not disqualify a topic card.
            let slug = slug.clone();
            if let Ok(Some(excerpt)) = source.excerpt_by_slug(&slug).await {
                card.attach_excerpt(excerpt);
            }
            Ok(card)
        }

        CardPayload::Genre { books, .. } => {
            // The excerpt is a garnish from the genre's first book.
            if let Some(first) = books.first().cloned() {
                if let Ok(Some(excerpt)) = source.excerpt_by_title(&first).await {
                    card.attach_excerpt(excerpt);
                }
            }
            Ok(card)
        }

        CardPayload::Author { .. } | CardPayload::Meme { .. } | CardPayload::Comment { .. } => {
            // Pre-complete kinds only get a synchronous validity check.
            match card.missing_field() {
                None => Ok(card),
                Some(field) => Err(HydrationError::MissingField(field)),
            }
        }

        CardPayload::Loading => Err(HydrationError::NotHydratable),
    }
}
