//! Card system: the data model and the candidate pools.
//!
//! ## Key Types
//!
//! - `CardKind`: The fixed set of feed card kinds
//! - `CardId`: Identifier, unique within a kind's pool
//! - `CardKey`: Kind + id, the identity used by all bookkeeping
//! - `Card` / `CardPayload`: A feed item with kind-specific data
//! - `Excerpt`: The display payload attached by hydration
//! - `CardPool`: Per-kind candidate lists supplied by the catalog

pub mod card;
pub mod pool;

pub use card::{Card, CardId, CardKey, CardKind, CardPayload, Excerpt};
pub use pool::CardPool;
