//! Shared test support: a scripted excerpt source driven over channels.
//!
//! Every lookup the engine issues arrives at the test as a
//! `HydrationRequest`; the test decides when and how each one completes.
//! That makes completion order, failures and stale-epoch races fully
//! deterministic under the current-thread test runtime.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use card_feed::hydrate::{ExcerptSource, HydrationError};
use card_feed::{Card, CardId, CardPool, Excerpt};

/// What the engine asked for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
    Title(String),
    Slug(String),
}

/// One lookup issued by the engine, waiting for a scripted reply.
pub struct HydrationRequest {
    pub lookup: Lookup,
    reply: oneshot::Sender<Result<Option<Excerpt>, HydrationError>>,
}

impl HydrationRequest {
    /// The title or slug that was looked up.
    pub fn key(&self) -> &str {
        match &self.lookup {
            Lookup::Title(s) | Lookup::Slug(s) => s,
        }
    }

    pub fn succeed(self, body: &str) {
        let _ = self.reply.send(Ok(Some(Excerpt::new(body))));
    }

    pub fn not_found(self) {
        let _ = self.reply.send(Ok(None));
    }

    pub fn fail(self) {
        let _ = self
            .reply
            .send(Err(HydrationError::Service("scripted failure".into())));
    }
}

/// An `ExcerptSource` that forwards every lookup to the test.
pub struct ScriptedSource {
    requests: mpsc::UnboundedSender<HydrationRequest>,
}

impl ScriptedSource {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<HydrationRequest>) {
        let (requests, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { requests }), rx)
    }

    async fn forward(&self, lookup: Lookup) -> Result<Option<Excerpt>, HydrationError> {
        let (reply, response) = oneshot::channel();
        if self.requests.send(HydrationRequest { lookup, reply }).is_err() {
            return Err(HydrationError::Service("test finished".into()));
        }
        response
            .await
            .unwrap_or_else(|_| Err(HydrationError::Service("reply dropped".into())))
    }
}

#[async_trait]
impl ExcerptSource for ScriptedSource {
    async fn excerpt_by_title(&self, title: &str) -> Result<Option<Excerpt>, HydrationError> {
        self.forward(Lookup::Title(title.to_owned())).await
    }

    async fn excerpt_by_slug(&self, slug: &str) -> Result<Option<Excerpt>, HydrationError> {
        self.forward(Lookup::Slug(slug.to_owned())).await
    }
}

/// Give spawned hydration tasks a chance to run on the current-thread
/// runtime.
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

/// Collect the requests that are pending right now, without blocking for
/// more.
pub async fn drain_pending(
    rx: &mut mpsc::UnboundedReceiver<HydrationRequest>,
) -> Vec<HydrationRequest> {
    settle().await;
    let mut pending = Vec::new();
    while let Ok(request) = rx.try_recv() {
        pending.push(request);
    }
    pending
}

/// A pool of `n` text cards titled `text-1` through `text-n`.
pub fn text_pool(n: u32) -> CardPool {
    let mut pool = CardPool::new();
    add_texts(&mut pool, n);
    pool
}

pub fn add_texts(pool: &mut CardPool, n: u32) {
    for i in 1..=n {
        pool.add(Card::text(CardId::new(i), format!("text-{i}")));
    }
}

/// Add `n` genre cards, each with a single book `book-<i>` so hydration
/// issues a title lookup.
pub fn add_genres(pool: &mut CardPool, n: u32) {
    for i in 1..=n {
        pool.add(Card::genre(
            CardId::new(i),
            format!("genre-{i}"),
            vec![format!("book-{i}")],
        ));
    }
}
