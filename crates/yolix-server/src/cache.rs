//! Per-video memoization of comment collections.
//!
//! Concurrent requests for the same video share one in-flight collection and
//! all of them receive its outcome, success or failure. Successful results are
//! kept for the life of the process; a failed collection is evicted once it
//! settles, so the next request for that video tries again.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, Shared};
use futures::{FutureExt, TryFutureExt};
use tokio::sync::Mutex;
use yolix_youtube::{VideoComments, YoutubeError};

/// Outcome shared between every caller waiting on one video.
pub type FetchOutcome = Result<Arc<VideoComments>, Arc<YoutubeError>>;

type PendingFetch = Shared<BoxFuture<'static, FetchOutcome>>;

#[derive(Default)]
pub struct CommentCache {
    entries: Mutex<HashMap<String, PendingFetch>>,
}

impl CommentCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collection for `video_id`, starting `fetch` only when no
    /// entry (completed or in flight) exists for it.
    ///
    /// # Errors
    ///
    /// Returns the error of the shared fetch. Every caller that joined the
    /// same in-flight fetch receives the same error.
    pub async fn get_or_fetch<F, Fut>(&self, video_id: &str, fetch: F) -> FetchOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<VideoComments, YoutubeError>> + Send + 'static,
    {
        let pending = {
            let mut entries = self.entries.lock().await;
            if let Some(existing) = entries.get(video_id) {
                tracing::debug!(video_id, "joining cached comment collection");
                existing.clone()
            } else {
                let started = fetch().map_ok(Arc::new).map_err(Arc::new).boxed().shared();
                entries.insert(video_id.to_owned(), started.clone());
                started
            }
        };

        let outcome = pending.clone().await;
        if outcome.is_err() {
            let mut entries = self.entries.lock().await;
            // A retry may already have replaced the failed entry.
            if entries.get(video_id).is_some_and(|current| current.ptr_eq(&pending)) {
                entries.remove(video_id);
            }
        }
        outcome
    }

    /// Number of videos with a completed collection.
    pub async fn cached_videos(&self) -> usize {
        let entries = self.entries.lock().await;
        entries
            .values()
            .filter(|pending| matches!(pending.peek(), Some(Ok(_))))
            .count()
    }
}
