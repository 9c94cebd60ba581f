// src/ingest/fetcher.rs
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;

use crate::ingest::types::{FeedLoader, FeedSnapshot};

/// Attempts per cycle before the feed is skipped until the next poll.
pub const MAX_RETRIES: u32 = 3;
/// Base of the linear backoff: attempt `n` failing waits `n * RETRY_BACKOFF`.
pub const RETRY_BACKOFF: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Ready(FeedSnapshot),
    /// Retries exhausted or the feed came back malformed. Nothing to process
    /// this cycle.
    Unavailable,
}

/// Fetch-with-retry around a [`FeedLoader`]. Never returns an error: every
/// failure is logged and folded into [`FetchOutcome::Unavailable`].
#[derive(Clone)]
pub struct Fetcher {
    loader: Arc<dyn FeedLoader>,
    max_retries: u32,
    backoff: Duration,
}

impl Fetcher {
    pub fn new(loader: Arc<dyn FeedLoader>) -> Self {
        Self {
            loader,
            max_retries: MAX_RETRIES,
            backoff: RETRY_BACKOFF,
        }
    }

    /// `0` is treated as `1`: there is always at least one attempt.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries.max(1);
        self
    }

    pub fn with_backoff(mut self, base: Duration) -> Self {
        self.backoff = base;
        self
    }

    pub async fn fetch(&self, feed_url: &str) -> FetchOutcome {
        let max = self.max_retries;
        for attempt in 1..=max {
            counter!("feed_fetch_attempts_total", "feed" => feed_url.to_string()).increment(1);
            match self.loader.load(feed_url).await {
                Ok(snapshot) => {
                    // Reachable but unusable; retrying would return the same body.
                    if let Some(reason) = &snapshot.malformed {
                        tracing::warn!(feed = %feed_url, reason = %reason, "malformed feed");
                        counter!("feed_malformed_total", "feed" => feed_url.to_string())
                            .increment(1);
                        return FetchOutcome::Unavailable;
                    }
                    return FetchOutcome::Ready(snapshot);
                }
                Err(e) => {
                    tracing::error!(
                        feed = %feed_url,
                        attempt,
                        max,
                        "fetch attempt {attempt}/{max} failed: {e:#}"
                    );
                    counter!("feed_fetch_failures_total", "feed" => feed_url.to_string())
                        .increment(1);
                    if attempt < max {
                        tokio::time::sleep(self.backoff * attempt).await;
                    }
                }
            }
        }

        tracing::error!(feed = %feed_url, "all retries exhausted, skipping this cycle");
        FetchOutcome::Unavailable
    }
}
