// src/supervisor.rs
//! Runs one watcher task per feed and reports the ones that die.
//!
//! Each watcher is its own tokio task, so a crash (error or panic) ends only
//! that feed. Nothing is restarted.

use std::sync::Arc;

use anyhow::Result;
use metrics::counter;
use tokio::task::JoinHandle;

use crate::ingest::config::TrackerConfig;
use crate::ingest::fetcher::Fetcher;
use crate::ingest::types::FeedLoader;
use crate::notify::Notifier;
use crate::watcher::FeedWatcher;

/// A watcher that stopped, with the fault that stopped it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatcherCrash {
    pub feed_url: String,
    pub error: String,
}

pub struct WatcherHandle {
    feed_url: String,
    handle: JoinHandle<Result<()>>,
}

impl WatcherHandle {
    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Wait for the task to end. `None` if it returned cleanly.
    pub async fn join(self) -> Option<WatcherCrash> {
        let error = match self.handle.await {
            Ok(Ok(())) => return None,
            Ok(Err(e)) => format!("{e:#}"),
            Err(join_err) => join_err.to_string(),
        };
        Some(WatcherCrash {
            feed_url: self.feed_url,
            error,
        })
    }
}

pub fn spawn_watcher(watcher: FeedWatcher) -> WatcherHandle {
    let feed_url = watcher.feed_url().to_string();
    WatcherHandle {
        feed_url,
        handle: tokio::spawn(watcher.run()),
    }
}

/// Await every watcher, then log each crash. Returns the crashes in feed
/// order.
pub async fn supervise(handles: Vec<WatcherHandle>) -> Vec<WatcherCrash> {
    let mut crashes = Vec::new();
    for h in handles {
        if let Some(crash) = h.join().await {
            crashes.push(crash);
        }
    }
    for c in &crashes {
        tracing::error!(feed = %c.feed_url, "watcher for {} crashed: {}", c.feed_url, c.error);
        counter!("feed_watcher_crashes_total", "feed" => c.feed_url.clone()).increment(1);
    }
    crashes
}

/// Build one watcher per configured feed sharing `loader` and `notifier`,
/// spawn them all, and supervise until every one has stopped.
pub async fn run_tracker(
    cfg: &TrackerConfig,
    loader: Arc<dyn FeedLoader>,
    notifier: Arc<dyn Notifier>,
) -> Vec<WatcherCrash> {
    let handles = cfg
        .feeds
        .iter()
        .map(|feed| {
            let fetcher = Fetcher::new(loader.clone());
            spawn_watcher(FeedWatcher::new(
                feed.clone(),
                fetcher,
                notifier.clone(),
                cfg.poll_interval,
            ))
        })
        .collect();
    supervise(handles).await
}
