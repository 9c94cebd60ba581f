// src/watcher.rs
//! Per-feed polling loop.
//!
//! A [`FeedWatcher`] owns its seen-set and initialization flag outright; no
//! state is shared between feeds. The first successful fetch only seeds the
//! seen-set (baseline), so incidents already listed at startup are never
//! reported. Every later fetch emits one event per identifier not seen before.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use metrics::counter;

use crate::ingest::fetcher::{FetchOutcome, Fetcher};
use crate::ingest::types::Entry;
use crate::markup::{extract_components, extract_status_line, strip_markup};
use crate::notify::{IncidentEvent, Notifier};
use crate::timefmt::format_time;

/// Prepended to the joined component list.
pub const PRODUCT_PREFIX: &str = "OpenAI API - ";
/// Used when an entry lists no affected components.
pub const GENERIC_PRODUCT: &str = "OpenAI Service";

/// Identifiers already accounted for.
///
/// Lives in memory for the life of the process: it is never pruned and never
/// persisted, so a restart re-runs the baseline.
#[derive(Debug, Clone, Default)]
pub struct SeenSet {
    ids: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `id` was not present before.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.ids.contains(id) {
            return false;
        }
        self.ids.insert(id.to_string())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    Uninitialized,
    Running,
}

/// What one cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Fetch gave nothing usable; no state changed.
    Unavailable,
    /// First successful fetch: identifiers absorbed, nothing emitted.
    Baseline { absorbed: usize },
    Polled { emitted: usize },
}

/// `"OpenAI API - A, B"`, or the generic label when the list is empty.
pub fn product_label(components: &[String]) -> String {
    if components.is_empty() {
        GENERIC_PRODUCT.to_string()
    } else {
        format!("{PRODUCT_PREFIX}{}", components.join(", "))
    }
}

/// Build the displayable event for an entry.
pub fn derive_event(entry: &Entry) -> IncidentEvent {
    let components = extract_components(&entry.summary);
    IncidentEvent {
        product: product_label(&components),
        status: extract_status_line(&strip_markup(&entry.summary)),
        timestamp: format_time(entry.timestamp()),
    }
}

pub struct FeedWatcher {
    feed_url: String,
    fetcher: Fetcher,
    notifier: Arc<dyn Notifier>,
    poll_interval: Duration,
    seen: SeenSet,
    state: WatcherState,
}

impl FeedWatcher {
    pub fn new(
        feed_url: impl Into<String>,
        fetcher: Fetcher,
        notifier: Arc<dyn Notifier>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            feed_url: feed_url.into(),
            fetcher,
            notifier,
            poll_interval,
            seen: SeenSet::new(),
            state: WatcherState::Uninitialized,
        }
    }

    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }

    pub fn state(&self) -> WatcherState {
        self.state
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    /// One fetch-and-process cycle. An error here is a notifier failure and
    /// ends the watcher.
    pub async fn poll_once(&mut self) -> Result<CycleOutcome> {
        let snapshot = match self.fetcher.fetch(&self.feed_url).await {
            FetchOutcome::Ready(s) => s,
            FetchOutcome::Unavailable => {
                counter!("feed_unavailable_cycles_total", "feed" => self.feed_url.clone())
                    .increment(1);
                return Ok(CycleOutcome::Unavailable);
            }
        };

        let baseline = self.state == WatcherState::Uninitialized;
        let mut absorbed = 0usize;
        let mut emitted = 0usize;

        for entry in &snapshot.entries {
            let Some(id) = entry.id.as_deref() else {
                tracing::debug!(feed = %self.feed_url, "skipping entry with no id");
                continue;
            };

            if baseline {
                if self.seen.insert(id) {
                    absorbed += 1;
                }
                continue;
            }

            if !self.seen.insert(id) {
                continue;
            }

            let ev = derive_event(entry);
            self.notifier.send(&ev).await?;
            counter!("feed_events_emitted_total", "feed" => self.feed_url.clone()).increment(1);
            emitted += 1;
        }

        if baseline {
            self.state = WatcherState::Running;
            tracing::info!(feed = %self.feed_url, absorbed, "baseline recorded");
            return Ok(CycleOutcome::Baseline { absorbed });
        }
        if emitted > 0 {
            tracing::info!(feed = %self.feed_url, emitted, "new incident updates");
        }
        Ok(CycleOutcome::Polled { emitted })
    }

    /// Poll forever. Only returns when a cycle fails.
    pub async fn run(mut self) -> Result<()> {
        tracing::info!(
            feed = %self.feed_url,
            notifier = self.notifier.name(),
            "Subscribed to {}",
            self.feed_url
        );
        loop {
            self.poll_once().await?;
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
