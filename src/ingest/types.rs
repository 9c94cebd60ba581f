// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};

/// One incident update as published by the feed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Entry {
    pub id: Option<String>, // entries without one are skipped by the watcher
    pub summary: String,    // raw markup, empty when absent
    pub updated: Option<DateTime<Utc>>,
    pub published: Option<DateTime<Utc>>,
}

impl Entry {
    /// Preferred timestamp: updated, then published.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.updated.or(self.published)
    }
}

/// Result of one fetch-and-parse. `malformed` carries the reason when the
/// body was received but is not a usable feed document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedSnapshot {
    pub entries: Vec<Entry>,
    pub malformed: Option<String>,
}

impl FeedSnapshot {
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        Self {
            entries,
            malformed: None,
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            malformed: Some(reason.into()),
        }
    }

    pub fn is_malformed(&self) -> bool {
        self.malformed.is_some()
    }
}

/// Loads and parses one feed URL. `Err` means a transport or read fault,
/// which the fetcher retries; a malformed body is reported in the snapshot.
#[async_trait::async_trait]
pub trait FeedLoader: Send + Sync {
    async fn load(&self, url: &str) -> Result<FeedSnapshot>;
}
