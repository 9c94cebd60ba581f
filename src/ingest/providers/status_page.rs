use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use crate::ingest::parse::parse_feed;
use crate::ingest::types::{FeedLoader, FeedSnapshot};

/// Fetches a status-page history feed over HTTP.
///
/// No per-request timeout is set; a stalled connection holds that watcher
/// until the transport gives up.
#[derive(Clone, Default)]
pub struct StatusPageLoader {
    client: Client,
}

impl StatusPageLoader {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

#[async_trait]
impl FeedLoader for StatusPageLoader {
    async fn load(&self, url: &str) -> Result<FeedSnapshot> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url} status"))?;
        let body = resp.text().await.context("feed http .text()")?;
        Ok(parse_feed(&body))
    }
}

/// Serves a fixed document instead of hitting the network.
pub struct FixtureLoader {
    body: String,
}

impl FixtureLoader {
    pub fn from_fixture_str(s: &str) -> Self {
        Self {
            body: s.to_string(),
        }
    }
}

#[async_trait]
impl FeedLoader for FixtureLoader {
    async fn load(&self, _url: &str) -> Result<FeedSnapshot> {
        Ok(parse_feed(&self.body))
    }
}
