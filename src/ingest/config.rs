// src/ingest/config.rs
use std::time::Duration;

pub const ENV_POLL_INTERVAL: &str = "POLL_INTERVAL";
pub const ENV_STATUS_PAGES: &str = "STATUS_PAGES";

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
pub const MIN_POLL_INTERVAL_SECS: u64 = 10;

pub const DEFAULT_STATUS_PAGE: &str = "https://status.openai.com";
/// Appended to every status-page base URL.
pub const FEED_PATH: &str = "/history.atom";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub poll_interval: Duration,
    pub feeds: Vec<String>,
}

impl TrackerConfig {
    /// Read `POLL_INTERVAL` and `STATUS_PAGES`. Never fails: bad values fall
    /// back to defaults with a warning.
    pub fn from_env() -> Self {
        let interval_raw = std::env::var(ENV_POLL_INTERVAL)
            .unwrap_or_else(|_| DEFAULT_POLL_INTERVAL_SECS.to_string());
        let pages =
            std::env::var(ENV_STATUS_PAGES).unwrap_or_else(|_| DEFAULT_STATUS_PAGE.to_string());
        Self {
            poll_interval: Duration::from_secs(parse_interval(&interval_raw)),
            feeds: feed_urls(&pages),
        }
    }
}

/// Poll interval in seconds. Non-numeric or below the floor gives the default.
pub fn parse_interval(raw: &str) -> u64 {
    match raw.trim().parse::<i64>() {
        Ok(v) if v < MIN_POLL_INTERVAL_SECS as i64 => {
            tracing::warn!(
                "{ENV_POLL_INTERVAL} too low ({v}), defaulting to {DEFAULT_POLL_INTERVAL_SECS}s"
            );
            DEFAULT_POLL_INTERVAL_SECS
        }
        Ok(v) => v as u64,
        Err(_) => {
            tracing::warn!(
                "invalid {ENV_POLL_INTERVAL} '{raw}', defaulting to {DEFAULT_POLL_INTERVAL_SECS}s"
            );
            DEFAULT_POLL_INTERVAL_SECS
        }
    }
}

/// Comma-separated status-page URLs into feed URLs.
pub fn feed_urls(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(|u| format!("{}{FEED_PATH}", u.trim_end_matches('/')))
        .collect()
}
