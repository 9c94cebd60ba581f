// src/timefmt.rs
use chrono::{DateTime, FixedOffset, Utc};

/// Display offset for event timestamps: UTC+05:30 (IST).
pub const DISPLAY_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Rendered when an entry carries neither an updated nor a published time.
pub const UNKNOWN_TIME: &str = "Unknown time";

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a feed timestamp (UTC) in the fixed display offset.
pub fn format_time(ts: Option<DateTime<Utc>>) -> String {
    let Some(ts) = ts else {
        return UNKNOWN_TIME.to_string();
    };
    match FixedOffset::east_opt(DISPLAY_OFFSET_SECS) {
        Some(tz) => ts.with_timezone(&tz).format(DISPLAY_FORMAT).to_string(),
        None => ts.format(DISPLAY_FORMAT).to_string(),
    }
}

/// Parse a feed timestamp. Atom uses RFC 3339 and RSS uses RFC 2822, but
/// feeds mix them often enough that both are tried.
pub fn parse_feed_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
