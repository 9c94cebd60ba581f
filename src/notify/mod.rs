// src/notify/mod.rs
pub mod console;
pub mod recording;

use anyhow::Result;

pub use console::ConsoleNotifier;
pub use recording::RecordingNotifier;

/// Width of the rule under each event and of the startup banner.
pub const RULE_WIDTH: usize = 60;

/// One new incident update, ready to be shown. Built per emission and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentEvent {
    pub product: String,
    pub status: String,
    pub timestamp: String,
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, ev: &IncidentEvent) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Event block as printed: blank line, header, status, rule.
pub fn render_event(ev: &IncidentEvent) -> String {
    format!(
        "\n[{}] Product: {}\nStatus: {}\n{}\n",
        ev.timestamp,
        ev.product,
        ev.status,
        "-".repeat(RULE_WIDTH)
    )
}

pub fn banner() -> String {
    "=".repeat(RULE_WIDTH)
}
