use std::io::Write;

use anyhow::{Context, Result};

use super::{render_event, IncidentEvent, Notifier};

/// Writes event blocks to stdout. Each block goes out under one lock so
/// concurrent watchers never interleave lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn print_banner(&self) -> Result<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", super::banner()).context("write banner")?;
        out.flush().context("flush stdout")
    }
}

#[async_trait::async_trait]
impl Notifier for ConsoleNotifier {
    async fn send(&self, ev: &IncidentEvent) -> Result<()> {
        let block = render_event(ev);
        let mut out = std::io::stdout().lock();
        out.write_all(block.as_bytes()).context("write event")?;
        out.flush().context("flush stdout")
    }

    fn name(&self) -> &'static str {
        "console"
    }
}
