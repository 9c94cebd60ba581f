//! Status feed tracker: binary entrypoint.
//! Reads configuration from the environment, prints the banner, then runs one
//! watcher per feed until every watcher has crashed or the process is killed.

use std::sync::Arc;

use status_feed_tracker::ingest::providers::StatusPageLoader;
use status_feed_tracker::{run_tracker, ConsoleNotifier, TrackerConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Logs go to stderr so stdout carries only the banner and event blocks.
/// `LOG_FORMAT=json` switches to JSON lines; `RUST_LOG` sets the filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .ok()
        .is_some_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; missing file is fine.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = TrackerConfig::from_env();
    if cfg.feeds.is_empty() {
        tracing::warn!("no status pages configured, nothing to watch");
        return Ok(());
    }

    tracing::info!(
        "Starting status tracker | Interval: {}s | Feeds: {}",
        cfg.poll_interval.as_secs(),
        cfg.feeds.len()
    );

    let console = ConsoleNotifier;
    console.print_banner()?;

    let crashes = run_tracker(&cfg, Arc::new(StatusPageLoader::new()), Arc::new(console)).await;
    tracing::info!(crashed = crashes.len(), "all watchers stopped");
    Ok(())
}
