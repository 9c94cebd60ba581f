//! Replays two saved copies of a feed through a watcher: the first as the
//! baseline, the second as the next poll. Prints the events a live tracker
//! would have printed between them.
//!
//! Usage: feed-replay <before.xml> <after.xml>

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use status_feed_tracker::ingest::parse::parse_feed;
use status_feed_tracker::ingest::providers::scripted::{ScriptedLoader, Step};
use status_feed_tracker::ingest::Fetcher;
use status_feed_tracker::{ConsoleNotifier, FeedWatcher};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [before, after] = args.as_slice() else {
        bail!("usage: feed-replay <before.xml> <after.xml>");
    };

    let mut steps = Vec::with_capacity(2);
    for path in [before, after] {
        let body = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
        steps.push(Step::Serve(parse_feed(&body)));
    }

    let console = ConsoleNotifier;
    console.print_banner()?;

    let fetcher = Fetcher::new(Arc::new(ScriptedLoader::new(steps))).with_retries(1);
    let mut watcher = FeedWatcher::new(
        format!("replay:{after}"),
        fetcher,
        Arc::new(console),
        Duration::ZERO,
    );
    let baseline = watcher.poll_once().await?;
    let next = watcher.poll_once().await?;
    tracing::info!(?baseline, ?next, "replay done");
    Ok(())
}
