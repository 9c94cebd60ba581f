// tests/providers_status_page.rs
use std::sync::Arc;

use status_feed_tracker::ingest::providers::FixtureLoader;
use status_feed_tracker::ingest::{FeedLoader, FetchOutcome, Fetcher};

const BEFORE: &str = include_str!("fixtures/history_before.atom");

#[tokio::test]
async fn fixture_parses_into_entries_in_feed_order() {
    let loader = FixtureLoader::from_fixture_str(BEFORE);
    let snap = loader.load("unused").await.expect("fixture load ok");

    assert!(!snap.is_malformed(), "{:?}", snap.malformed);
    let ids: Vec<&str> = snap.entries.iter().filter_map(|e| e.id.as_deref()).collect();
    assert_eq!(
        ids,
        vec![
            "tag:status.example.com,2005:Incident/200",
            "tag:status.example.com,2005:Incident/199",
        ]
    );
    assert!(snap.entries[0].summary.contains("<li>Files</li>"));
    assert!(snap.entries.iter().all(|e| e.timestamp().is_some()));
}

#[tokio::test]
async fn fetcher_passes_a_good_fixture_through() {
    let fetcher = Fetcher::new(Arc::new(FixtureLoader::from_fixture_str(BEFORE)));
    match fetcher.fetch("https://status.example.com/history.atom").await {
        FetchOutcome::Ready(snap) => assert_eq!(snap.entries.len(), 2),
        FetchOutcome::Unavailable => panic!("fixture should be usable"),
    }
}

#[tokio::test]
async fn fetcher_rejects_an_error_page_without_retrying() {
    let fetcher = Fetcher::new(Arc::new(FixtureLoader::from_fixture_str(
        "<!DOCTYPE html><html><head><title>503</title></head></html>",
    )));
    assert_eq!(fetcher.fetch("u").await, FetchOutcome::Unavailable);
}
