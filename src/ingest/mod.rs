// src/ingest/mod.rs
pub mod config;
pub mod fetcher;
pub mod parse;
pub mod providers;
pub mod types;

pub use fetcher::{FetchOutcome, Fetcher};
pub use types::{Entry, FeedLoader, FeedSnapshot};
