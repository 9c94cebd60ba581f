// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod ingest;
pub mod markup;
pub mod notify;
pub mod supervisor;
pub mod timefmt;
pub mod watcher;

// ---- Re-exports for stable public API ----
pub use crate::ingest::config::TrackerConfig;
pub use crate::notify::{ConsoleNotifier, IncidentEvent, Notifier, RecordingNotifier};
pub use crate::supervisor::{run_tracker, spawn_watcher, supervise, WatcherCrash};
pub use crate::watcher::{FeedWatcher, SeenSet, WatcherState};
