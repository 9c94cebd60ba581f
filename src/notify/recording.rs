use std::sync::Mutex;

use anyhow::Result;

use super::{IncidentEvent, Notifier};

/// Keeps every event in memory. Used by tests and demos to observe emissions.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<IncidentEvent>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<IncidentEvent> {
        self.events
            .lock()
            .map(|v| v.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, ev: &IncidentEvent) -> Result<()> {
        self.events
            .lock()
            .map_err(|_| anyhow::anyhow!("recording notifier poisoned"))?
            .push(ev.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
