use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::ingest::types::{FeedLoader, FeedSnapshot};

/// A step in a [`ScriptedLoader`] script.
#[derive(Debug, Clone)]
pub enum Step {
    Serve(FeedSnapshot),
    Fail(String),
}

/// Replays a fixed sequence of load results, one per call. The last step
/// repeats once the script runs out.
pub struct ScriptedLoader {
    steps: Mutex<VecDeque<Step>>,
    last: Mutex<Option<Step>>,
    calls: Mutex<usize>,
}

impl ScriptedLoader {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
            last: Mutex::new(None),
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().map(|c| *c).unwrap_or(0)
    }

    fn next_step(&self) -> Result<Step> {
        let poisoned = || anyhow!("scripted loader poisoned");
        *self.calls.lock().map_err(|_| poisoned())? += 1;

        let next = self.steps.lock().map_err(|_| poisoned())?.pop_front();
        let mut last = self.last.lock().map_err(|_| poisoned())?;
        if let Some(step) = next {
            *last = Some(step);
        }
        last.clone().ok_or_else(|| anyhow!("empty script"))
    }
}

#[async_trait]
impl FeedLoader for ScriptedLoader {
    async fn load(&self, _url: &str) -> Result<FeedSnapshot> {
        match self.next_step()? {
            Step::Serve(snapshot) => Ok(snapshot),
            Step::Fail(msg) => Err(anyhow!(msg)),
        }
    }
}
