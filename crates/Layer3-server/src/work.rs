//! Device work function - simulated provisioning with a journal side effect

use async_trait::async_trait;
use relay_foundation::{CompletionJournal, Result};
use relay_task::{TaskOutcome, WorkFn};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default Relay work function
///
/// Sleeps for the configured delay (standing in for real device work),
/// appends one line to the completion journal, and returns a human-readable
/// confirmation.
pub struct DeviceWork {
    /// Completion log sink
    journal: Arc<CompletionJournal>,

    /// Simulated work duration
    delay: Duration,
}

impl DeviceWork {
    /// Create a device work function
    pub fn new(journal: Arc<CompletionJournal>, delay: Duration) -> Self {
        Self { journal, delay }
    }
}

#[async_trait]
impl WorkFn for DeviceWork {
    async fn execute(&self, input: &str) -> Result<TaskOutcome> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.journal.append(input).await?;
        debug!(token = input, "Device work finished");

        Ok(TaskOutcome::new(format!("Task completed for {input}")))
    }

    fn name(&self) -> &'static str {
        "device-provision"
    }
}
