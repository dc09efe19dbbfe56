//! Work function trait

use crate::task::TaskOutcome;
use async_trait::async_trait;
use relay_foundation::Result;

/// Work function - implement to define what a task does
///
/// The registry and pool are agnostic to the work itself; anything that can
/// turn an input token into an outcome (or an error) plugs in here.
#[async_trait]
pub trait WorkFn: Send + Sync {
    /// Run the work for one task input
    async fn execute(&self, input: &str) -> Result<TaskOutcome>;

    /// Get work function name
    fn name(&self) -> &'static str;
}
