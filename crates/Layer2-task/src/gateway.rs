//! Submission Gateway and status query - the front door of the task system

use crate::pool::ExecutorPool;
use crate::registry::TaskRegistry;
use crate::task::{Task, TaskId};
use relay_foundation::{Error, Result};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// External view of one task's progress
///
/// `result` is populated only for `SUCCESS`, `error` only for `FAILURE`;
/// both stay empty while the task is non-terminal.
#[derive(Debug, Clone, Serialize)]
pub struct TaskStatusView {
    /// Task id in wire form
    pub task_id: String,

    /// Wire state name: PENDING, RUNNING, SUCCESS, FAILURE
    pub status: &'static str,

    /// Result text, null unless status == SUCCESS
    pub result: Option<String>,

    /// Failure description, absent unless status == FAILURE
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&Task> for TaskStatusView {
    fn from(task: &Task) -> Self {
        Self {
            task_id: task.id.to_string(),
            status: task.state.wire_name(),
            result: task.result().map(str::to_string),
            error: task.error().map(str::to_string),
        }
    }
}

/// Submission gateway
///
/// Validates submissions, creates the record, and admits the task to the
/// executor pool. Creation happens before enqueueing, so an issued id is
/// always resolvable through [`SubmissionGateway::status`] by the time any
/// worker can observe the task.
#[derive(Clone)]
pub struct SubmissionGateway {
    registry: TaskRegistry,
    pool: Arc<ExecutorPool>,
}

impl SubmissionGateway {
    /// Create a gateway over an existing registry and pool
    pub fn new(registry: TaskRegistry, pool: Arc<ExecutorPool>) -> Self {
        Self { registry, pool }
    }

    /// Submit a unit of work; returns the fresh id without waiting for
    /// execution
    pub async fn submit(&self, input: &str) -> Result<TaskId> {
        let token = input.trim();
        if token.is_empty() {
            return Err(Error::Validation("Empty input token".into()));
        }

        let id = self.registry.create(token).await;
        if let Err(e) = self.pool.enqueue(id, token).await {
            // The client never sees this id; do not leave an orphaned record
            self.registry.remove(id).await;
            return Err(e);
        }

        info!(%id, token, "Task queued");
        Ok(id)
    }

    /// Current status of a task
    ///
    /// Reports `NotFound` for ids that were never issued. Read-only; terminal
    /// states read back identically on every call.
    pub async fn status(&self, id: TaskId) -> Result<TaskStatusView> {
        self.registry
            .get(id)
            .await
            .map(|task| TaskStatusView::from(&task))
            .ok_or_else(|| Error::NotFound(format!("Task {id} not found")))
    }

    /// Wait for a task to reach a terminal state
    pub async fn wait(&self, id: TaskId, timeout: Duration) -> Option<Task> {
        self.registry.wait_terminal(id, timeout).await
    }

    /// The underlying registry
    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{AdmissionPolicy, PoolConfig};
    use crate::task::TaskOutcome;
    use crate::work::WorkFn;
    use async_trait::async_trait;
    use tokio::sync::Notify;

    struct EchoWork;

    #[async_trait]
    impl WorkFn for EchoWork {
        async fn execute(&self, input: &str) -> Result<TaskOutcome> {
            Ok(TaskOutcome::new(format!("Task completed for {input}")))
        }

        fn name(&self) -> &'static str {
            "echo"
        }
    }

    /// Blocks until notified
    struct GatedWork {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl WorkFn for GatedWork {
        async fn execute(&self, input: &str) -> Result<TaskOutcome> {
            self.gate.notified().await;
            Ok(TaskOutcome::new(format!("Task completed for {input}")))
        }

        fn name(&self) -> &'static str {
            "gated"
        }
    }

    fn gateway() -> SubmissionGateway {
        let registry = TaskRegistry::new();
        let pool = ExecutorPool::start(PoolConfig::default(), registry.clone(), Arc::new(EchoWork));
        SubmissionGateway::new(registry, Arc::new(pool))
    }

    #[tokio::test]
    async fn test_empty_input_is_rejected_before_any_record_exists() {
        let gateway = gateway();

        for input in ["", "   ", "\t\n"] {
            let err = gateway.submit(input).await.unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        }

        assert!(gateway.registry().is_empty().await);
    }

    #[tokio::test]
    async fn test_submit_returns_immediately_resolvable_id() {
        let gateway = gateway();

        let id = gateway.submit("device-42").await.unwrap();

        // The id resolves right away; the task is Pending or later
        let view = gateway.status(id).await.unwrap();
        assert_eq!(view.task_id, id.to_string());
        assert!(["PENDING", "RUNNING", "SUCCESS"].contains(&view.status));
    }

    #[tokio::test]
    async fn test_status_for_unknown_id_is_not_found() {
        let gateway = gateway();

        let err = gateway.status(TaskId::new()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_terminal_reads_are_idempotent() {
        let gateway = gateway();

        let id = gateway.submit("device-42").await.unwrap();
        gateway.wait(id, Duration::from_secs(5)).await.unwrap();

        let first = gateway.status(id).await.unwrap();
        let second = gateway.status(id).await.unwrap();

        assert_eq!(first.status, "SUCCESS");
        assert_eq!(first.result.as_deref(), Some("Task completed for device-42"));
        assert!(first.error.is_none());
        assert_eq!(second.status, first.status);
        assert_eq!(second.result, first.result);
    }

    #[tokio::test]
    async fn test_rejected_submit_does_not_leak_a_record() {
        let registry = TaskRegistry::new();
        let gate = Arc::new(Notify::new());
        let pool = ExecutorPool::start(
            PoolConfig {
                workers: 1,
                queue_capacity: 1,
                admission: AdmissionPolicy::Reject,
                ..Default::default()
            },
            registry.clone(),
            Arc::new(GatedWork {
                gate: Arc::clone(&gate),
            }),
        );
        let gateway = SubmissionGateway::new(registry.clone(), Arc::new(pool));

        // Occupy the single worker, then wait until it is actually running
        let busy = gateway.submit("device-0").await.unwrap();
        loop {
            if registry.get(busy).await.unwrap().state.is_running() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        // Fill the single queue slot behind it
        gateway.submit("device-1").await.unwrap();

        // The rejected submission must not grow the registry: its id was
        // never returned to the client, so the record would be unreachable
        let before = registry.len().await;
        let err = gateway.submit("device-2").await.unwrap_err();
        assert!(matches!(err, Error::Overloaded(_)));
        assert_eq!(registry.len().await, before);
    }

    #[tokio::test]
    async fn test_input_is_trimmed() {
        let gateway = gateway();

        let id = gateway.submit("  device-42  ").await.unwrap();
        let task = gateway.wait(id, Duration::from_secs(5)).await.unwrap();
        assert_eq!(task.input, "device-42");
        assert_eq!(task.result(), Some("Task completed for device-42"));
    }
}
