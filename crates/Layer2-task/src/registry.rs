//! Task Registry - owns the id -> record mapping

use crate::state::{TaskState, Transition};
use crate::task::{Task, TaskId};
use relay_foundation::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// Thread-safe store of task records
///
/// The record map is the only shared mutable state in the system. All
/// mutation goes through [`TaskRegistry::update`], which validates the
/// transition before applying it; readers get cloned snapshots, so a
/// concurrent `get` never observes a partially written record. Terminal
/// records are kept for the life of the process (no eviction).
#[derive(Clone, Default)]
pub struct TaskRegistry {
    /// All tasks by ID
    tasks: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl TaskRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new pending record and return its fresh id
    ///
    /// Safe under concurrent calls: ids are random v4 UUIDs and the insert
    /// happens under the write lock.
    pub async fn create(&self, input: impl Into<String>) -> TaskId {
        let task = Task::new(input);
        let id = task.id;

        let mut tasks = self.tasks.write().await;
        tasks.insert(id, task);
        debug!(%id, "Task record created");

        id
    }

    /// Get a snapshot of one record
    pub async fn get(&self, id: TaskId) -> Option<Task> {
        let tasks = self.tasks.read().await;
        tasks.get(&id).cloned()
    }

    /// Apply a state transition and return the updated record
    ///
    /// Fails with `NotFound` for an unknown id and `InvalidTransition` when
    /// the state machine forbids the step. Applied only by the executor pool.
    pub async fn update(&self, id: TaskId, transition: Transition) -> Result<Task> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("Task {id} not found")))?;

        task.state.validate(&transition)?;

        match transition {
            Transition::Start => task.start(),
            Transition::Succeed(outcome) => task.succeed(outcome),
            Transition::Fail(reason) => task.fail(reason),
        }

        debug!(%id, state = %task.state, "Task transitioned");
        Ok(task.clone())
    }

    /// Remove a record, returning it
    ///
    /// Used by the gateway when queue admission fails after creation: the
    /// client never learned the id, so the record must not linger as an
    /// unreachable Pending entry.
    pub(crate) async fn remove(&self, id: TaskId) -> Option<Task> {
        let mut tasks = self.tasks.write().await;
        let removed = tasks.remove(&id);
        if removed.is_some() {
            debug!(%id, "Task record removed");
        }
        removed
    }

    /// Number of records in the registry
    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    /// Check if the registry holds no records
    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }

    /// Per-state record counts
    pub async fn stats(&self) -> RegistryStats {
        let tasks = self.tasks.read().await;
        let mut stats = RegistryStats {
            total: tasks.len(),
            ..Default::default()
        };

        for task in tasks.values() {
            match &task.state {
                TaskState::Pending => stats.pending += 1,
                TaskState::Running => stats.running += 1,
                TaskState::Succeeded(_) => stats.succeeded += 1,
                TaskState::Failed(_) => stats.failed += 1,
            }
        }

        stats
    }

    /// Wait until the task reaches a terminal state
    ///
    /// Polls the record; returns None for an unknown id or when the timeout
    /// expires first.
    pub async fn wait_terminal(&self, id: TaskId, timeout: Duration) -> Option<Task> {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            let task = self.get(id).await?;
            if task.state.is_terminal() {
                return Some(task);
            }
            if tokio::time::Instant::now() >= deadline {
                return None;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

/// Registry statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Total records
    pub total: usize,
    /// Pending tasks
    pub pending: usize,
    /// Running tasks
    pub running: usize,
    /// Succeeded tasks
    pub succeeded: usize,
    /// Failed tasks
    pub failed: usize,
}
