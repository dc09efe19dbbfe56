//! Task state machine

use crate::task::TaskOutcome;
use relay_foundation::{Error, Result};
use serde::{Deserialize, Serialize};

/// Possible states of a task
///
/// The terminal variants carry their payload so a record can never hold a
/// torn state/result pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TaskState {
    /// Task is waiting to be executed
    Pending,

    /// Task is currently running on a worker
    Running,

    /// Task completed successfully
    Succeeded(TaskOutcome),

    /// Task failed: work function errored, panicked, or timed out
    Failed(String),
}

/// A requested state change, applied only through the registry
#[derive(Debug, Clone)]
pub enum Transition {
    /// Worker picked up the task
    Start,

    /// Work function returned normally
    Succeed(TaskOutcome),

    /// Work function errored, panicked, or timed out
    Fail(String),
}

impl Transition {
    /// Display name of the state this transition targets
    pub fn target_name(&self) -> &'static str {
        match self {
            Transition::Start => "Running",
            Transition::Succeed(_) => "Succeeded",
            Transition::Fail(_) => "Failed",
        }
    }
}

impl TaskState {
    /// Check if this is a terminal state (cannot transition further)
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Succeeded(_) | TaskState::Failed(_))
    }

    /// Check if task is currently running
    pub fn is_running(&self) -> bool {
        matches!(self, TaskState::Running)
    }

    /// Check if task is pending (not yet started)
    pub fn is_pending(&self) -> bool {
        matches!(self, TaskState::Pending)
    }

    /// Check if task completed successfully
    pub fn is_success(&self) -> bool {
        matches!(self, TaskState::Succeeded(_))
    }

    /// Get display name for the state
    pub fn display_name(&self) -> &'static str {
        match self {
            TaskState::Pending => "Pending",
            TaskState::Running => "Running",
            TaskState::Succeeded(_) => "Succeeded",
            TaskState::Failed(_) => "Failed",
        }
    }

    /// Wire name used by the HTTP status surface
    pub fn wire_name(&self) -> &'static str {
        match self {
            TaskState::Pending => "PENDING",
            TaskState::Running => "RUNNING",
            TaskState::Succeeded(_) => "SUCCESS",
            TaskState::Failed(_) => "FAILURE",
        }
    }

    /// Check a requested transition against the monotonic lifecycle
    ///
    /// Only `Pending -> Running -> {Succeeded | Failed}` is permitted; in
    /// particular a pending task can never jump straight to a terminal state.
    pub fn validate(&self, transition: &Transition) -> Result<()> {
        let permitted = matches!(
            (self, transition),
            (TaskState::Pending, Transition::Start)
                | (TaskState::Running, Transition::Succeed(_))
                | (TaskState::Running, Transition::Fail(_))
        );

        if permitted {
            Ok(())
        } else {
            Err(Error::invalid_transition(
                self.display_name(),
                transition.target_name(),
            ))
        }
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
