//! Task definition and types

use crate::state::TaskState;
use chrono::{DateTime, Utc};
use relay_foundation::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

/// Unique identifier for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub Uuid);

impl TaskId {
    /// Generate a new random TaskId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    /// Full hyphenated form; the id travels over the wire and must round-trip
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| Error::Validation(format!("Malformed task id: {s}")))
    }
}

/// A unit of asynchronous work
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier
    pub id: TaskId,

    /// Client-supplied token; immutable after creation
    pub input: String,

    /// Current state
    pub state: TaskState,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task started executing
    pub started_at: Option<DateTime<Utc>>,

    /// When the task completed
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a new pending task
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(),
            input: input.into(),
            state: TaskState::Pending,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    /// Mark task as running
    pub(crate) fn start(&mut self) {
        self.state = TaskState::Running;
        self.started_at = Some(Utc::now());
    }

    /// Mark task as completed successfully
    pub(crate) fn succeed(&mut self, outcome: TaskOutcome) {
        self.state = TaskState::Succeeded(outcome);
        self.completed_at = Some(Utc::now());
    }

    /// Mark task as failed
    pub(crate) fn fail(&mut self, error: impl Into<String>) {
        self.state = TaskState::Failed(error.into());
        self.completed_at = Some(Utc::now());
    }

    /// Check if task is still active (pending or running)
    pub fn is_active(&self) -> bool {
        matches!(self.state, TaskState::Pending | TaskState::Running)
    }

    /// Result text, present only for succeeded tasks
    pub fn result(&self) -> Option<&str> {
        match &self.state {
            TaskState::Succeeded(outcome) => Some(&outcome.output),
            _ => None,
        }
    }

    /// Failure description, present only for failed tasks
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            TaskState::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// Get execution duration if task has started
    pub fn duration(&self) -> Option<Duration> {
        let start = self.started_at?;
        let end = self.completed_at.unwrap_or_else(Utc::now);
        Some((end - start).to_std().unwrap_or_default())
    }
}

/// Result of task execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOutcome {
    /// Output content
    pub output: String,

    /// Additional metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl TaskOutcome {
    /// Create an outcome from output text
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            metadata: None,
        }
    }

    /// Add metadata to the outcome
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}
