//! # relay-task
//!
//! Task lifecycle core for Relay.
//! Handles the task registry, queuing, and execution through a bounded
//! worker pool.
//!
//! ## Features
//!
//! - Task records with a monotonic Pending -> Running -> terminal lifecycle
//! - Registry with per-record atomicity and read-after-write consistency
//! - Bounded executor pool with backpressure and per-task failure isolation
//! - Pluggable work functions
//! - Non-blocking submission gateway and status query

pub mod gateway;
pub mod pool;
pub mod registry;
pub mod state;
pub mod task;
pub mod work;

// Task system
pub use gateway::{SubmissionGateway, TaskStatusView};
pub use pool::{AdmissionPolicy, ExecutorPool, PoolConfig};
pub use registry::{RegistryStats, TaskRegistry};
pub use state::{TaskState, Transition};
pub use task::{Task, TaskId, TaskOutcome};
pub use work::WorkFn;
