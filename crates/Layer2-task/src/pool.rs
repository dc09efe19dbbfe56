//! Executor Pool - bounded worker set draining the task queue
//!
//! A fixed number of worker loops pull jobs from a shared bounded channel
//! and run them to a terminal state. Failures of any kind (work error,
//! panic, timeout) are recorded on the task record and never take a worker
//! down with them.

use crate::registry::TaskRegistry;
use crate::state::Transition;
use crate::task::TaskId;
use crate::work::WorkFn;
use futures::future::join_all;
use relay_foundation::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Admission policy applied when the queue is full
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdmissionPolicy {
    /// Block the submitter until a slot frees up
    #[default]
    Block,

    /// Refuse admission with an Overloaded error
    Reject,
}

/// Configuration for the executor pool
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of worker loops
    pub workers: usize,

    /// Bounded queue capacity
    pub queue_capacity: usize,

    /// Per-task execution timeout; None disables it
    pub task_timeout: Option<Duration>,

    /// Behavior when the queue is full
    pub admission: AdmissionPolicy,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_capacity: 64,
            task_timeout: None,
            admission: AdmissionPolicy::Block,
        }
    }
}

/// One queued unit of work
#[derive(Debug)]
struct Job {
    id: TaskId,
    input: String,
}

/// Executor pool
pub struct ExecutorPool {
    /// Queue sender; taken on shutdown so the workers see the channel close
    tx: Mutex<Option<mpsc::Sender<Job>>>,

    /// Worker join handles, drained on shutdown
    handles: Mutex<Vec<JoinHandle<()>>>,

    /// Configuration
    config: PoolConfig,
}

impl ExecutorPool {
    /// Start the pool with `config.workers` worker loops
    pub fn start(config: PoolConfig, registry: TaskRegistry, work: Arc<dyn WorkFn>) -> Self {
        let workers = config.workers.max(1);
        let (tx, rx) = mpsc::channel::<Job>(config.queue_capacity.max(1));
        let rx = Arc::new(Mutex::new(rx));

        let mut handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let rx = Arc::clone(&rx);
            let registry = registry.clone();
            let work = Arc::clone(&work);
            let timeout = config.task_timeout;

            handles.push(tokio::spawn(async move {
                worker_loop(worker_id, rx, registry, work, timeout).await;
            }));
        }

        info!(
            workers,
            capacity = config.queue_capacity,
            work = work.name(),
            "Executor pool started"
        );

        Self {
            tx: Mutex::new(Some(tx)),
            handles: Mutex::new(handles),
            config,
        }
    }

    /// Hand a task to the pool
    ///
    /// Never blocks the caller beyond queue admission: with
    /// `AdmissionPolicy::Block` this waits for a slot on a full queue, with
    /// `AdmissionPolicy::Reject` a full queue returns `Overloaded`.
    pub async fn enqueue(&self, id: TaskId, input: impl Into<String>) -> Result<()> {
        let tx = self.tx.lock().await.clone();
        let Some(tx) = tx else {
            return Err(Error::Internal("Executor pool is shut down".into()));
        };

        let job = Job {
            id,
            input: input.into(),
        };

        match self.config.admission {
            AdmissionPolicy::Block => tx
                .send(job)
                .await
                .map_err(|_| Error::Internal("Executor pool is shut down".into())),
            AdmissionPolicy::Reject => tx.try_send(job).map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => Error::Overloaded(format!(
                    "Task queue is full ({} slots)",
                    self.config.queue_capacity
                )),
                mpsc::error::TrySendError::Closed(_) => {
                    Error::Internal("Executor pool is shut down".into())
                }
            }),
        }
    }

    /// Number of worker loops
    pub fn worker_count(&self) -> usize {
        self.config.workers.max(1)
    }

    /// Bounded queue capacity
    pub fn queue_capacity(&self) -> usize {
        self.config.queue_capacity.max(1)
    }

    /// Close the queue and wait for the workers to drain it
    pub async fn shutdown(&self) {
        let tx = self.tx.lock().await.take();
        drop(tx);

        let handles: Vec<_> = self.handles.lock().await.drain(..).collect();
        join_all(handles).await;
        info!("Executor pool stopped");
    }
}

/// Worker loop: pull one job at a time and run it to a terminal state
///
/// The receiver lock is held only while waiting for the next job, so one
/// worker's execution never serializes the others.
async fn worker_loop(
    worker_id: usize,
    rx: Arc<Mutex<mpsc::Receiver<Job>>>,
    registry: TaskRegistry,
    work: Arc<dyn WorkFn>,
    timeout: Option<Duration>,
) {
    loop {
        let job = {
            let mut rx = rx.lock().await;
            rx.recv().await
        };

        let Some(job) = job else {
            debug!(worker_id, "Queue closed, worker exiting");
            break;
        };

        run_job(worker_id, &registry, &work, job, timeout).await;
    }
}

/// Run one job to a terminal state
///
/// Failures are recorded on the task record, never propagated: a bad task
/// must not stall the pool.
async fn run_job(
    worker_id: usize,
    registry: &TaskRegistry,
    work: &Arc<dyn WorkFn>,
    job: Job,
    timeout: Option<Duration>,
) {
    let Job { id, input } = job;

    if let Err(e) = registry.update(id, Transition::Start).await {
        warn!(worker_id, %id, error = %e, "Skipping job that cannot start");
        return;
    }

    debug!(worker_id, %id, work = work.name(), "Executing task");

    // Run inside a spawned task so a panicking work function surfaces as a
    // JoinError instead of unwinding through the worker loop.
    let work = Arc::clone(work);
    let handle = tokio::spawn(async move { work.execute(&input).await });
    let abort = handle.abort_handle();

    let joined = match timeout {
        Some(limit) => match tokio::time::timeout(limit, handle).await {
            Ok(joined) => joined,
            Err(_) => {
                // The work future is cancelled at its next await point; the
                // record must not stay Running regardless.
                abort.abort();
                warn!(worker_id, %id, ?limit, "Task timed out");
                let err = Error::Timeout(format!("Task exceeded {limit:?}"));
                record(registry, id, Transition::Fail(err.to_string())).await;
                return;
            }
        },
        None => handle.await,
    };

    let transition = match joined {
        Ok(Ok(outcome)) => Transition::Succeed(outcome),
        Ok(Err(e)) => {
            warn!(worker_id, %id, error = %e, "Task failed");
            Transition::Fail(e.to_string())
        }
        Err(join_err) if join_err.is_panic() => {
            warn!(worker_id, %id, "Work function panicked");
            Transition::Fail(format!("Work function panicked: {join_err}"))
        }
        Err(join_err) => Transition::Fail(format!("Work function aborted: {join_err}")),
    };

    record(registry, id, transition).await;
}

/// Apply a terminal transition, logging instead of failing the worker
async fn record(registry: &TaskRegistry, id: TaskId, transition: Transition) {
    if let Err(e) = registry.update(id, transition).await {
        warn!(%id, error = %e, "Could not record task outcome");
    }
}
