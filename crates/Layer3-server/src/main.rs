//! relayd - Relay server entry point

use clap::Parser;
use relay_foundation::{CompletionJournal, JournalConfig, RelayConfig};
use relay_server::{AppState, DeviceWork, ServerConfig};
use relay_task::{ExecutorPool, PoolConfig, SubmissionGateway, TaskRegistry, WorkFn};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Relay - asynchronous task service
#[derive(Parser, Debug)]
#[command(name = "relayd")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Number of executor workers
    #[arg(short, long)]
    workers: Option<usize>,

    /// Bounded task queue capacity
    #[arg(long)]
    queue_capacity: Option<usize>,

    /// Per-task timeout in seconds (0 disables)
    #[arg(long)]
    task_timeout: Option<u64>,

    /// Completion journal path
    #[arg(long)]
    journal: Option<PathBuf>,

    /// Simulated device work delay in milliseconds
    #[arg(long)]
    work_delay: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    /// Layer CLI flags over the loaded config
    fn apply(&self, config: &mut RelayConfig) {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(capacity) = self.queue_capacity {
            config.queue_capacity = capacity;
        }
        if let Some(secs) = self.task_timeout {
            config.task_timeout_secs = secs;
        }
        if let Some(delay) = self.work_delay {
            config.work_delay_ms = delay;
        }
        if let Some(path) = &self.journal {
            config.journal_path = Some(path.clone());
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // RUST_LOG wins; --debug raises the default level
    let default_filter = if args.debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = RelayConfig::load_or_default(args.config.as_deref())?;
    args.apply(&mut config);

    let journal_config = config
        .journal_path
        .clone()
        .map(|path| JournalConfig { path })
        .unwrap_or_default();
    let journal = Arc::new(CompletionJournal::with_config(journal_config).await?);

    let registry = TaskRegistry::new();
    let work: Arc<dyn WorkFn> = Arc::new(DeviceWork::new(
        journal,
        Duration::from_millis(config.work_delay_ms),
    ));
    let pool = Arc::new(ExecutorPool::start(
        PoolConfig {
            workers: config.workers,
            queue_capacity: config.queue_capacity,
            task_timeout: config.task_timeout(),
            ..Default::default()
        },
        registry.clone(),
        work,
    ));

    let gateway = SubmissionGateway::new(registry, Arc::clone(&pool));
    let state = Arc::new(AppState { gateway });

    relay_server::serve(ServerConfig { port: config.port }, state).await?;

    // Drain the queue before exiting
    pool.shutdown().await;

    Ok(())
}
