//! Relay Config - unified process configuration
//!
//! Defaults cover local development; a JSON file and CLI flags layer on top.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file name
pub const RELAY_CONFIG_FILE: &str = "config.json";

// ============================================================================
// Relay Config
// ============================================================================

/// Relay unified configuration
///
/// Loaded from a JSON file; every field has a default so a partial file
/// (or none at all) is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayConfig {
    /// Version (for migrations)
    #[serde(default = "default_version")]
    pub version: u32,

    /// HTTP listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of executor workers
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Bounded task queue capacity
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Per-task execution timeout in seconds; 0 disables the timeout
    #[serde(default)]
    pub task_timeout_secs: u64,

    /// Simulated device work delay in milliseconds
    #[serde(default = "default_work_delay_ms")]
    pub work_delay_ms: u64,

    /// Completion journal path; platform data dir when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal_path: Option<PathBuf>,
}

fn default_version() -> u32 {
    1
}

fn default_port() -> u16 {
    8080
}

fn default_workers() -> usize {
    4
}

fn default_queue_capacity() -> usize {
    64
}

fn default_work_delay_ms() -> u64 {
    5000
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            port: default_port(),
            workers: default_workers(),
            queue_capacity: default_queue_capacity(),
            task_timeout_secs: 0,
            work_delay_ms: default_work_delay_ms(),
            journal_path: None,
        }
    }
}

impl RelayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Load / Save
    // ========================================================================

    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {e}", path.display())))?;
        serde_json::from_str(&data)
            .map_err(|e| Error::Config(format!("Invalid config {}: {e}", path.display())))
    }

    /// Load from an optional path, falling back to defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Save as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    // ========================================================================
    // Derived values
    // ========================================================================

    /// Per-task timeout as a Duration; None when disabled
    pub fn task_timeout(&self) -> Option<Duration> {
        (self.task_timeout_secs > 0).then(|| Duration::from_secs(self.task_timeout_secs))
    }
}
