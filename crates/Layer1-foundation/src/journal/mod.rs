//! Completion Journal - append-only record of finished work
//!
//! One line per completed task. The journal is a side-effect sink for work
//! functions; it is not consulted by the registry and carries no durability
//! guarantees for task state.

use crate::Result;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

// ============================================================================
// CompletionJournal
// ============================================================================

/// Journal configuration
#[derive(Debug, Clone)]
pub struct JournalConfig {
    /// Journal file path
    pub path: PathBuf,
}

impl Default for JournalConfig {
    fn default() -> Self {
        let path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("relay")
            .join("task.log");

        Self { path }
    }
}

/// Append-only completion journal
///
/// ## Usage
///
/// ```ignore
/// use relay_foundation::CompletionJournal;
///
/// let journal = CompletionJournal::new().await?;
/// journal.append("device-42").await?;
/// ```
pub struct CompletionJournal {
    /// Open file handle, append mode
    file: Mutex<File>,

    /// Resolved journal path
    path: PathBuf,
}

impl CompletionJournal {
    /// Open the journal at the default location
    pub async fn new() -> Result<Self> {
        Self::with_config(JournalConfig::default()).await
    }

    /// Open the journal with a custom configuration
    pub async fn with_config(config: JournalConfig) -> Result<Self> {
        if let Some(parent) = config.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.path)
            .await?;

        info!(path = %config.path.display(), "Completion journal opened");

        Ok(Self {
            file: Mutex::new(file),
            path: config.path,
        })
    }

    /// Journal file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one completion line for the given token
    pub async fn append(&self, token: &str) -> Result<()> {
        let line = format!("Task completed for {} at {}\n", token, Utc::now().to_rfc2822());

        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        debug!(token, "Journal entry appended");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_writes_one_line_per_token() {
        let dir = tempfile::tempdir().unwrap();
        let config = JournalConfig {
            path: dir.path().join("task.log"),
        };

        let journal = CompletionJournal::with_config(config).await.unwrap();
        journal.append("device-1").await.unwrap();
        journal.append("device-2").await.unwrap();

        let contents = tokio::fs::read_to_string(journal.path()).await.unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.contains("Task completed for device-1 at "));
        assert!(contents.contains("Task completed for device-2 at "));
    }

    #[tokio::test]
    async fn test_creates_missing_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let config = JournalConfig {
            path: dir.path().join("nested").join("deeper").join("task.log"),
        };

        let journal = CompletionJournal::with_config(config).await.unwrap();
        journal.append("device-3").await.unwrap();

        assert!(journal.path().exists());
    }

    #[tokio::test]
    async fn test_reopen_appends_instead_of_truncating() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("task.log");

        {
            let journal = CompletionJournal::with_config(JournalConfig { path: path.clone() })
                .await
                .unwrap();
            journal.append("device-4").await.unwrap();
        }

        let journal = CompletionJournal::with_config(JournalConfig { path: path.clone() })
            .await
            .unwrap();
        journal.append("device-5").await.unwrap();

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(contents.lines().count(), 2);
    }
}
