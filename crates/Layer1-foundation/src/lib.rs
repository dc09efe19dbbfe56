//! # relay-foundation
//!
//! Foundation layer for Relay:
//! - Error: central error type and `Result` alias
//! - Config: unified process settings (RelayConfig)
//! - Journal: append-only completion log sink

pub mod config;
pub mod error;
pub mod journal;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Config
// ============================================================================
pub use config::{RelayConfig, RELAY_CONFIG_FILE};

// ============================================================================
// Journal
// ============================================================================
pub use journal::{CompletionJournal, JournalConfig};
