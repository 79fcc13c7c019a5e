//! Command handler modules
//!
//! This module contains the handler behind each `vector-sync` subcommand,
//! organized by command.

pub mod config;
pub mod init;
pub mod status;
pub mod sync;

// Re-export all public handler functions for convenient use
pub use config::handle_config;
pub use init::handle_init;
pub use status::handle_status;
pub use sync::{handle_sync, SyncOptions};

use serde_json::Value;
use std::path::Path;

/// Quote a string the way the change summary quotes paths
pub(crate) fn quoted(text: &str) -> String {
    Value::String(text.to_string()).to_string()
}

pub(crate) fn quoted_path(path: &Path) -> String {
    quoted(&path.to_string_lossy())
}
