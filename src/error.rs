use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by the tree synchronization core.
///
/// None of these are retried internally. Every variant except `Io` and
/// `Prompt` is raised before any file or metadata is touched, or after the
/// branch that raised it has committed nothing.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Malformed metadata, version vector or file hash map.
    #[error("invalid metadata: {0}")]
    Validation(String),

    /// Forbidden metadata placement or an empty nested directory.
    #[error("{0}")]
    Structure(String),

    /// Both trees carry the same id.
    #[error("both trees have the id {0:?}; tree ids must be unique")]
    IdentityConflict(String),

    /// Both trees changed since their last common state.
    #[error(
        "trees {a:?} and {b:?} have diverged; make their contents identical by hand, then sync again"
    )]
    Divergence { a: String, b: String },

    /// The operator declined the proposed overwrite.
    #[error("canceled by the user; {tree_id:?} was not changed")]
    Cancelled { tree_id: String },

    /// `init` found an existing metadata record.
    #[error("already initialized: {0}")]
    AlreadyInitialized(PathBuf),

    /// The confirmation prompt itself failed.
    #[error("confirmation prompt failed: {0}")]
    Prompt(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SyncError>;
