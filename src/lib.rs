//! # vector-sync
//!
//! A command-line tool for synchronizing two copies of a directory tree using
//! version vectors.
//!
//! ## Overview
//!
//! Every synchronized tree carries a small JSON record, `.vector-sync`, at its
//! root. The record names the tree, holds its version vector and remembers
//! the SHA-512 hash of every file as of the last sync. Comparing the record
//! with a fresh scan tells whether the tree changed locally; comparing the
//! vectors of two trees tells whether one is strictly older than the other.
//!
//! ## Key Features
//!
//! - **Fast-forward**: An older tree is overwritten with the newer tree's files
//! - **Metadata merge**: Trees with identical content simply merge their vectors
//! - **Divergence detection**: Concurrent changes are refused, never merged
//! - **Confirmation**: Every file change is shown and confirmed before it happens
//! - **Cross-platform**: Settings and logs live in platform-specific config directories
//!
//! ## Architecture
//!
//! - Causality tracking ([`version_vector`])
//! - Tree content ([`hashing`], [`scanner`], [`metadata`])
//! - File reconciliation ([`reconcile`], [`confirm`])
//! - Core synchronization logic ([`sync`])
//! - Configuration and logging ([`config`], [`settings`], [`logger`])
//! - Command-line handlers ([`handlers`])

/// Platform-agnostic configuration directory management for vector-sync.
///
/// Provides utilities for locating the settings and log files following
/// platform conventions (XDG on Linux, Application Support on macOS,
/// AppData on Windows).
pub mod config;

/// Operator confirmation before files are changed.
///
/// Defines the [`confirm::ConfirmationGate`] seam used by the sync engine,
/// with a terminal prompt and an always-yes implementation.
pub mod confirm;

/// Error types shared by the library.
pub mod error;

/// Command handlers behind the `vector-sync` binary.
///
/// Each handler prints its own colored output and returns `anyhow::Result`.
pub mod handlers;

/// SHA-512 content hashing for files.
pub mod hashing;

/// Logging configuration and utilities.
///
/// Sets up console logging (configurable via the `RUST_LOG` environment
/// variable) and an optional log file in the config directory, with
/// rotation when it grows too large.
pub mod logger;

/// The `.vector-sync` record stored at the root of every tree.
///
/// Reads, validates and atomically writes the record, and initializes new
/// trees.
pub mod metadata;

/// Computing and applying the file changes that turn one tree into another.
pub mod reconcile;

/// Recursive tree scanning with structural checks.
pub mod scanner;

/// User settings persisted as TOML.
pub mod settings;

/// Core synchronization logic.
///
/// Reads both trees, classifies their relationship as in sync, mergeable,
/// fast-forwardable or diverged, and carries out the matching action.
pub mod sync;

/// Version vectors and their partial order.
pub mod version_vector;

pub use error::{Result, SyncError};

/// How much the CLI prints about what it does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbosityLevel {
    Quiet,   // Errors only
    Normal,  // Standard output
    Verbose, // Detailed output
}

impl VerbosityLevel {
    /// Resolve the `--verbose` and `--quiet` flags; verbose wins
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if verbose {
            VerbosityLevel::Verbose
        } else if quiet {
            VerbosityLevel::Quiet
        } else {
            VerbosityLevel::Normal
        }
    }
}
