//! Init command handler
//!
//! Creates the metadata record that makes a directory a synchronized tree.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use super::{quoted, quoted_path};
use crate::metadata;
use crate::VerbosityLevel;

/// Handle `vector-sync init <ID> [--path DIR]`
pub fn handle_init(tree_id: &str, path: &Path, verbosity: VerbosityLevel) -> Result<()> {
    let record = metadata::init_tree(path, tree_id)
        .with_context(|| format!("Failed to initialize {}", path.display()))?;

    if verbosity != VerbosityLevel::Quiet {
        println!(
            "{}",
            format!("Initialized {} in {}.", quoted(&record.id), quoted_path(path)).green()
        );
    }
    if verbosity == VerbosityLevel::Verbose {
        println!(
            "  {} {}",
            "Metadata:".dimmed(),
            metadata::metadata_path(path).display()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{metadata_path, read_metadata, Metadata};
    use crate::SyncError;
    use tempfile::TempDir;

    #[test]
    fn test_handle_init_creates_record() {
        let temp = TempDir::new().unwrap();
        handle_init("Laptop", temp.path(), VerbosityLevel::Quiet).unwrap();

        let record = read_metadata(&metadata_path(temp.path())).unwrap();
        assert_eq!(record, Metadata::empty("Laptop"));
    }

    #[test]
    fn test_handle_init_twice_fails() {
        let temp = TempDir::new().unwrap();
        handle_init("Laptop", temp.path(), VerbosityLevel::Quiet).unwrap();

        let err = handle_init("Desktop", temp.path(), VerbosityLevel::Quiet).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SyncError>(),
            Some(SyncError::AlreadyInitialized(_))
        ));
        assert_eq!(
            read_metadata(&metadata_path(temp.path())).unwrap().id,
            "Laptop"
        );
    }
}
