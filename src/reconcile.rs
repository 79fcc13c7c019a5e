use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{Result, SyncError};
use crate::hashing::FileHashes;

/// File operations that turn one tree's content into another's.
///
/// Paths are tree-relative and kept sorted so summaries are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeChange {
    /// Present in the target only.
    pub add: BTreeSet<String>,
    /// Present in the current tree only.
    pub delete: BTreeSet<String>,
    /// Present in both with different content.
    pub overwrite: BTreeSet<String>,
}

impl TreeChange {
    /// The change that makes a tree holding `current` hold `target`.
    pub fn between(current: &FileHashes, target: &FileHashes) -> Self {
        let add = target
            .keys()
            .filter(|p| !current.contains_key(*p))
            .cloned()
            .collect();
        let delete = current
            .keys()
            .filter(|p| !target.contains_key(*p))
            .cloned()
            .collect();
        let overwrite = current
            .iter()
            .filter(|(p, hash)| target.get(*p).is_some_and(|h| h != *hash))
            .map(|(p, _)| p.clone())
            .collect();

        TreeChange {
            add,
            delete,
            overwrite,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.delete.is_empty() && self.overwrite.is_empty()
    }

    /// Total number of file operations.
    pub fn len(&self) -> usize {
        self.add.len() + self.delete.len() + self.overwrite.len()
    }

    /// Human-readable listing of the change, one quoted path per line.
    ///
    /// Empty sections are left out; an empty change gives an empty string.
    pub fn summary(&self) -> String {
        [
            ("Add", '+', &self.add),
            ("Delete", '-', &self.delete),
            ("Overwrite", '≠', &self.overwrite),
        ]
        .into_iter()
        .filter(|(_, _, paths)| !paths.is_empty())
        .map(|(title, mark, paths)| {
            let mut section = format!("• {title}:");
            for path in paths {
                section.push('\n');
                section.push(mark);
                section.push(' ');
                section.push_str(&Value::String(path.clone()).to_string());
            }
            section
        })
        .collect::<Vec<_>>()
        .join("\n\n")
    }

    /// Apply the change to the tree at `dest_root`, reading new content from
    /// the tree at `src_root`.
    ///
    /// All deletions run before any copy, so a file in `dest_root` that the
    /// source replaced by a directory (or the reverse) is out of the way first.
    /// Operations are not atomic as a whole; an interrupted run is repaired by
    /// syncing again.
    ///
    /// Nothing is touched if any destination path leads through a symlinked
    /// directory, since the operation would land outside `dest_root`.
    pub fn apply(&self, src_root: &Path, dest_root: &Path) -> Result<()> {
        for path in self.delete.iter().chain(&self.add).chain(&self.overwrite) {
            ensure_within(dest_root, path)?;
        }

        for path in &self.delete {
            log::debug!("Deleting {path}");
            delete_up(dest_root, path)?;
        }
        for path in self.add.iter().chain(&self.overwrite) {
            log::debug!("Copying {path}");
            copy_down(&src_root.join(path), &dest_root.join(path))?;
        }

        log::info!(
            "Applied {} additions, {} deletions, {} overwrites to {}",
            self.add.len(),
            self.delete.len(),
            self.overwrite.len(),
            dest_root.display()
        );
        Ok(())
    }
}

/// Fail with [`SyncError::Structure`] if a directory on the way from `root`
/// to `root/relative` is a symlink.
pub fn ensure_within(root: &Path, relative: &str) -> Result<()> {
    let relative = Path::new(relative);
    for dir in relative.ancestors().skip(1) {
        if dir.as_os_str().is_empty() {
            break;
        }
        match fs::symlink_metadata(root.join(dir)) {
            Ok(meta) if meta.file_type().is_symlink() => {
                return Err(SyncError::Structure(format!(
                    "symlinked directory in tree path: {:?}",
                    root.join(dir)
                )));
            }
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Delete the file at `root/relative`, then remove its ancestors that became
/// empty, stopping below `root`.
pub fn delete_up(root: &Path, relative: &str) -> Result<()> {
    ensure_within(root, relative)?;
    let relative = Path::new(relative);
    fs::remove_file(root.join(relative))?;

    for dir in relative.ancestors().skip(1) {
        if dir.as_os_str().is_empty() {
            break;
        }
        let dir = root.join(dir);
        if fs::read_dir(&dir)?.next().is_some() {
            break;
        }
        fs::remove_dir(&dir)?;
    }
    Ok(())
}

/// Copy `src` to `dest`, creating `dest`'s missing parent directories and
/// replacing any existing file. A symlink at `dest` is replaced itself, not
/// written through.
pub fn copy_down(src: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    if fs::symlink_metadata(dest).is_ok_and(|meta| meta.file_type().is_symlink()) {
        fs::remove_file(dest)?;
    }
    fs::copy(src, dest)?;
    Ok(())
}
