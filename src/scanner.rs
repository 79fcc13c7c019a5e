use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Result, SyncError};
use crate::hashing::{hash_file, FileHashes};
use crate::metadata::META_FILE;

/// Hash every file under `root`.
///
/// Returns a map from `/`-separated root-relative paths to content digests.
/// The walk is iterative and yields a directory only after its contents, so
/// a directory that produced no files is known to be empty when it is seen.
///
/// # Errors
///
/// - [`SyncError::Structure`] if [`META_FILE`] appears anywhere other than as
///   a regular file directly under `root`, if a directory below `root` holds
///   no files, or if a path is not valid UTF-8
/// - [`SyncError::Io`] if `root` is missing or not a directory, or a file
///   cannot be read
pub fn scan_tree(root: &Path) -> Result<FileHashes> {
    if !fs::metadata(root)?.is_dir() {
        return Err(SyncError::Io(io::Error::other(format!(
            "not a directory: {}",
            root.display()
        ))));
    }

    let mut hashes = FileHashes::new();
    let mut populated: HashSet<PathBuf> = HashSet::new();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .contents_first(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(io::Error::from)?;
        if entry.depth() == 0 {
            continue;
        }

        let relative = entry.path().strip_prefix(root).map_err(|_| {
            SyncError::Structure(format!("path outside tree: {:?}", entry.path()))
        })?;

        if let Some(pos) = relative.components().position(|c| c.as_os_str() == META_FILE) {
            let is_root_record = pos == 0 && entry.depth() == 1 && entry.file_type().is_file();
            if is_root_record {
                continue;
            }
            let item: PathBuf = relative.components().take(pos + 1).collect();
            return Err(SyncError::Structure(format!(
                "forbidden tree item: {:?}",
                root.join(item)
            )));
        }

        let file_type = entry.file_type();
        if file_type.is_file() {
            let key = tree_key(relative)
                .ok_or_else(|| SyncError::Structure(format!("non-UTF-8 path: {:?}", entry.path())))?;
            hashes.insert(key, hash_file(entry.path())?);
            populated.extend(relative.ancestors().skip(1).map(Path::to_path_buf));
        } else if file_type.is_dir() && !populated.contains(relative) {
            return Err(SyncError::Structure(format!(
                "forbidden empty directory: {:?}",
                entry.path()
            )));
        }
    }

    log::debug!("Scanned {} files under {}", hashes.len(), root.display());
    Ok(hashes)
}

/// `/`-joined normal components of `relative`, or `None` if any is not UTF-8.
fn tree_key(relative: &Path) -> Option<String> {
    let parts = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_str()),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}
