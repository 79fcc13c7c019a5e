use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::hashing::FileHashes;
use crate::metadata::{metadata_path, read_metadata};
use crate::reconcile::TreeChange;
use crate::scanner::scan_tree;
use crate::version_vector::VersionVector;

/// A tree's recorded state next to what is on disk right now.
///
/// Built fresh for every sync and never persisted. `pre_vv` and
/// `known_hashes` mirror the metadata record; `disk_hashes` is a live scan;
/// `post_vv` is the vector the tree will carry once its current content is
/// recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeStatus {
    pub path: PathBuf,
    pub id: String,
    pub pre_vv: VersionVector,
    pub known_hashes: FileHashes,
    pub disk_hashes: FileHashes,
    pub post_vv: VersionVector,
}

impl TreeStatus {
    /// Read the metadata of the tree at `path` and scan its content.
    ///
    /// Any difference between the recorded and the scanned hashes, however
    /// many files it touches, advances the tree's own counter by exactly one.
    pub fn read(path: &Path) -> Result<Self> {
        let metadata = read_metadata(&metadata_path(path))?;
        let disk_hashes = scan_tree(path)?;
        Ok(Self::from_parts(
            path.to_path_buf(),
            metadata.id,
            metadata.version_vector,
            metadata.file_hashes,
            disk_hashes,
        ))
    }

    pub(crate) fn from_parts(
        path: PathBuf,
        id: String,
        pre_vv: VersionVector,
        known_hashes: FileHashes,
        disk_hashes: FileHashes,
    ) -> Self {
        let post_vv = if disk_hashes == known_hashes {
            pre_vv.clone()
        } else {
            pre_vv.advance(&id)
        };
        log::debug!("Tree {:?}: recorded {} projected {}", id, pre_vv, post_vv);

        TreeStatus {
            path,
            id,
            pre_vv,
            known_hashes,
            disk_hashes,
            post_vv,
        }
    }

    /// Whether the tree's content changed since it was last recorded.
    pub fn is_modified(&self) -> bool {
        self.disk_hashes != self.known_hashes
    }

    /// What changed on disk since the last recorded state.
    pub fn pending_change(&self) -> TreeChange {
        TreeChange::between(&self.known_hashes, &self.disk_hashes)
    }
}
