use std::path::Path;

use crate::confirm::ConfirmationGate;
use crate::error::{Result, SyncError};
use crate::hashing::FileHashes;
use crate::metadata::{metadata_path, write_metadata, Metadata};
use crate::reconcile::TreeChange;
use crate::version_vector::VersionVector;

use super::status::TreeStatus;

/// What a sync between two trees will do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncPlan<'a> {
    /// Content and metadata already agree.
    InSync,
    /// Content agrees; both records get `version_vector`.
    Merge { version_vector: VersionVector },
    /// `to` is causally older than `from` and is overwritten with its content.
    FastForward {
        from: &'a TreeStatus,
        to: &'a TreeStatus,
        change: TreeChange,
    },
}

/// What a completed sync did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    AlreadySynced,
    Merged {
        version_vector: VersionVector,
        /// Number of metadata records that actually changed.
        written: usize,
    },
    Updated {
        from: String,
        to: String,
        change: TreeChange,
        version_vector: VersionVector,
    },
}

/// Decide how to bring `a` and `b` together without touching either.
///
/// The first matching rule wins:
/// 1. all vectors and all hash maps equal: nothing to do
/// 2. same content on disk: merge the vectors
/// 3. `a` strictly precedes `b`: overwrite `a` with `b`
/// 4. `b` strictly precedes `a`: overwrite `b` with `a`
/// 5. anything else is a divergence, including equal projected vectors
///    with different content
pub fn classify<'a>(a: &'a TreeStatus, b: &'a TreeStatus) -> Result<SyncPlan<'a>> {
    if a.id == b.id {
        return Err(SyncError::IdentityConflict(a.id.clone()));
    }

    let vectors_agree = a.pre_vv == a.post_vv && a.post_vv == b.pre_vv && b.pre_vv == b.post_vv;
    let hashes_agree = a.known_hashes == a.disk_hashes
        && a.disk_hashes == b.known_hashes
        && b.known_hashes == b.disk_hashes;
    if vectors_agree && hashes_agree {
        return Ok(SyncPlan::InSync);
    }

    if a.disk_hashes == b.disk_hashes {
        return Ok(SyncPlan::Merge {
            version_vector: a.post_vv.join(&b.post_vv),
        });
    }

    let (from, to) = if a.post_vv.precedes(&b.post_vv) {
        (b, a)
    } else if b.post_vv.precedes(&a.post_vv) {
        (a, b)
    } else {
        return Err(SyncError::Divergence {
            a: a.id.clone(),
            b: b.id.clone(),
        });
    };

    Ok(SyncPlan::FastForward {
        from,
        to,
        change: TreeChange::between(&to.disk_hashes, &from.disk_hashes),
    })
}

/// Synchronize the trees rooted at `a` and `b`.
pub fn sync_trees(a: &Path, b: &Path, gate: &mut dyn ConfirmationGate) -> Result<SyncOutcome> {
    let a = TreeStatus::read(a)?;
    let b = TreeStatus::read(b)?;
    sync_statuses(&a, &b, gate)
}

/// Carry out the plan for two already-read tree statuses.
///
/// Metadata is written only after every file operation of the chosen branch
/// has succeeded.
pub fn sync_statuses(
    a: &TreeStatus,
    b: &TreeStatus,
    gate: &mut dyn ConfirmationGate,
) -> Result<SyncOutcome> {
    match classify(a, b)? {
        SyncPlan::InSync => {
            log::info!("{:?} and {:?} are already in sync", a.id, b.id);
            Ok(SyncOutcome::AlreadySynced)
        }
        SyncPlan::Merge { version_vector } => {
            let mut written = 0;
            for status in [a, b] {
                if ensure_metadata(&version_vector, &a.disk_hashes, status)? {
                    written += 1;
                }
            }
            log::info!("Merged metadata of {:?} and {:?} at {}", a.id, b.id, version_vector);
            Ok(SyncOutcome::Merged {
                version_vector,
                written,
            })
        }
        SyncPlan::FastForward { from, to, change } => fast_forward(from, to, change, gate),
    }
}

/// Overwrite `to` with the content of `from`, then record `from`'s state in
/// both trees.
fn fast_forward(
    from: &TreeStatus,
    to: &TreeStatus,
    change: TreeChange,
    gate: &mut dyn ConfirmationGate,
) -> Result<SyncOutcome> {
    if !change.is_empty() {
        if !gate.confirm(&to.id, &change)? {
            return Err(SyncError::Cancelled {
                tree_id: to.id.clone(),
            });
        }
        change.apply(&from.path, &to.path)?;
    }

    ensure_metadata(&from.post_vv, &from.disk_hashes, to)?;
    ensure_metadata(&from.post_vv, &from.disk_hashes, from)?;

    log::info!("Updated {:?} from {:?} at {}", to.id, from.id, from.post_vv);
    Ok(SyncOutcome::Updated {
        from: from.id.clone(),
        to: to.id.clone(),
        change,
        version_vector: from.post_vv.clone(),
    })
}

/// Record `version_vector` and `file_hashes` for the tree of `status`,
/// unless they equal what its metadata already holds.
///
/// Returns whether the record was written.
pub fn ensure_metadata(
    version_vector: &VersionVector,
    file_hashes: &FileHashes,
    status: &TreeStatus,
) -> Result<bool> {
    if *version_vector == status.pre_vv && *file_hashes == status.known_hashes {
        return Ok(false);
    }

    let metadata = Metadata::new(status.id.clone(), version_vector.clone(), file_hashes.clone());
    write_metadata(&metadata, &metadata_path(&status.path))?;
    Ok(true)
}
