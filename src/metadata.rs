//! Per-tree metadata record.
//!
//! Every synchronized tree keeps one record, [`META_FILE`], directly under its
//! root. The record holds the tree's id, its version vector, and the content
//! hashes that were on disk the last time the tree was synchronized. It is
//! stored as pretty-printed JSON with sorted keys so that equal records are
//! byte-identical and diffs stay readable.

use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::{Result, SyncError};
use crate::hashing::FileHashes;
use crate::version_vector::VersionVector;

/// Reserved name of the metadata record inside a tree root.
pub const META_FILE: &str = ".vector-sync";

const FIELDS: [&str; 3] = ["file_hashes", "id", "version_vector"];

/// The persisted state of one tree.
///
/// Fields are declared in alphabetical order; `serde_json` serializes them in
/// declaration order, which keeps the on-disk keys sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub file_hashes: FileHashes,
    pub id: String,
    pub version_vector: VersionVector,
}

impl Metadata {
    pub fn new(id: impl Into<String>, version_vector: VersionVector, file_hashes: FileHashes) -> Self {
        Metadata {
            file_hashes,
            id: id.into(),
            version_vector,
        }
    }

    /// Metadata of a freshly initialized tree.
    pub fn empty(id: impl Into<String>) -> Self {
        Self::new(id, VersionVector::new(), FileHashes::new())
    }

    pub fn validate(&self) -> Result<()> {
        validate_id(&self.id)?;
        for path in self.file_hashes.keys() {
            if !is_tree_path(path) {
                return Err(SyncError::Validation(format!(
                    "file hashes key {path:?} is not a relative tree path"
                )));
            }
        }
        Ok(())
    }

    /// Parse and validate a serialized record.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| SyncError::Validation(format!("metadata is not JSON: {e}")))?;
        let object = value
            .as_object()
            .ok_or_else(|| SyncError::Validation("metadata is not an object".to_string()))?;

        if let Some(extra) = object.keys().find(|k| !FIELDS.contains(&k.as_str())) {
            return Err(SyncError::Validation(format!("unexpected field {extra:?}")));
        }
        let field = |name: &str| {
            object
                .get(name)
                .ok_or_else(|| SyncError::Validation(format!("missing field {name:?}")))
        };

        let id = field("id")?
            .as_str()
            .ok_or_else(|| SyncError::Validation("id is not a string".to_string()))?;
        let version_vector = VersionVector::from_json(field("version_vector")?)?;
        let file_hashes = file_hashes_from_json(field("file_hashes")?)?;

        let metadata = Metadata::new(id, version_vector, file_hashes);
        metadata.validate()?;
        Ok(metadata)
    }

    /// Deterministic serialized form.
    pub fn to_json_string(&self) -> Result<String> {
        self.validate()?;
        serde_json::to_string_pretty(self)
            .map_err(|e| SyncError::Validation(format!("failed to serialize metadata: {e}")))
    }
}

fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(SyncError::Validation("id is empty".to_string()));
    }
    Ok(())
}

fn file_hashes_from_json(value: &Value) -> Result<FileHashes> {
    let object = value
        .as_object()
        .ok_or_else(|| SyncError::Validation("file hashes is not an object".to_string()))?;

    object
        .iter()
        .map(|(path, hash)| {
            hash.as_str()
                .map(|h| (path.clone(), h.to_string()))
                .ok_or_else(|| {
                    SyncError::Validation(format!("file hashes value for {path:?} is not a string"))
                })
        })
        .collect()
}

/// A normalized, `/`-separated path that stays inside the tree and does not
/// touch the metadata record.
fn is_tree_path(path: &str) -> bool {
    !path.is_empty()
        && path
            .split('/')
            .all(|c| !c.is_empty() && c != "." && c != ".." && c != META_FILE)
}

/// Location of the metadata record for the tree rooted at `root`.
pub fn metadata_path(root: &Path) -> PathBuf {
    root.join(META_FILE)
}

/// Validate and write `metadata` to the file at `path`, replacing it.
///
/// The record is written to a temporary file next to `path` and renamed into
/// place, so a reader sees either the old or the new record.
pub fn write_metadata(metadata: &Metadata, path: &Path) -> Result<()> {
    let content = metadata.to_json_string()?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    staged_record(dir, &content)?
        .persist(path)
        .map_err(|e| SyncError::Io(e.error))?;

    log::debug!("Wrote metadata for {:?} to {}", metadata.id, path.display());
    Ok(())
}

/// Fully written and synced temporary file in `dir`, ready to be renamed
/// over the record. It is removed again if dropped unpersisted.
fn staged_record(dir: &Path, content: &str) -> Result<NamedTempFile> {
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()?;
    Ok(temp)
}

/// Read and validate the metadata file at `path`.
pub fn read_metadata(path: &Path) -> Result<Metadata> {
    let content = fs::read_to_string(path)?;
    Metadata::from_json_str(&content)
}

/// Create the metadata record of a new tree at `root`.
///
/// Never overwrites: an existing record is an [`SyncError::AlreadyInitialized`].
/// The record appears complete or not at all.
pub fn init_tree(root: &Path, tree_id: &str) -> Result<Metadata> {
    let metadata = Metadata::empty(tree_id);
    let content = metadata.to_json_string()?;
    let path = metadata_path(root);

    staged_record(root, &content)?
        .persist_noclobber(&path)
        .map_err(|e| match e.error.kind() {
            ErrorKind::AlreadyExists => SyncError::AlreadyInitialized(path.clone()),
            _ => SyncError::Io(e.error),
        })?;

    log::info!("Initialized tree {:?} at {}", tree_id, root.display());
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn hashes(pairs: &[(&str, &str)]) -> FileHashes {
        pairs
            .iter()
            .map(|(p, h)| (p.to_string(), h.to_string()))
            .collect()
    }

    #[test]
    fn test_write_is_sorted_and_deterministic() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("some-file");

        let md1 = Metadata::new("A", [("USB", 3)].into_iter().collect(), FileHashes::new());
        write_metadata(&md1, &path).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "{\n  \"file_hashes\": {},\n  \"id\": \"A\",\n  \"version_vector\": {\n    \"USB\": 3\n  }\n}"
        );

        let md2 = Metadata::new("B", VersionVector::new(), hashes(&[("a/b", "h")]));
        write_metadata(&md2, &path).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "{\n  \"file_hashes\": {\n    \"a/b\": \"h\"\n  },\n  \"id\": \"B\",\n  \"version_vector\": {}\n}"
        );
    }

    #[test]
    fn test_write_read_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(META_FILE);
        let md = Metadata::new(
            "Backup",
            [("Computer", 3), ("Remote", 8)].into_iter().collect(),
            hashes(&[("path/to/file", "the hash")]),
        );

        write_metadata(&md, &path).unwrap();
        let first = fs::read(&path).unwrap();
        assert_eq!(read_metadata(&path).unwrap(), md);

        write_metadata(&md, &path).unwrap();
        assert_eq!(fs::read(&path).unwrap(), first);
    }

    #[test]
    fn test_write_rejects_invalid_before_touching_disk() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(META_FILE);

        let bad_id = Metadata::empty("");
        assert!(matches!(write_metadata(&bad_id, &path), Err(SyncError::Validation(_))));

        let bad_path = Metadata::new("A", VersionVector::new(), hashes(&[("../escape", "h")]));
        assert!(matches!(write_metadata(&bad_path, &path), Err(SyncError::Validation(_))));

        assert!(!path.exists());
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_write_to_directory_fails() {
        let temp = TempDir::new().unwrap();
        let result = write_metadata(&Metadata::empty("A"), temp.path());
        assert!(matches!(result, Err(SyncError::Io(_))));
    }

    #[test]
    fn test_read_missing_is_io_error() {
        let temp = TempDir::new().unwrap();
        match read_metadata(&temp.path().join(META_FILE)) {
            Err(SyncError::Io(e)) => assert_eq!(e.kind(), ErrorKind::NotFound),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_read_rejects_malformed_records() {
        for bad in [
            "not json",
            "[]",
            r#"{"id": "R", "version_vector": {"R": 1}}"#,
            r#"{"id": "R", "version_vector": {}, "file_hashes": {}, "extra": 1}"#,
            r#"{"id": 7, "version_vector": {}, "file_hashes": {}}"#,
            r#"{"id": "R", "version_vector": {"R": "1"}, "file_hashes": {}}"#,
            r#"{"id": "R", "version_vector": {"R": 1.5}, "file_hashes": {}}"#,
            r#"{"id": "R", "version_vector": {}, "file_hashes": {"a": 3}}"#,
            r#"{"id": "R", "version_vector": {}, "file_hashes": {"/abs": "h"}}"#,
            r#"{"id": "R", "version_vector": {}, "file_hashes": {"a//b": "h"}}"#,
        ] {
            let result = Metadata::from_json_str(bad);
            assert!(matches!(result, Err(SyncError::Validation(_))), "accepted {bad}");
        }
    }

    #[test]
    fn test_read_accepts_any_key_order() {
        let md = Metadata::from_json_str(
            r#"{"version_vector": {"A": 2}, "id": "A", "file_hashes": {"x/y": "h"}}"#,
        )
        .unwrap();
        assert_eq!(md.id, "A");
        assert_eq!(md.version_vector.get("A"), 2);
        assert_eq!(md.file_hashes, hashes(&[("x/y", "h")]));
    }

    #[test]
    fn test_init_tree() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("book"), "chapter").unwrap();

        let md = init_tree(temp.path(), "Main Library").unwrap();
        assert_eq!(md, Metadata::empty("Main Library"));
        assert_eq!(read_metadata(&metadata_path(temp.path())).unwrap(), md);
    }

    #[test]
    fn test_init_tree_never_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = metadata_path(temp.path());
        fs::write(&path, "").unwrap();

        let result = init_tree(temp.path(), "My Tree");
        assert!(matches!(result, Err(SyncError::AlreadyInitialized(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_init_tree_leaves_only_the_record() {
        let temp = TempDir::new().unwrap();
        init_tree(temp.path(), "First").unwrap();
        let written = fs::read(metadata_path(temp.path())).unwrap();

        let result = init_tree(temp.path(), "Second");
        assert!(matches!(result, Err(SyncError::AlreadyInitialized(_))));

        let names: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from(META_FILE)]);
        assert_eq!(fs::read(metadata_path(temp.path())).unwrap(), written);
        assert_eq!(read_metadata(&metadata_path(temp.path())).unwrap().id, "First");
    }

    #[test]
    fn test_init_tree_missing_root() {
        let temp = TempDir::new().unwrap();
        let result = init_tree(&temp.path().join("a"), "A");
        assert!(matches!(result, Err(SyncError::Io(_))));
    }
}
