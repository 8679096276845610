//! Scanning and restoring the files under a repository's working tree.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use ugit_hash::{Hasher, ObjectId};
use ugit_object::{Object, ObjectType};
use ugit_odb::ObjectStore;

/// The metadata directory name skipped by every working-tree walk.
pub const METADATA_DIR: &str = ".ugit";

pub type FlatTree = BTreeMap<String, ObjectId>;

#[derive(Debug, thiserror::Error)]
pub enum WorktreeError {
    #[error(transparent)]
    Odb(#[from] ugit_odb::OdbError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn is_ignored(path: &Path) -> bool {
    path.components()
        .any(|c| c.as_os_str() == METADATA_DIR)
}

/// Walk `root`, hashing (but not storing) every regular file's content as a
/// blob. Produces a synthetic tree for comparison against the index.
pub fn snapshot_working_tree(root: &Path) -> Result<FlatTree, WorktreeError> {
    let mut out = FlatTree::new();
    walk(root, root, &mut out)?;
    Ok(out)
}

fn walk(root: &Path, dir: &Path, out: &mut FlatTree) -> Result<(), WorktreeError> {
    let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<Result<_, _>>()?;
    entries.sort_by_key(|e| e.file_name());
    for entry in entries {
        let path = entry.path();
        if is_ignored(&path) {
            continue;
        }
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            walk(root, &path, out)?;
        } else if file_type.is_file() {
            let content = fs::read(&path)?;
            let (oid, _) = Hasher::hash_object("blob", &content);
            let rel = relative_slash_path(root, &path);
            out.insert(rel, oid);
        }
    }
    Ok(())
}

fn relative_slash_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Wipe the working tree (skipping ignored paths) and restore it to exactly
/// what `index` describes.
pub fn materialize(
    store: &ObjectStore,
    root: &Path,
    index: &FlatTree,
) -> Result<(), WorktreeError> {
    wipe(root)?;
    for (path, oid) in index {
        let body = store.get_object(oid, Some(ObjectType::Blob))?;
        let full_path = root.join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full_path, &body)?;
    }
    Ok(())
}

/// Remove every non-ignored file and then every emptied non-ignored
/// directory, bottom-up. Failure to remove a directory because ignored
/// descendants remain inside it is tolerated, not propagated.
fn wipe(root: &Path) -> Result<(), WorktreeError> {
    wipe_dir(root, root)
}

fn wipe_dir(root: &Path, dir: &Path) -> Result<(), WorktreeError> {
    let entries: Vec<_> = fs::read_dir(dir)?.collect::<Result<_, _>>()?;
    for entry in entries {
        let path = entry.path();
        if is_ignored(&path) {
            continue;
        }
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            wipe_dir(root, &path)?;
            let _ = fs::remove_dir(&path);
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ugit_object::Blob;

    fn store() -> (tempfile::TempDir, ObjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::open(dir.path().join("objects")).unwrap();
        (dir, store)
    }

    #[test]
    fn snapshot_ignores_metadata_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"hello").unwrap();
        fs::create_dir(dir.path().join(METADATA_DIR)).unwrap();
        fs::write(dir.path().join(METADATA_DIR).join("HEAD"), b"junk").unwrap();

        let snap = snapshot_working_tree(dir.path()).unwrap();
        assert_eq!(snap.len(), 1);
        assert!(snap.contains_key("a.txt"));
    }

    #[test]
    fn snapshot_hashes_without_writing_to_store() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"hello\n").unwrap();
        let snap = snapshot_working_tree(dir.path()).unwrap();
        let expected = Hasher::hash_object("blob", b"hello\n").0;
        assert_eq!(snap["a.txt"], expected);
    }

    #[test]
    fn materialize_restores_files_from_index() {
        let (dir, store) = store();
        let blob_oid = store
            .write_object(&Object::Blob(Blob::new(b"hi there".to_vec())))
            .unwrap();
        let worktree = tempfile::tempdir().unwrap();
        let mut index = FlatTree::new();
        index.insert("nested/file.txt".to_string(), blob_oid);

        materialize(&store, worktree.path(), &index).unwrap();

        let content = fs::read(worktree.path().join("nested/file.txt")).unwrap();
        assert_eq!(content, b"hi there");
        let _ = dir;
    }

    #[test]
    fn materialize_wipes_stale_files_not_in_new_index() {
        let (dir, store) = store();
        let worktree = tempfile::tempdir().unwrap();
        fs::write(worktree.path().join("stale.txt"), b"old").unwrap();

        materialize(&store, worktree.path(), &FlatTree::new()).unwrap();

        assert!(!worktree.path().join("stale.txt").exists());
        let _ = dir;
    }

    #[test]
    fn materialize_tolerates_nonremovable_directory_with_ignored_descendant() {
        let (dir, store) = store();
        let worktree = tempfile::tempdir().unwrap();
        let nested_ignored = worktree.path().join("keepme").join(METADATA_DIR);
        fs::create_dir_all(&nested_ignored).unwrap();
        fs::write(nested_ignored.join("x"), b"y").unwrap();

        // "keepme" contains only an ignored descendant, so its removal
        // after emptying will fail (non-empty); that failure must not
        // propagate as an error.
        assert!(materialize(&store, worktree.path(), &FlatTree::new()).is_ok());
        assert!(worktree.path().join("keepme").exists());
    }
}
