//! Three-way merge: path alignment across a base/head/other trio of trees,
//! and a blob-level merge that shells out to the system `diff3` the way the
//! original implementation did, rather than an in-process content merger.

use std::io::Write;
use std::process::Command;

use ugit_hash::ObjectId;
use ugit_object::ObjectType;
use ugit_odb::ObjectStore;
use ugit_tree::{compare_trees, FlatTree};

#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error(transparent)]
    Odb(#[from] ugit_odb::OdbError),

    #[error("diff3 exited with status {status}")]
    MergeFailed { status: i32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn read_or_empty(store: &ObjectStore, oid: Option<ObjectId>) -> Result<Vec<u8>, MergeError> {
    match oid {
        Some(oid) => Ok(store.get_object(&oid, Some(ObjectType::Blob))?),
        None => Ok(Vec::new()),
    }
}

/// Three-way merge of one path's content. `base`/`head`/`other` are the blob
/// OIDs on each side, or `None` when the path is absent there (treated as
/// empty input to the merge utility).
///
/// Writes each side to a `tempfile::NamedTempFile` and invokes
/// `diff3 -m -L HEAD <head> -L BASE <base> -L MERGE_HEAD <other>`, matching
/// the positional labeling the original tool used. Exit codes 0 (clean) and
/// 1 (conflict markers present) are both treated as success; anything else
/// is `MergeFailed`.
pub fn merge_blobs(
    store: &ObjectStore,
    base: Option<ObjectId>,
    head: Option<ObjectId>,
    other: Option<ObjectId>,
) -> Result<Vec<u8>, MergeError> {
    let base_bytes = read_or_empty(store, base)?;
    let head_bytes = read_or_empty(store, head)?;
    let other_bytes = read_or_empty(store, other)?;

    let mut base_file = tempfile::NamedTempFile::new()?;
    let mut head_file = tempfile::NamedTempFile::new()?;
    let mut other_file = tempfile::NamedTempFile::new()?;
    base_file.write_all(&base_bytes)?;
    base_file.flush()?;
    head_file.write_all(&head_bytes)?;
    head_file.flush()?;
    other_file.write_all(&other_bytes)?;
    other_file.flush()?;

    let output = Command::new("diff3")
        .arg("-m")
        .arg("-L")
        .arg("HEAD")
        .arg(head_file.path())
        .arg("-L")
        .arg("BASE")
        .arg(base_file.path())
        .arg("-L")
        .arg("MERGE_HEAD")
        .arg(other_file.path())
        .output()?;

    match output.status.code() {
        Some(0) | Some(1) => {
            tracing::debug!(status = output.status.code(), "blob merge completed");
            Ok(output.stdout)
        }
        other => Err(MergeError::MergeFailed {
            status: other.unwrap_or(-1),
        }),
    }
}

/// Three-way merge of entire trees: align paths across `base`/`head`/`other`
/// with [`compare_trees`], merge each path's content, and hash the results
/// into a new flat tree ready to become the post-merge index.
pub fn merge_trees(
    store: &ObjectStore,
    base: &FlatTree,
    head: &FlatTree,
    other: &FlatTree,
) -> Result<FlatTree, MergeError> {
    let mut merged = FlatTree::new();
    for (path, row) in compare_trees(&[base.clone(), head.clone(), other.clone()]) {
        let content = merge_blobs(store, row[0], row[1], row[2])?;
        let oid = store.hash_object(ObjectType::Blob, &content)?;
        merged.insert(path, oid);
    }
    tracing::debug!(paths = merged.len(), "tree merge completed");
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ugit_object::{Blob, Object};

    fn store() -> (tempfile::TempDir, ObjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::open(dir.path()).unwrap();
        (dir, store)
    }

    fn blob(store: &ObjectStore, content: &[u8]) -> ObjectId {
        store
            .write_object(&Object::Blob(Blob::new(content.to_vec())))
            .unwrap()
    }

    #[test]
    fn non_overlapping_changes_merge_cleanly() {
        let (_dir, store) = store();
        let base = blob(&store, b"line1\nline2\nline3\n");
        let head = blob(&store, b"MODIFIED\nline2\nline3\n");
        let other = blob(&store, b"line1\nline2\nMODIFIED\n");

        let merged = merge_blobs(&store, Some(base), Some(head), Some(other)).unwrap();
        let text = String::from_utf8(merged).unwrap();
        assert!(text.contains("MODIFIED\nline2\nMODIFIED"));
        assert!(!text.contains("<<<<<<<"));
    }

    #[test]
    fn conflicting_changes_produce_diff3_markers() {
        let (_dir, store) = store();
        let base = blob(&store, b"a\nb\nc\n");
        let head = blob(&store, b"a\nX\nc\n");
        let other = blob(&store, b"a\nY\nc\n");

        let merged = merge_blobs(&store, Some(base), Some(head), Some(other)).unwrap();
        let text = String::from_utf8(merged).unwrap();
        assert!(text.contains("<<<<<<< HEAD"));
        assert!(text.contains(">>>>>>> MERGE_HEAD"));
        assert!(text.contains("||||||| BASE"));
    }

    #[test]
    fn identical_changes_on_both_sides_are_clean() {
        let (_dir, store) = store();
        let base = blob(&store, b"old\n");
        let head = blob(&store, b"new\n");
        let other = blob(&store, b"new\n");

        let merged = merge_blobs(&store, Some(base), Some(head), Some(other)).unwrap();
        assert_eq!(merged, b"new\n");
    }

    #[test]
    fn missing_side_is_treated_as_empty_input() {
        let (_dir, store) = store();
        let head = blob(&store, b"only on head\n");

        let merged = merge_blobs(&store, None, Some(head), None).unwrap();
        assert_eq!(merged, b"only on head\n");
    }

    #[test]
    fn merge_trees_combines_independent_path_changes() {
        let (_dir, store) = store();
        let a_base = blob(&store, b"a-base\n");
        let a_head = blob(&store, b"a-head\n");
        let b_base = blob(&store, b"b-base\n");
        let b_other = blob(&store, b"b-other\n");

        let mut base = FlatTree::new();
        base.insert("a.txt".to_string(), a_base);
        base.insert("b.txt".to_string(), b_base);

        let mut head = FlatTree::new();
        head.insert("a.txt".to_string(), a_head);
        head.insert("b.txt".to_string(), b_base);

        let mut other = FlatTree::new();
        other.insert("a.txt".to_string(), a_base);
        other.insert("b.txt".to_string(), b_other);

        let merged = merge_trees(&store, &base, &head, &other).unwrap();
        assert_eq!(
            store.get_object(&merged["a.txt"], None).unwrap(),
            b"a-head\n"
        );
        assert_eq!(
            store.get_object(&merged["b.txt"], None).unwrap(),
            b"b-other\n"
        );
    }
}
