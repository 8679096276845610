//! Conversion between the flat index and nested tree objects, and the
//! N-way tree comparison used by diff and merge.

use std::collections::BTreeMap;

use ugit_hash::ObjectId;
use ugit_object::{EntryKind, Object, Tree, TreeEntry};
use ugit_odb::ObjectStore;

pub type FlatTree = BTreeMap<String, ObjectId>;

#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error(transparent)]
    Odb(#[from] ugit_odb::OdbError),

    #[error(transparent)]
    Object(#[from] ugit_object::ObjectError),

    #[error("corrupt tree: {0}")]
    Corrupt(String),
}

/// A change between two trees for a single path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Deleted,
    Modified,
}

/// One internal node of the flat-path → directory-tree partitioning used by
/// [`build_tree`].
#[derive(Default)]
struct DirNode {
    files: BTreeMap<String, ObjectId>,
    dirs: BTreeMap<String, DirNode>,
}

impl DirNode {
    fn insert(&mut self, mut segments: std::str::Split<'_, char>, oid: ObjectId) {
        let first = segments.next().expect("path has at least one segment");
        match segments.clone().next() {
            None => {
                self.files.insert(first.to_string(), oid);
            }
            Some(_) => {
                self.dirs
                    .entry(first.to_string())
                    .or_default()
                    .insert(segments, oid);
            }
        }
    }

    fn write(&self, store: &ObjectStore) -> Result<ObjectId, TreeError> {
        let mut entries = Vec::with_capacity(self.files.len() + self.dirs.len());
        for (name, oid) in &self.files {
            entries.push(TreeEntry {
                kind: EntryKind::Blob,
                oid: *oid,
                name: name.as_str().into(),
            });
        }
        for (name, node) in &self.dirs {
            let sub_oid = node.write(store)?;
            entries.push(TreeEntry {
                kind: EntryKind::Tree,
                oid: sub_oid,
                name: name.as_str().into(),
            });
        }
        let tree = Tree::new(entries).map_err(TreeError::Object)?;
        Ok(store.write_object(&Object::Tree(tree))?)
    }
}

/// Build a tree object (and all its subtrees) from the flat index, writing
/// every object into `store`. Returns the root tree's OID.
pub fn build_tree(store: &ObjectStore, index: &FlatTree) -> Result<ObjectId, TreeError> {
    let mut root = DirNode::default();
    for (path, oid) in index {
        root.insert(path.split('/'), *oid);
    }
    root.write(store)
}

/// Recursively decode a tree OID into a flat `path → oid` mapping.
pub fn get_tree(store: &ObjectStore, oid: ObjectId) -> Result<FlatTree, TreeError> {
    let mut out = FlatTree::new();
    collect(store, oid, "", &mut out)?;
    Ok(out)
}

fn collect(
    store: &ObjectStore,
    oid: ObjectId,
    base_path: &str,
    out: &mut FlatTree,
) -> Result<(), TreeError> {
    let body = store.get_object(&oid, Some(ugit_object::ObjectType::Tree))?;
    let tree = Tree::parse(&body)?;
    for entry in &tree.entries {
        let name = entry.name.to_string();
        if name == "." || name == ".." || name.contains('/') {
            return Err(TreeError::Corrupt(format!(
                "invalid entry name '{name}' in tree {oid}"
            )));
        }
        let full_path = if base_path.is_empty() {
            name
        } else {
            format!("{base_path}/{name}")
        };
        match entry.kind {
            EntryKind::Blob => {
                out.insert(full_path, entry.oid);
            }
            EntryKind::Tree => {
                collect(store, entry.oid, &full_path, out)?;
            }
        }
    }
    Ok(())
}

/// Align an arbitrary number of trees by path: one row per path present in
/// any of them, `None` where a tree doesn't have that path.
pub fn compare_trees(trees: &[FlatTree]) -> Vec<(String, Vec<Option<ObjectId>>)> {
    let mut paths: Vec<&String> = Vec::new();
    let mut seen = std::collections::BTreeSet::new();
    for tree in trees {
        for path in tree.keys() {
            if seen.insert(path.clone()) {
                paths.push(path);
            }
        }
    }
    let mut paths: Vec<String> = paths.into_iter().cloned().collect();
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let row = trees.iter().map(|t| t.get(&path).copied()).collect();
            (path, row)
        })
        .collect()
}

/// Derive the created/deleted/modified report between two trees.
pub fn change_list(before: &FlatTree, after: &FlatTree) -> Vec<(String, ChangeKind)> {
    compare_trees(&[before.clone(), after.clone()])
        .into_iter()
        .filter_map(|(path, row)| {
            let (a, b) = (row[0], row[1]);
            if a == b {
                return None;
            }
            let kind = match (a, b) {
                (None, Some(_)) => ChangeKind::Created,
                (Some(_), None) => ChangeKind::Deleted,
                _ => ChangeKind::Modified,
            };
            Some((path, kind))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ugit_object::Blob;

    fn store() -> (tempfile::TempDir, ObjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ObjectStore::open(dir.path()).unwrap();
        (dir, store)
    }

    fn blob_oid(store: &ObjectStore, content: &[u8]) -> ObjectId {
        store
            .write_object(&Object::Blob(Blob::new(content.to_vec())))
            .unwrap()
    }

    #[test]
    fn build_and_get_tree_roundtrip() {
        let (_dir, store) = store();
        let a = blob_oid(&store, b"a content");
        let b = blob_oid(&store, b"b content");

        let mut index = FlatTree::new();
        index.insert("a.txt".to_string(), a);
        index.insert("sub/b.txt".to_string(), b);

        let root = build_tree(&store, &index).unwrap();
        let flat = get_tree(&store, root).unwrap();
        assert_eq!(flat, index);
    }

    #[test]
    fn build_tree_is_deterministic_regardless_of_insertion_order() {
        let (_dir, store) = store();
        let a = blob_oid(&store, b"a");
        let b = blob_oid(&store, b"b");

        let mut first = FlatTree::new();
        first.insert("z.txt".to_string(), a);
        first.insert("a.txt".to_string(), b);

        let mut second = FlatTree::new();
        second.insert("a.txt".to_string(), b);
        second.insert("z.txt".to_string(), a);

        assert_eq!(
            build_tree(&store, &first).unwrap(),
            build_tree(&store, &second).unwrap()
        );
    }

    #[test]
    fn compare_trees_aligns_by_path() {
        let (_dir, store) = store();
        let a1 = blob_oid(&store, b"v1");
        let a2 = blob_oid(&store, b"v2");

        let mut t1 = FlatTree::new();
        t1.insert("a.txt".to_string(), a1);
        t1.insert("only_in_1.txt".to_string(), a1);

        let mut t2 = FlatTree::new();
        t2.insert("a.txt".to_string(), a2);
        t2.insert("only_in_2.txt".to_string(), a2);

        let rows = compare_trees(&[t1, t2]);
        let by_path: BTreeMap<_, _> = rows.into_iter().collect();
        assert_eq!(
            by_path["a.txt"],
            vec![Some(a1), Some(a2)]
        );
        assert_eq!(by_path["only_in_1.txt"], vec![Some(a1), None]);
        assert_eq!(by_path["only_in_2.txt"], vec![None, Some(a2)]);
    }

    #[test]
    fn change_list_classifies_created_deleted_modified() {
        let (_dir, store) = store();
        let v1 = blob_oid(&store, b"v1");
        let v2 = blob_oid(&store, b"v2");

        let mut before = FlatTree::new();
        before.insert("keep.txt".to_string(), v1);
        before.insert("removed.txt".to_string(), v1);
        before.insert("changed.txt".to_string(), v1);

        let mut after = FlatTree::new();
        after.insert("keep.txt".to_string(), v1);
        after.insert("changed.txt".to_string(), v2);
        after.insert("added.txt".to_string(), v2);

        let changes: BTreeMap<_, _> = change_list(&before, &after).into_iter().collect();
        assert_eq!(changes["removed.txt"], ChangeKind::Deleted);
        assert_eq!(changes["changed.txt"], ChangeKind::Modified);
        assert_eq!(changes["added.txt"], ChangeKind::Created);
        assert!(!changes.contains_key("keep.txt"));
    }

    #[test]
    fn get_tree_propagates_parse_errors_from_malformed_tree_bytes() {
        let (_dir, store) = store();
        // Tree::new rejects bad names at construction time, so exercise
        // collect()'s error path via a hand-written malformed tree body.
        let oid = blob_oid(&store, b"x");
        let malformed = format!("blob {oid} a/b\n");
        let bad_oid = store
            .hash_object(ugit_object::ObjectType::Tree, malformed.as_bytes())
            .unwrap();
        assert!(get_tree(&store, bad_oid).is_err());
    }
}
