//! Commit graph traversal: breadth-first walking, merge-base, ancestry
//! tests, and reachable-object enumeration.
//!
//! The walk is a deterministic BFS over an explicit `VecDeque`: the first
//! parent of each commit is enqueued at the front, the rest at the back.
//! This primary-parent-first discipline (front-parent-first, FIFO/LIFO
//! mixed) is required for [`get_merge_base`] to return stable results —
//! it is not an incidental implementation detail.

use std::collections::{HashSet, VecDeque};

use ugit_hash::ObjectId;
use ugit_object::{Commit, ObjectType};
use ugit_odb::ObjectStore;
use ugit_tree::get_tree;

#[derive(Debug, thiserror::Error)]
pub enum RevwalkError {
    #[error(transparent)]
    Odb(#[from] ugit_odb::OdbError),

    #[error(transparent)]
    Object(#[from] ugit_object::ObjectError),

    #[error(transparent)]
    Tree(#[from] ugit_tree::TreeError),
}

fn get_commit(store: &ObjectStore, oid: &ObjectId) -> Result<Commit, RevwalkError> {
    let body = store.get_object(oid, Some(ObjectType::Commit))?;
    Ok(Commit::parse(&body)?)
}

/// Breadth-first walk over the ancestors of `roots` (roots included),
/// yielding each commit at most once. Primary parents are explored before
/// secondary (merge) parents within a generation.
pub struct RevWalk<'a> {
    store: &'a ObjectStore,
    queue: VecDeque<ObjectId>,
    seen: HashSet<ObjectId>,
}

impl<'a> RevWalk<'a> {
    pub fn new(store: &'a ObjectStore, roots: impl IntoIterator<Item = ObjectId>) -> Self {
        let queue: VecDeque<ObjectId> = roots.into_iter().collect();
        Self {
            store,
            queue,
            seen: HashSet::new(),
        }
    }
}

impl Iterator for RevWalk<'_> {
    type Item = Result<ObjectId, RevwalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let oid = self.queue.pop_front()?;
            if !self.seen.insert(oid) {
                continue;
            }
            let commit = match get_commit(self.store, &oid) {
                Ok(c) => c,
                Err(e) => return Some(Err(e)),
            };
            let mut parents = commit.parents.into_iter();
            if let Some(first) = parents.next() {
                self.queue.push_front(first);
            }
            for rest in parents {
                self.queue.push_back(rest);
            }
            return Some(Ok(oid));
        }
    }
}

/// Iterate every commit reachable from `roots`, primary-parent-first.
pub fn iter_commits_and_parents(
    store: &ObjectStore,
    roots: impl IntoIterator<Item = ObjectId>,
) -> RevWalk<'_> {
    RevWalk::new(store, roots)
}

/// The most recent common ancestor of `a` and `b`, or `None` if their
/// histories are disjoint.
pub fn get_merge_base(
    store: &ObjectStore,
    a: ObjectId,
    b: ObjectId,
) -> Result<Option<ObjectId>, RevwalkError> {
    let ancestors_of_a: HashSet<ObjectId> = iter_commits_and_parents(store, [a])
        .collect::<Result<_, _>>()?;

    for candidate in iter_commits_and_parents(store, [b]) {
        let candidate = candidate?;
        if ancestors_of_a.contains(&candidate) {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}

/// Is `candidate` an ancestor of (or equal to) `descendant`?
pub fn is_ancestor_of(
    store: &ObjectStore,
    descendant: ObjectId,
    candidate: ObjectId,
) -> Result<bool, RevwalkError> {
    for oid in iter_commits_and_parents(store, [descendant]) {
        if oid? == candidate {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Every object reachable from `roots`: the commits themselves plus every
/// tree and blob referenced from each commit's root tree, de-duplicated.
pub fn iter_objects_in_commits(
    store: &ObjectStore,
    roots: impl IntoIterator<Item = ObjectId>,
) -> Result<Vec<ObjectId>, RevwalkError> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();

    for commit_oid in iter_commits_and_parents(store, roots) {
        let commit_oid = commit_oid?;
        if !seen.insert(commit_oid) {
            continue;
        }
        out.push(commit_oid);

        let commit = get_commit(store, &commit_oid)?;
        let flat = get_tree(store, commit.tree)?;
        if seen.insert(commit.tree) {
            out.push(commit.tree);
        }
        // `get_tree` only returns blob leaves; recover subtree OIDs by
        // walking the tree objects directly so every tree in the path
        // also ends up in the reachable set.
        collect_subtrees(store, commit.tree, &mut out, &mut seen)?;
        for blob_oid in flat.values() {
            if seen.insert(*blob_oid) {
                out.push(*blob_oid);
            }
        }
    }

    Ok(out)
}

fn collect_subtrees(
    store: &ObjectStore,
    tree_oid: ObjectId,
    out: &mut Vec<ObjectId>,
    seen: &mut HashSet<ObjectId>,
) -> Result<(), RevwalkError> {
    let body = store.get_object(&tree_oid, Some(ObjectType::Tree))?;
    let tree = ugit_object::Tree::parse(&body)?;
    for entry in &tree.entries {
        if entry.kind == ugit_object::EntryKind::Tree {
            if seen.insert(entry.oid) {
                out.push(entry.oid);
            }
            collect_subtrees(store, entry.oid, out, seen)?;
        }
    }
    Ok(())
}
