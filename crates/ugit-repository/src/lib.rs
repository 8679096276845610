//! Ties the object store, reference namespace, index, tree codec, working
//! copy, commit graph, merge engine, and remote sync into one handle.
//!
//! Grounded on the teacher's `git-repository` crate, trimmed down to this
//! system's much smaller surface: no bare repositories, no linked worktrees,
//! no config files — just a working tree, its `.ugit` metadata directory,
//! and the operations that touch more than one lower-level component.

mod discover;
mod error;
mod init;

pub use error::RepoError;

use std::path::{Path, PathBuf};

use ugit_hash::ObjectId;
use ugit_index::IndexStore;
use ugit_object::{Commit, Object, ObjectType};
use ugit_odb::ObjectStore;
use ugit_ref::RefStore;

/// The result of resolving a user-typed name (see [`Repository::resolve`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Resolved through the reference namespace; carries the fully-qualified
    /// ref name that matched, so callers can tell a branch from a tag.
    Ref { name: String, oid: ObjectId },
    /// Resolved as a literal 40-character hex object id.
    Oid(ObjectId),
}

impl Resolved {
    pub fn oid(&self) -> ObjectId {
        match self {
            Resolved::Ref { oid, .. } => *oid,
            Resolved::Oid(oid) => *oid,
        }
    }

    /// Is this name a branch (i.e. did it resolve via `refs/heads/...`)?
    pub fn is_branch(&self) -> Option<&str> {
        match self {
            Resolved::Ref { name, .. } if name.starts_with("refs/heads/") => Some(name),
            _ => None,
        }
    }
}

/// The outcome of [`Repository::merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// `HEAD` was already an ancestor of the other commit; it was simply
    /// advanced and the working tree updated. No commit is required.
    FastForward,
    /// A three-way merge ran; results (possibly containing conflict markers)
    /// were written to the index and working tree. `MERGE_HEAD` is set and
    /// a commit is required to finish.
    Merged,
}

/// A repository: a working tree plus its `.ugit` metadata directory.
pub struct Repository {
    work_tree: PathBuf,
    ugit_dir: PathBuf,
    objects: ObjectStore,
    refs: RefStore,
    index: IndexStore,
}

impl Repository {
    fn from_discovered(discovered: discover::DiscoveredRoot) -> Result<Self, RepoError> {
        let discover::DiscoveredRoot { work_tree, ugit_dir } = discovered;
        let objects = ObjectStore::open(ugit_dir.join("objects"))?;
        let refs = RefStore::open(&ugit_dir);
        let index = IndexStore::open(ugit_dir.join("index"));
        Ok(Self {
            work_tree,
            ugit_dir,
            objects,
            refs,
            index,
        })
    }

    /// Initialize a new repository at `path`. Safe to call on an existing
    /// repository — it is then a no-op.
    pub fn init(path: impl AsRef<Path>) -> Result<Self, RepoError> {
        Self::from_discovered(init::init(path)?)
    }

    /// Discover a repository by walking upward from `start`.
    pub fn discover(start: impl AsRef<Path>) -> Result<Self, RepoError> {
        Self::from_discovered(discover::discover(start)?)
    }

    /// Open a repository whose `.ugit` directory is known to exist at
    /// `path/.ugit`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepoError> {
        Self::from_discovered(discover::open(path)?)
    }

    pub fn work_tree(&self) -> &Path {
        &self.work_tree
    }

    pub fn ugit_dir(&self) -> &Path {
        &self.ugit_dir
    }

    pub fn objects(&self) -> &ObjectStore {
        &self.objects
    }

    pub fn refs(&self) -> &RefStore {
        &self.refs
    }

    pub fn index(&self) -> &IndexStore {
        &self.index
    }

    fn get_commit(&self, oid: ObjectId) -> Result<Commit, RepoError> {
        let body = self.objects.get_object(&oid, Some(ObjectType::Commit))?;
        Ok(Commit::parse(&body)?)
    }

    /// Resolve a user-typed name to an object id. `@` is a synonym for
    /// `HEAD`. Tries, in order: `{name}`, `refs/{name}`, `refs/tags/{name}`,
    /// `refs/heads/{name}`, then falls back to treating `name` as a literal
    /// 40-character hex object id.
    pub fn resolve(&self, name: &str) -> Result<Resolved, RepoError> {
        let name = if name == "@" { "HEAD" } else { name };
        let candidates = [
            name.to_string(),
            format!("refs/{name}"),
            format!("refs/tags/{name}"),
            format!("refs/heads/{name}"),
        ];
        for candidate in candidates {
            if let Some(oid) = self.refs.get_oid(&candidate)? {
                return Ok(Resolved::Ref { name: candidate, oid });
            }
        }
        if name.len() == ObjectId::HEX_LEN && name.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Ok(Resolved::Oid(ObjectId::from_hex(name)?));
        }
        Err(RepoError::UnknownName(name.to_string()))
    }

    pub fn resolve_oid(&self, name: &str) -> Result<ObjectId, RepoError> {
        Ok(self.resolve(name)?.oid())
    }

    /// Record the current index as a new commit. Parents are `HEAD`
    /// (if set) and `MERGE_HEAD` (if a merge is in progress). `HEAD` is
    /// advanced following its symbolic hop; `MERGE_HEAD` is cleared.
    pub fn commit(&self, message: &str) -> Result<ObjectId, RepoError> {
        let index = self.index.acquire()?;
        let tree = ugit_tree::build_tree(&self.objects, &index)?;
        drop(index);

        let head = self.refs.get_oid("HEAD")?;
        let merge_head = self.refs.get_oid("MERGE_HEAD")?;

        let mut parents = Vec::new();
        parents.extend(head);
        parents.extend(merge_head);

        let message = if message.ends_with('\n') {
            message.to_string()
        } else {
            format!("{message}\n")
        };

        let oid = self
            .objects
            .write_object(&Object::Commit(Commit::new(tree, parents, message)))?;
        self.refs.update_ref("HEAD", oid, true)?;
        if merge_head.is_some() {
            self.refs.delete_ref("MERGE_HEAD", false)?;
        }
        tracing::info!(oid = %oid, "created commit");
        Ok(oid)
    }

    /// Resolve `name`, load its tree into the index and working tree, and
    /// update `HEAD` — symbolic if `name` resolved through `refs/heads/...`,
    /// direct (detached) otherwise.
    pub fn checkout(&self, name: &str) -> Result<(), RepoError> {
        let resolved = self.resolve(name)?;
        let oid = resolved.oid();
        let commit = self.get_commit(oid)?;
        let flat = ugit_tree::get_tree(&self.objects, commit.tree)?;

        ugit_worktree::materialize(&self.objects, &self.work_tree, &flat)?;
        {
            let mut index = self.index.acquire()?;
            index.clear();
            index.extend(flat);
        }

        match resolved.is_branch() {
            Some(branch_ref) => self.refs.set_symbolic("HEAD", branch_ref)?,
            None => self.refs.update_ref("HEAD", oid, false)?,
        }
        tracing::info!(name, oid = %oid, "checked out");
        Ok(())
    }

    /// Set `HEAD` directly to the object id resolved from `name`, without
    /// touching the working tree.
    pub fn reset(&self, name: &str) -> Result<(), RepoError> {
        let oid = self.resolve_oid(name)?;
        self.refs.update_ref("HEAD", oid, false)?;
        tracing::info!(oid = %oid, "reset HEAD");
        Ok(())
    }

    /// Merge `other` into the current `HEAD`.
    pub fn merge(&self, other: &str) -> Result<MergeOutcome, RepoError> {
        let head = self.refs.get_oid("HEAD")?.ok_or(RepoError::NoHead)?;
        let other_oid = self.resolve_oid(other)?;

        let base = ugit_revwalk::get_merge_base(&self.objects, other_oid, head)?;

        if base == Some(head) {
            let other_commit = self.get_commit(other_oid)?;
            let flat = ugit_tree::get_tree(&self.objects, other_commit.tree)?;
            ugit_worktree::materialize(&self.objects, &self.work_tree, &flat)?;
            {
                let mut index = self.index.acquire()?;
                index.clear();
                index.extend(flat);
            }
            self.refs.update_ref("HEAD", other_oid, true)?;
            tracing::info!(oid = %other_oid, "fast-forwarded");
            return Ok(MergeOutcome::FastForward);
        }

        let head_commit = self.get_commit(head)?;
        let other_commit = self.get_commit(other_oid)?;
        let head_tree = ugit_tree::get_tree(&self.objects, head_commit.tree)?;
        let other_tree = ugit_tree::get_tree(&self.objects, other_commit.tree)?;
        let base_tree = match base {
            Some(base_oid) => {
                let base_commit = self.get_commit(base_oid)?;
                ugit_tree::get_tree(&self.objects, base_commit.tree)?
            }
            None => ugit_tree::FlatTree::new(),
        };

        let merged = ugit_merge::merge_trees(&self.objects, &base_tree, &head_tree, &other_tree)?;
        ugit_worktree::materialize(&self.objects, &self.work_tree, &merged)?;
        {
            let mut index = self.index.acquire()?;
            index.clear();
            index.extend(merged);
        }
        self.refs.update_ref("MERGE_HEAD", other_oid, false)?;
        tracing::info!(head = %head, other = %other_oid, "merged, awaiting commit");
        Ok(MergeOutcome::Merged)
    }

    /// Fetch every branch tip under `refs/heads/` from `peer`, copying any
    /// object reachable from those tips that is missing locally, then
    /// recording each tip under `refs/remote/{branch}`.
    pub fn fetch(&self, peer: &Repository) -> Result<(), RepoError> {
        let remote_refs = peer.refs.iter_refs("refs/heads")?;
        let roots = remote_refs.iter().map(|(_, oid)| *oid);
        let reachable = ugit_revwalk::iter_objects_in_commits(&peer.objects, roots)?;

        for oid in reachable {
            self.objects.fetch_object_if_missing(&oid, &peer.objects)?;
        }

        for (name, oid) in &remote_refs {
            let branch = name.strip_prefix("refs/heads/").unwrap_or(name);
            self.refs
                .update_ref(&format!("refs/remote/{branch}"), *oid, false)?;
        }
        tracing::info!(branches = remote_refs.len(), "fetched");
        Ok(())
    }

    /// Push the local `refname` to `peer`, copying every object reachable
    /// from it that the peer is missing, then updating `refname` at the
    /// peer. Objects are copied before the ref is updated.
    pub fn push(&self, peer: &Repository, refname: &str) -> Result<(), RepoError> {
        let local = self
            .refs
            .get_oid(refname)?
            .ok_or_else(|| RepoError::UnknownName(refname.to_string()))?;

        let reachable = ugit_revwalk::iter_objects_in_commits(&self.objects, [local])?;
        for oid in reachable {
            peer.objects.fetch_object_if_missing(&oid, &self.objects)?;
        }
        peer.refs.update_ref(refname, local, false)?;
        tracing::info!(refname, oid = %local, "pushed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ugit_object::Blob;

    fn init_repo() -> (tempfile::TempDir, Repository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        (dir, repo)
    }

    fn stage_file(repo: &Repository, path: &str, content: &[u8]) -> ObjectId {
        let oid = repo
            .objects()
            .write_object(&Object::Blob(Blob::new(content.to_vec())))
            .unwrap();
        repo.index()
            .acquire()
            .unwrap()
            .insert(path.to_string(), oid);
        oid
    }

    #[test]
    fn init_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let _first = Repository::init(dir.path()).unwrap();
        let before = std::fs::read(dir.path().join(".ugit/HEAD")).unwrap();
        let _second = Repository::init(dir.path()).unwrap();
        let after = std::fs::read(dir.path().join(".ugit/HEAD")).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn discover_walks_up_from_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();
        let repo = Repository::discover(&nested).unwrap();
        assert_eq!(
            std::fs::canonicalize(repo.work_tree()).unwrap(),
            std::fs::canonicalize(dir.path()).unwrap()
        );
    }

    #[test]
    fn commit_and_checkout_round_trip() {
        let (dir, repo) = init_repo();
        stage_file(&repo, "a.txt", b"hello\n");
        let first = repo.commit("first").unwrap();

        stage_file(&repo, "a.txt", b"world\n");
        repo.commit("second").unwrap();

        repo.checkout(&first.to_string()).unwrap();
        let content = std::fs::read(dir.path().join("a.txt")).unwrap();
        assert_eq!(content, b"hello\n");
    }

    #[test]
    fn commit_after_detached_checkout_does_not_move_branch_ref() {
        let (_dir, repo) = init_repo();
        stage_file(&repo, "a.txt", b"one\n");
        let first = repo.commit("first").unwrap();
        let branch_before = repo.refs().get_oid("refs/heads/main").unwrap();

        repo.checkout(&first.to_string()).unwrap();
        stage_file(&repo, "a.txt", b"two\n");
        let detached_commit = repo.commit("detached").unwrap();

        assert_eq!(
            repo.refs().get_ref_raw("HEAD").unwrap(),
            Some(ugit_ref::RefValue::Direct(detached_commit))
        );
        assert_eq!(repo.refs().get_oid("refs/heads/main").unwrap(), branch_before);
    }

    #[test]
    fn checkout_branch_leaves_head_symbolic() {
        let (_dir, repo) = init_repo();
        stage_file(&repo, "a.txt", b"hi\n");
        repo.commit("first").unwrap();

        repo.checkout("main").unwrap();
        assert_eq!(
            repo.refs().get_ref_raw("HEAD").unwrap(),
            Some(ugit_ref::RefValue::Symbolic("refs/heads/main".to_string()))
        );
    }

    #[test]
    fn reset_detaches_head() {
        let (_dir, repo) = init_repo();
        stage_file(&repo, "a.txt", b"hi\n");
        let oid = repo.commit("first").unwrap();

        repo.reset(&oid.to_string()).unwrap();
        assert_eq!(
            repo.refs().get_ref_raw("HEAD").unwrap(),
            Some(ugit_ref::RefValue::Direct(oid))
        );
    }

    #[test]
    fn fast_forward_merge_advances_branch() {
        let (dir, repo) = init_repo();
        stage_file(&repo, "a.txt", b"one\n");
        let first = repo.commit("first").unwrap();

        repo.refs()
            .update_ref("refs/heads/topic", first, true)
            .unwrap();

        stage_file(&repo, "a.txt", b"two\n");
        let second = repo.commit("second").unwrap();

        repo.checkout("topic").unwrap();
        let outcome = repo.merge(&second.to_string()).unwrap();
        assert_eq!(outcome, MergeOutcome::FastForward);
        assert_eq!(repo.refs().get_oid("refs/heads/topic").unwrap(), Some(second));
        assert_eq!(std::fs::read(dir.path().join("a.txt")).unwrap(), b"two\n");
    }

    #[test]
    fn diverging_merge_sets_merge_head_and_leaves_conflict_markers() {
        let (dir, repo) = init_repo();
        stage_file(&repo, "a.txt", b"base\n");
        let base = repo.commit("base").unwrap();

        repo.refs()
            .update_ref("refs/heads/topic", base, true)
            .unwrap();

        stage_file(&repo, "a.txt", b"main-change\n");
        repo.commit("on main").unwrap();

        repo.checkout("topic").unwrap();
        stage_file(&repo, "a.txt", b"topic-change\n");
        let topic_tip = repo.commit("on topic").unwrap();

        repo.checkout("main").unwrap();
        let outcome = repo.merge(&topic_tip.to_string()).unwrap();
        assert_eq!(outcome, MergeOutcome::Merged);
        assert_eq!(repo.refs().get_oid("MERGE_HEAD").unwrap(), Some(topic_tip));

        let content = std::fs::read_to_string(dir.path().join("a.txt")).unwrap();
        assert!(content.contains("<<<<<<< HEAD"));
    }

    #[test]
    fn fetch_replicates_remote_branches_and_objects() {
        let (_src_dir, src) = init_repo();
        stage_file(&src, "a.txt", b"content\n");
        let oid = src.commit("first").unwrap();

        let dst_dir = tempfile::tempdir().unwrap();
        let dst = Repository::init(dst_dir.path()).unwrap();

        dst.fetch(&src).unwrap();
        assert_eq!(dst.refs().get_oid("refs/remote/main").unwrap(), Some(oid));
        assert!(dst.objects().object_exists(&oid));
    }

    #[test]
    fn push_replicates_local_branch_and_objects() {
        let (_src_dir, src) = init_repo();
        stage_file(&src, "a.txt", b"content\n");
        let oid = src.commit("first").unwrap();

        let dst_dir = tempfile::tempdir().unwrap();
        let dst = Repository::init(dst_dir.path()).unwrap();

        src.push(&dst, "refs/heads/main").unwrap();
        assert_eq!(dst.refs().get_oid("refs/heads/main").unwrap(), Some(oid));
        assert!(dst.objects().object_exists(&oid));
    }

    #[test]
    fn resolve_prefers_at_as_head_synonym() {
        let (_dir, repo) = init_repo();
        stage_file(&repo, "a.txt", b"hi\n");
        let oid = repo.commit("first").unwrap();
        assert_eq!(repo.resolve_oid("@").unwrap(), oid);
    }

    #[test]
    fn resolve_unknown_name_is_an_error() {
        let (_dir, repo) = init_repo();
        assert!(repo.resolve("no-such-branch").is_err());
    }

    #[test]
    fn resolve_finds_bare_name_under_refs_tags() {
        let (_dir, repo) = init_repo();
        stage_file(&repo, "a.txt", b"hi\n");
        let oid = repo.commit("first").unwrap();
        repo.refs().update_ref("refs/tags/v1", oid, false).unwrap();

        let resolved = repo.resolve("v1").unwrap();
        assert_eq!(resolved.oid(), oid);
        assert!(resolved.is_branch().is_none());
    }
}
