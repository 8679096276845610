use std::path::PathBuf;

/// Errors from repository-level operations.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("not a ugit repository (or any parent directory): {0}")]
    NotFound(PathBuf),

    #[error("'{0}' is not a known name, branch, tag, or object id")]
    UnknownName(String),

    #[error("HEAD does not point at a commit yet")]
    NoHead,

    #[error(transparent)]
    Hash(#[from] ugit_hash::HashError),

    #[error(transparent)]
    Odb(#[from] ugit_odb::OdbError),

    #[error(transparent)]
    Object(#[from] ugit_object::ObjectError),

    #[error(transparent)]
    Ref(#[from] ugit_ref::RefError),

    #[error(transparent)]
    Index(#[from] ugit_index::IndexError),

    #[error(transparent)]
    Tree(#[from] ugit_tree::TreeError),

    #[error(transparent)]
    Worktree(#[from] ugit_worktree::WorktreeError),

    #[error(transparent)]
    Revwalk(#[from] ugit_revwalk::RevwalkError),

    #[error(transparent)]
    Merge(#[from] ugit_merge::MergeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
