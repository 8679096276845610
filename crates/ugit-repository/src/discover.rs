use std::path::{Path, PathBuf};

use crate::RepoError;

pub const METADATA_DIR_NAME: &str = ".ugit";

/// The resolved location of a repository: its working-tree root and its
/// `.ugit` metadata directory.
pub struct DiscoveredRoot {
    pub work_tree: PathBuf,
    pub ugit_dir: PathBuf,
}

/// `UGIT_DIR` mirrors the teacher's `GIT_DIR` override: it names the
/// metadata directory itself, not the working tree.
fn env_override() -> Option<PathBuf> {
    std::env::var_os("UGIT_DIR").map(PathBuf::from)
}

/// Walk upward from `start` looking for a `.ugit` directory, the way the
/// teacher's `discover_git_dir` walks looking for `.git`.
pub fn discover(start: impl AsRef<Path>) -> Result<DiscoveredRoot, RepoError> {
    if let Some(ugit_dir) = env_override() {
        let work_tree = ugit_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        return Ok(DiscoveredRoot { work_tree, ugit_dir });
    }

    let start = start.as_ref();
    let start = std::fs::canonicalize(start).map_err(|_| RepoError::NotFound(start.to_path_buf()))?;

    let mut current = start.clone();
    loop {
        let candidate = current.join(METADATA_DIR_NAME);
        if candidate.is_dir() {
            return Ok(DiscoveredRoot {
                work_tree: current,
                ugit_dir: candidate,
            });
        }
        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => return Err(RepoError::NotFound(start)),
        }
    }
}

/// Open a repository whose `.ugit` directory is already known to exist at
/// `path/.ugit`.
pub fn open(path: impl AsRef<Path>) -> Result<DiscoveredRoot, RepoError> {
    if let Some(ugit_dir) = env_override() {
        let work_tree = ugit_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        return Ok(DiscoveredRoot { work_tree, ugit_dir });
    }

    let path = path.as_ref();
    let ugit_dir = path.join(METADATA_DIR_NAME);
    if !ugit_dir.is_dir() {
        return Err(RepoError::NotFound(path.to_path_buf()));
    }
    Ok(DiscoveredRoot {
        work_tree: path.to_path_buf(),
        ugit_dir,
    })
}
