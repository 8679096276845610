//! Reference namespace: named pointers to objects, with one level of
//! symbolic indirection.
//!
//! References live as individual files under the repository metadata
//! directory (`HEAD`, `refs/heads/...`, `refs/tags/...`, `refs/remote/...`).
//! A loose ref file holds either 40 hex characters (a direct OID) or the
//! ASCII bytes `"ref: {target}"` (a symbolic ref).

mod lockfile;

use std::fs;
use std::path::{Path, PathBuf};

use lockfile::LockFile;
use ugit_hash::{HashError, ObjectId};

/// Maximum number of symbolic hops `get_ref`/`update_ref` will follow before
/// giving up and reporting a cycle.
pub const MAX_DEREF_DEPTH: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum RefError {
    #[error("ref not found: {0}")]
    NotFound(String),

    #[error("bad ref '{name}': {reason}")]
    BadRef { name: String, reason: String },

    #[error(transparent)]
    Hash(#[from] HashError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The value stored at a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefValue {
    Direct(ObjectId),
    Symbolic(String),
}

/// The reference namespace rooted at a repository's metadata directory.
pub struct RefStore {
    root: PathBuf,
}

impl RefStore {
    /// Open the reference store rooted at `root` (the `.ugit` directory).
    pub fn open(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn ref_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn read_raw(&self, name: &str) -> Result<Option<RefValue>, RefError> {
        let path = self.ref_path(name);
        let contents = match fs::read(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(RefError::Io(e)),
        };
        let text = std::str::from_utf8(&contents)
            .map_err(|_| RefError::BadRef {
                name: name.to_string(),
                reason: "non-UTF8 ref contents".into(),
            })?
            .trim_end_matches('\n');

        if let Some(target) = text.strip_prefix("ref: ") {
            Ok(Some(RefValue::Symbolic(target.trim().to_string())))
        } else {
            let oid = ObjectId::from_hex(text)?;
            Ok(Some(RefValue::Direct(oid)))
        }
    }

    fn write_raw(&self, name: &str, value: &RefValue) -> Result<(), RefError> {
        let path = self.ref_path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = match value {
            RefValue::Direct(oid) => format!("{}\n", oid.to_hex()),
            RefValue::Symbolic(target) => format!("ref: {target}\n"),
        };
        let mut lock = LockFile::acquire(&path)?;
        std::io::Write::write_all(&mut lock, content.as_bytes())?;
        lock.commit()?;
        tracing::debug!(name, "wrote ref");
        Ok(())
    }

    /// Get the raw stored value of `name` without following symbolic hops.
    pub fn get_ref_raw(&self, name: &str) -> Result<Option<RefValue>, RefError> {
        self.read_raw(name)
    }

    /// Resolve `name` to its value, following symbolic hops if `deref` is
    /// set. Returns `Ok(None)` if the ref does not exist (or dereferences
    /// to an unset target).
    pub fn get_ref(&self, name: &str, deref: bool) -> Result<Option<RefValue>, RefError> {
        let mut current = name.to_string();
        let mut hops = 0;
        loop {
            let value = self.read_raw(&current)?;
            match value {
                None => return Ok(None),
                Some(RefValue::Direct(oid)) => return Ok(Some(RefValue::Direct(oid))),
                Some(RefValue::Symbolic(target)) => {
                    if !deref {
                        return Ok(Some(RefValue::Symbolic(target)));
                    }
                    hops += 1;
                    if hops > MAX_DEREF_DEPTH {
                        return Err(RefError::BadRef {
                            name: name.to_string(),
                            reason: "symbolic ref cycle or excessive indirection".into(),
                        });
                    }
                    current = target;
                }
            }
        }
    }

    /// Resolve `name` directly to an OID, or `Ok(None)` if unset.
    pub fn get_oid(&self, name: &str) -> Result<Option<ObjectId>, RefError> {
        Ok(self.get_ref(name, true)?.map(|v| match v {
            RefValue::Direct(oid) => oid,
            RefValue::Symbolic(_) => unreachable!("get_ref(deref=true) never returns Symbolic"),
        }))
    }

    /// Set `name` to `value`. If `deref` and the existing value at `name`
    /// is symbolic, follow one hop and update the target instead.
    pub fn update_ref(&self, name: &str, value: ObjectId, deref: bool) -> Result<(), RefError> {
        let target = if deref {
            match self.read_raw(name)? {
                Some(RefValue::Symbolic(target)) => target,
                _ => name.to_string(),
            }
        } else {
            name.to_string()
        };
        self.write_raw(&target, &RefValue::Direct(value))
    }

    /// Set `name` as a symbolic ref pointing at `target`.
    pub fn set_symbolic(&self, name: &str, target: &str) -> Result<(), RefError> {
        self.write_raw(name, &RefValue::Symbolic(target.to_string()))
    }

    /// Delete `name`, optionally following one symbolic hop first.
    pub fn delete_ref(&self, name: &str, deref: bool) -> Result<(), RefError> {
        let target = if deref {
            match self.read_raw(name)? {
                Some(RefValue::Symbolic(target)) => target,
                _ => name.to_string(),
            }
        } else {
            name.to_string()
        };
        let path = self.ref_path(&target);
        if path.exists() {
            fs::remove_file(&path)?;
            self.cleanup_empty_parents(&path);
        }
        Ok(())
    }

    fn cleanup_empty_parents(&self, path: &Path) {
        let mut dir = path.parent().map(|p| p.to_path_buf());
        while let Some(d) = dir {
            if d == self.root {
                break;
            }
            let is_empty = d
                .read_dir()
                .map(|mut entries| entries.next().is_none())
                .unwrap_or(false);
            if is_empty {
                let _ = fs::remove_dir(&d);
                dir = d.parent().map(|p| p.to_path_buf());
            } else {
                break;
            }
        }
    }

    /// Enumerate every ref whose fully-qualified name begins with `prefix`,
    /// dereferenced to a direct value, sorted by name.
    pub fn iter_refs(&self, prefix: &str) -> Result<Vec<(String, ObjectId)>, RefError> {
        let mut out = Vec::new();
        let search_root = self.ref_path(prefix);
        if search_root.is_dir() {
            self.collect_recursive(&search_root, &mut out)?;
        } else if search_root.is_file() {
            if let Some(RefValue::Direct(oid)) = self.read_raw(prefix)? {
                out.push((prefix.to_string(), oid));
            }
        }
        out.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(out)
    }

    fn collect_recursive(
        &self,
        dir: &Path,
        out: &mut Vec<(String, ObjectId)>,
    ) -> Result<(), RefError> {
        let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<Result<_, _>>()?;
        entries.sort_by_key(|e| e.file_name());
        for entry in entries {
            let path = entry.path();
            if path.is_dir() {
                self.collect_recursive(&path, out)?;
            } else {
                let name = path
                    .strip_prefix(&self.root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/");
                if let Some(oid) = self.get_oid(&name)? {
                    out.push((name, oid));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(n: u8) -> ObjectId {
        ObjectId::from_hex(&format!("{:02x}", n).repeat(20)).unwrap()
    }

    #[test]
    fn direct_ref_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = RefStore::open(dir.path());
        store.update_ref("refs/heads/main", oid(1), true).unwrap();
        assert_eq!(store.get_oid("refs/heads/main").unwrap(), Some(oid(1)));
    }

    #[test]
    fn symbolic_ref_dereferences() {
        let dir = tempfile::tempdir().unwrap();
        let store = RefStore::open(dir.path());
        store.update_ref("refs/heads/main", oid(1), true).unwrap();
        store.set_symbolic("HEAD", "refs/heads/main").unwrap();
        assert_eq!(store.get_oid("HEAD").unwrap(), Some(oid(1)));
    }

    #[test]
    fn update_through_symbolic_head_moves_branch() {
        let dir = tempfile::tempdir().unwrap();
        let store = RefStore::open(dir.path());
        store.update_ref("refs/heads/main", oid(1), true).unwrap();
        store.set_symbolic("HEAD", "refs/heads/main").unwrap();
        store.update_ref("HEAD", oid(2), true).unwrap();
        assert_eq!(store.get_oid("refs/heads/main").unwrap(), Some(oid(2)));
        assert_eq!(store.get_oid("HEAD").unwrap(), Some(oid(2)));
    }

    #[test]
    fn detached_update_does_not_follow_symbolic() {
        let dir = tempfile::tempdir().unwrap();
        let store = RefStore::open(dir.path());
        store.update_ref("refs/heads/main", oid(1), true).unwrap();
        store.set_symbolic("HEAD", "refs/heads/main").unwrap();
        store.update_ref("HEAD", oid(2), false).unwrap();
        assert_eq!(store.get_oid("refs/heads/main").unwrap(), Some(oid(1)));
        assert_eq!(store.get_oid("HEAD").unwrap(), Some(oid(2)));
    }

    #[test]
    fn missing_ref_resolves_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = RefStore::open(dir.path());
        assert_eq!(store.get_oid("refs/heads/nope").unwrap(), None);
    }

    #[test]
    fn cyclical_symbolic_refs_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = RefStore::open(dir.path());
        store.set_symbolic("refs/a", "refs/b").unwrap();
        store.set_symbolic("refs/b", "refs/a").unwrap();
        let err = store.get_ref("refs/a", true).unwrap_err();
        assert!(matches!(err, RefError::BadRef { .. }));
    }

    #[test]
    fn delete_ref_cleans_up_empty_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = RefStore::open(dir.path());
        store.update_ref("refs/heads/topic", oid(1), true).unwrap();
        store.delete_ref("refs/heads/topic", false).unwrap();
        assert!(!dir.path().join("refs/heads").exists());
        assert_eq!(store.get_oid("refs/heads/topic").unwrap(), None);
    }

    #[test]
    fn iter_refs_returns_sorted_direct_values() {
        let dir = tempfile::tempdir().unwrap();
        let store = RefStore::open(dir.path());
        store.update_ref("refs/heads/zeta", oid(1), true).unwrap();
        store.update_ref("refs/heads/alpha", oid(2), true).unwrap();
        let refs = store.iter_refs("refs/heads").unwrap();
        assert_eq!(
            refs,
            vec![
                ("refs/heads/alpha".to_string(), oid(2)),
                ("refs/heads/zeta".to_string(), oid(1)),
            ]
        );
    }
}
