//! The staging index: a mapping from normalized relative path to a blob OID.
//!
//! The index is the sole input to tree construction. Mutating it requires
//! scoped exclusive acquisition (modeled here with an in-process mutex, since
//! this crate does not guard against multiple processes touching the same
//! repository concurrently); the returned guard flushes its contents back to
//! disk on every exit path, normal or failing, via a destructor.

use std::collections::BTreeMap;
use std::fs;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, TryLockError};

use ugit_hash::{HashError, ObjectId};

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("index is already held by another scope in this process")]
    IndexBusy,

    #[error("corrupt index entry: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Hash(#[from] HashError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// path → blob OID. `BTreeMap` keeps iteration deterministic, which matters
/// for tree construction and tests, though the index's own invariants do not
/// depend on ordering.
pub type Entries = BTreeMap<String, ObjectId>;

/// The index file, guarded against concurrent in-process mutation.
pub struct IndexStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl IndexStore {
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    /// Acquire exclusive access to the index, loading its current contents.
    /// Fails with `IndexBusy` if another scope already holds it.
    pub fn acquire(&self) -> Result<IndexGuard<'_>, IndexError> {
        let guard = match self.lock.try_lock() {
            Ok(g) => g,
            Err(TryLockError::WouldBlock) => return Err(IndexError::IndexBusy),
            Err(TryLockError::Poisoned(p)) => p.into_inner(),
        };
        let entries = read_entries(&self.path)?;
        Ok(IndexGuard {
            _lock: guard,
            path: &self.path,
            entries,
        })
    }
}

fn read_entries(path: &Path) -> Result<Entries, IndexError> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Entries::new()),
        Err(e) => return Err(IndexError::Io(e)),
    };
    parse_entries(&bytes)
}

fn parse_entries(bytes: &[u8]) -> Result<Entries, IndexError> {
    let mut entries = Entries::new();
    for line in bytes.split(|&b| b == b'\n') {
        if line.is_empty() {
            continue;
        }
        let mut parts = line.splitn(2, |&b| b == b'\0');
        let path_bytes = parts
            .next()
            .ok_or_else(|| IndexError::Corrupt("missing path".into()))?;
        let oid_bytes = parts
            .next()
            .ok_or_else(|| IndexError::Corrupt("missing oid".into()))?;
        let path = std::str::from_utf8(path_bytes)
            .map_err(|_| IndexError::Corrupt("non-UTF8 path".into()))?
            .to_string();
        let oid_hex = std::str::from_utf8(oid_bytes)
            .map_err(|_| IndexError::Corrupt("non-UTF8 oid".into()))?;
        let oid = ObjectId::from_hex(oid_hex)?;
        entries.insert(path, oid);
    }
    Ok(entries)
}

fn serialize_entries(entries: &Entries) -> Vec<u8> {
    let mut out = Vec::new();
    for (path, oid) in entries {
        out.extend_from_slice(path.as_bytes());
        out.push(b'\0');
        out.extend_from_slice(oid.to_hex().as_bytes());
        out.push(b'\n');
    }
    out
}

/// Exclusive, scoped access to the index contents. Flushes to disk when
/// dropped, regardless of how the scope ends.
pub struct IndexGuard<'a> {
    _lock: std::sync::MutexGuard<'a, ()>,
    path: &'a Path,
    entries: Entries,
}

impl Deref for IndexGuard<'_> {
    type Target = Entries;
    fn deref(&self) -> &Entries {
        &self.entries
    }
}

impl DerefMut for IndexGuard<'_> {
    fn deref_mut(&mut self) -> &mut Entries {
        &mut self.entries
    }
}

impl Drop for IndexGuard<'_> {
    fn drop(&mut self) {
        let content = serialize_entries(&self.entries);
        let tmp_path = self.path.with_extension("tmp");
        if fs::write(&tmp_path, &content).is_ok() {
            let _ = fs::rename(&tmp_path, self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(n: u8) -> ObjectId {
        ObjectId::from_hex(&format!("{:02x}", n).repeat(20)).unwrap()
    }

    #[test]
    fn acquire_on_missing_file_yields_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        let store = IndexStore::open(dir.path().join("index"));
        let guard = store.acquire().unwrap();
        assert!(guard.is_empty());
    }

    #[test]
    fn mutation_flushes_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let index_path = dir.path().join("index");
        let store = IndexStore::open(&index_path);
        {
            let mut guard = store.acquire().unwrap();
            guard.insert("a.txt".to_string(), oid(1));
        }
        let guard = store.acquire().unwrap();
        assert_eq!(guard.get("a.txt"), Some(&oid(1)));
    }

    #[test]
    fn concurrent_acquire_in_same_process_fails_busy() {
        let dir = tempfile::tempdir().unwrap();
        let store = IndexStore::open(dir.path().join("index"));
        let _first = store.acquire().unwrap();
        let err = store.acquire().unwrap_err();
        assert!(matches!(err, IndexError::IndexBusy));
    }

    #[test]
    fn release_allows_reacquire() {
        let dir = tempfile::tempdir().unwrap();
        let store = IndexStore::open(dir.path().join("index"));
        {
            let _first = store.acquire().unwrap();
        }
        assert!(store.acquire().is_ok());
    }

    #[test]
    fn on_disk_format_is_path_nul_oid_lines() {
        let dir = tempfile::tempdir().unwrap();
        let index_path = dir.path().join("index");
        let store = IndexStore::open(&index_path);
        {
            let mut guard = store.acquire().unwrap();
            guard.insert("a.txt".to_string(), oid(1));
        }
        let raw = fs::read(&index_path).unwrap();
        let expected = format!("a.txt\0{}\n", oid(1));
        assert_eq!(raw, expected.as_bytes());
    }
}
