use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// RAII lock file guard. Creates a `.lock` file on construction, atomically
/// renames on commit, removes on drop if not committed.
///
/// Matches the classic git lock file protocol: create `<path>.lock` with
/// O_CREAT|O_EXCL, write the new contents, sync and rename on commit, and
/// remove the lock file on drop if it was never committed.
pub struct LockFile {
    path: PathBuf,
    lock_path: PathBuf,
    file: Option<File>,
    committed: bool,
}

impl LockFile {
    pub fn acquire(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let lock_path = PathBuf::from(format!("{}.lock", path.display()));

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)?;

        Ok(Self {
            path,
            lock_path,
            file: Some(file),
            committed: false,
        })
    }

    pub fn commit(mut self) -> io::Result<()> {
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
            file.sync_all()?;
        }
        self.file.take();
        fs::rename(&self.lock_path, &self.path)?;
        self.committed = true;
        Ok(())
    }
}

impl Write for LockFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::other("lock file already closed"))?
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::other("lock file already closed"))?
            .flush()
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        if !self.committed {
            self.file.take();
            let _ = fs::remove_file(&self.lock_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_and_commit() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("test.txt");
        fs::write(&target, b"old content").unwrap();

        let mut lock = LockFile::acquire(&target).unwrap();
        assert!(lock.lock_path.exists());
        lock.write_all(b"new content").unwrap();
        lock.commit().unwrap();

        assert!(!dir.path().join("test.txt.lock").exists());
        assert_eq!(fs::read_to_string(&target).unwrap(), "new content");
    }

    #[test]
    fn drop_without_commit_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("test.txt");
        fs::write(&target, b"original").unwrap();

        {
            let mut lock = LockFile::acquire(&target).unwrap();
            lock.write_all(b"dropped content").unwrap();
        }

        assert!(!dir.path().join("test.txt.lock").exists());
        assert_eq!(fs::read_to_string(&target).unwrap(), "original");
    }

    #[test]
    fn double_acquire_fails() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("test.txt");
        fs::write(&target, b"content").unwrap();

        let _lock1 = LockFile::acquire(&target).unwrap();
        let err = LockFile::acquire(&target).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
    }
}
