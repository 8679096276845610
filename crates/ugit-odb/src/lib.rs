//! Content-addressed object storage.
//!
//! Each object lives at `.ugit/objects/XX/YYYY...` where `XX` is the first
//! byte of the OID in hex and `YYYY...` is the rest. The file content is
//! the uncompressed framed record `"<kind> <size>\0<content>"` — no
//! compression layer, so objects can be inspected directly on disk.

use std::fs;
use std::path::{Path, PathBuf};

use ugit_hash::{Hasher, ObjectId};
use ugit_object::{header, Object, ObjectType};

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum OdbError {
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    #[error("object {oid} has kind {actual}, expected {expected}")]
    KindMismatch {
        oid: ObjectId,
        expected: ObjectType,
        actual: ObjectType,
    },

    #[error("corrupt object {oid}: {reason}")]
    Corrupt { oid: ObjectId, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Object(#[from] ugit_object::ObjectError),
}

/// The on-disk object store rooted at `.ugit/objects`.
pub struct ObjectStore {
    objects_dir: PathBuf,
}

impl ObjectStore {
    /// Open the object store at the given path, creating the directory if
    /// it does not yet exist.
    pub fn open(objects_dir: impl AsRef<Path>) -> Result<Self, OdbError> {
        let objects_dir = objects_dir.as_ref().to_path_buf();
        fs::create_dir_all(&objects_dir)?;
        Ok(Self { objects_dir })
    }

    pub fn object_path(&self, oid: &ObjectId) -> PathBuf {
        self.objects_dir.join(oid.loose_path())
    }

    pub fn object_exists(&self, oid: &ObjectId) -> bool {
        self.object_path(oid).is_file()
    }

    /// Hash and persist `body` as an object of kind `kind`. Returns the OID.
    ///
    /// Idempotent: writing the same `(kind, body)` twice leaves the store
    /// unchanged and returns the same OID both times.
    pub fn hash_object(&self, kind: ObjectType, body: &[u8]) -> Result<ObjectId, OdbError> {
        let (oid, framed) =
            Hasher::hash_object(std::str::from_utf8(kind.as_bytes()).unwrap(), body);

        if self.object_exists(&oid) {
            return Ok(oid);
        }

        let final_path = self.object_path(&oid);
        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.write_to_temp(&framed)?;
        self.finalize_object(&tmp_path, &final_path)?;

        tracing::debug!(oid = %oid, kind = %kind, "wrote object");
        Ok(oid)
    }

    pub fn write_object(&self, obj: &Object) -> Result<ObjectId, OdbError> {
        self.hash_object(obj.object_type(), &obj.serialize_content())
    }

    /// Read the framed bytes for `oid` and return its unframed body,
    /// optionally verifying its declared kind.
    pub fn get_object(
        &self,
        oid: &ObjectId,
        expected_kind: Option<ObjectType>,
    ) -> Result<Vec<u8>, OdbError> {
        let path = self.object_path(oid);
        let framed = fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                OdbError::NotFound(*oid)
            } else {
                OdbError::Io(e)
            }
        })?;
        let (kind, size, header_len) = header::parse_header(&framed)?;
        if let Some(expected) = expected_kind {
            if kind != expected {
                return Err(OdbError::KindMismatch {
                    oid: *oid,
                    expected,
                    actual: kind,
                });
            }
        }
        let body = &framed[header_len..];
        if body.len() != size {
            return Err(OdbError::Corrupt {
                oid: *oid,
                reason: format!("declared size {size}, found {}", body.len()),
            });
        }
        Ok(body.to_vec())
    }

    pub fn read_object(&self, oid: &ObjectId) -> Result<Object, OdbError> {
        let path = self.object_path(oid);
        let framed = fs::read(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                OdbError::NotFound(*oid)
            } else {
                OdbError::Io(e)
            }
        })?;
        Ok(Object::parse(&framed)?)
    }

    /// Copy `oid` from `self` into `dest` if `dest` doesn't already have it.
    pub fn push_object(&self, oid: &ObjectId, dest: &ObjectStore) -> Result<(), OdbError> {
        if dest.object_exists(oid) {
            return Ok(());
        }
        let framed = fs::read(self.object_path(oid))?;
        let final_path = dest.object_path(oid);
        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = dest.write_to_temp(&framed)?;
        dest.finalize_object(&tmp_path, &final_path)?;
        Ok(())
    }

    /// Copy `oid` from `src` into `self` if `self` doesn't already have it.
    pub fn fetch_object_if_missing(&self, oid: &ObjectId, src: &ObjectStore) -> Result<(), OdbError> {
        src.push_object(oid, self)
    }

    fn write_to_temp(&self, framed: &[u8]) -> Result<PathBuf, OdbError> {
        let tmp_path = self.objects_dir.join(format!(
            "tmp_obj_{}_{}",
            std::process::id(),
            framed.len()
        ));
        fs::write(&tmp_path, framed)?;
        Ok(tmp_path)
    }

    /// Atomically move a temp file to its final destination.
    ///
    /// If the destination already exists (race with another writer), the
    /// temp file is removed and the write is treated as successful —
    /// content-addressed writes are idempotent by construction.
    fn finalize_object(&self, tmp: &Path, final_path: &Path) -> Result<(), OdbError> {
        match fs::rename(tmp, final_path) {
            Ok(()) => Ok(()),
            Err(_) if final_path.exists() => {
                let _ = fs::remove_file(tmp);
                Ok(())
            }
            Err(e) => {
                let _ = fs::remove_file(tmp);
                Err(OdbError::Io(e))
            }
        }
    }
}
