//! Object model: blob, tree, commit parsing and serialization.
//!
//! This crate provides Rust types for the three stored object kinds, their
//! parsing from raw bytes, serialization to canonical format, and the
//! `"{kind} {size}\0"` framing shared by the object store.

mod blob;
mod commit;
pub mod header;
mod tree;

pub use blob::Blob;
pub use commit::Commit;
pub use tree::{EntryKind, Tree, TreeEntry};

use bstr::BString;
use ugit_hash::{HashError, Hasher, ObjectId};

/// Errors produced by object parsing and serialization.
#[derive(Debug, thiserror::Error)]
pub enum ObjectError {
    #[error("invalid object kind: {0}")]
    InvalidType(BString),

    #[error("invalid object header: {0}")]
    InvalidHeader(String),

    #[error("truncated object: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("invalid tree entry at offset {offset}: {reason}")]
    InvalidTreeEntry { offset: usize, reason: String },

    #[error("invalid commit: missing '{field}' header")]
    MissingCommitField { field: &'static str },

    #[error(transparent)]
    Hash(#[from] HashError),
}

/// The kinds of object this store persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
}

impl ObjectType {
    pub fn from_bytes(s: &[u8]) -> Result<Self, ObjectError> {
        match s {
            b"blob" => Ok(Self::Blob),
            b"tree" => Ok(Self::Tree),
            b"commit" => Ok(Self::Commit),
            _ => Err(ObjectError::InvalidType(BString::from(s))),
        }
    }

    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            Self::Blob => b"blob",
            Self::Tree => b"tree",
            Self::Commit => b"commit",
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
        })
    }
}

impl std::str::FromStr for ObjectType {
    type Err = ObjectError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}

/// A parsed object of any kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
}

impl Object {
    /// Parse from raw bytes (header + content).
    pub fn parse(data: &[u8]) -> Result<Self, ObjectError> {
        let (kind, content_size, header_len) = header::parse_header(data)?;
        let content = &data[header_len..];
        if content.len() < content_size {
            return Err(ObjectError::Truncated {
                expected: content_size,
                actual: content.len(),
            });
        }
        Self::parse_content(kind, &content[..content_size])
    }

    /// Parse from content bytes with known kind (no header).
    pub fn parse_content(kind: ObjectType, content: &[u8]) -> Result<Self, ObjectError> {
        match kind {
            ObjectType::Blob => Ok(Self::Blob(Blob::parse(content))),
            ObjectType::Tree => Ok(Self::Tree(Tree::parse(content)?)),
            ObjectType::Commit => Ok(Self::Commit(Commit::parse(content)?)),
        }
    }

    pub fn serialize_content(&self) -> Vec<u8> {
        match self {
            Self::Blob(b) => b.serialize_content().to_vec(),
            Self::Tree(t) => t.serialize_content(),
            Self::Commit(c) => c.serialize_content(),
        }
    }

    /// Serialize to the on-disk framed form (header + content).
    pub fn serialize(&self) -> Vec<u8> {
        let content = self.serialize_content();
        let hdr = header::write_header(self.object_type(), content.len());
        let mut out = Vec::with_capacity(hdr.len() + content.len());
        out.extend_from_slice(&hdr);
        out.extend_from_slice(&content);
        out
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            Self::Blob(_) => ObjectType::Blob,
            Self::Tree(_) => ObjectType::Tree,
            Self::Commit(_) => ObjectType::Commit,
        }
    }

    /// Compute the OID by hashing the serialized form.
    pub fn compute_oid(&self) -> ObjectId {
        let content = self.serialize_content();
        let kind = std::str::from_utf8(self.object_type().as_bytes()).unwrap();
        Hasher::hash_object(kind, &content).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_type_from_bytes() {
        assert_eq!(ObjectType::from_bytes(b"blob").unwrap(), ObjectType::Blob);
        assert_eq!(ObjectType::from_bytes(b"tree").unwrap(), ObjectType::Tree);
        assert_eq!(
            ObjectType::from_bytes(b"commit").unwrap(),
            ObjectType::Commit
        );
        assert!(ObjectType::from_bytes(b"tag").is_err());
    }

    #[test]
    fn object_type_display_and_parse_roundtrip() {
        for ty in [ObjectType::Blob, ObjectType::Tree, ObjectType::Commit] {
            let s = ty.to_string();
            assert_eq!(s.parse::<ObjectType>().unwrap(), ty);
        }
    }

    #[test]
    fn blob_roundtrip_through_object() {
        let obj = Object::Blob(Blob::new(b"hello\n".to_vec()));
        let framed = obj.serialize();
        let parsed = Object::parse(&framed).unwrap();
        assert_eq!(parsed, obj);
    }

    #[test]
    fn compute_oid_matches_hasher_framing() {
        let obj = Object::Blob(Blob::new(b"hello\n".to_vec()));
        let oid = obj.compute_oid();
        let (expected, _) = Hasher::hash_object("blob", b"hello\n");
        assert_eq!(oid, expected);
    }
}
