use bstr::{BStr, BString, ByteSlice};
use ugit_hash::ObjectId;

use crate::ObjectError;

/// The kind of object a tree entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Blob,
    Tree,
}

impl EntryKind {
    fn as_bytes(&self) -> &'static [u8] {
        match self {
            Self::Blob => b"blob",
            Self::Tree => b"tree",
        }
    }

    fn from_bytes(s: &[u8]) -> Result<Self, ObjectError> {
        match s {
            b"blob" => Ok(Self::Blob),
            b"tree" => Ok(Self::Tree),
            other => Err(ObjectError::InvalidTreeEntry {
                offset: 0,
                reason: format!("unknown entry kind '{}'", BStr::new(other)),
            }),
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
        })
    }
}

/// One entry of a directory snapshot: a name pointing at a blob or subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub kind: EntryKind,
    pub oid: ObjectId,
    pub name: BString,
}

/// A directory snapshot: an ordered, deduplicated sequence of entries.
///
/// Entries are always kept sorted by name (plain byte-lexicographic order,
/// not git's directory-gets-an-implicit-trailing-slash rule) so that
/// serializing a `Tree` is deterministic regardless of construction order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tree {
    pub entries: Vec<TreeEntry>,
}

fn validate_name(name: &[u8], offset: usize) -> Result<(), ObjectError> {
    if name.is_empty() {
        return Err(ObjectError::InvalidTreeEntry {
            offset,
            reason: "empty entry name".into(),
        });
    }
    if name.contains(&b'/') {
        return Err(ObjectError::InvalidTreeEntry {
            offset,
            reason: "entry name contains '/'".into(),
        });
    }
    if name == b"." || name == b".." {
        return Err(ObjectError::InvalidTreeEntry {
            offset,
            reason: "entry name is '.' or '..'".into(),
        });
    }
    Ok(())
}

impl Tree {
    /// Build a tree from entries, sorting by name and rejecting duplicates
    /// or malformed names.
    pub fn new(mut entries: Vec<TreeEntry>) -> Result<Self, ObjectError> {
        for e in &entries {
            validate_name(e.name.as_slice(), 0)?;
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        for w in entries.windows(2) {
            if w[0].name == w[1].name {
                return Err(ObjectError::InvalidTreeEntry {
                    offset: 0,
                    reason: format!("duplicate entry name '{}'", w[0].name),
                });
            }
        }
        Ok(Self { entries })
    }

    /// Parse from content bytes: one `"{kind} {oid} {name}\n"` line per entry.
    pub fn parse(content: &[u8]) -> Result<Self, ObjectError> {
        let mut entries = Vec::new();
        let mut offset = 0usize;
        for line in content.split(|&b| b == b'\n') {
            if line.is_empty() {
                offset += 1;
                continue;
            }
            let mut parts = line.splitn(3, |&b| b == b' ');
            let kind_bytes = parts.next().ok_or_else(|| ObjectError::InvalidTreeEntry {
                offset,
                reason: "missing kind".into(),
            })?;
            let oid_bytes = parts.next().ok_or_else(|| ObjectError::InvalidTreeEntry {
                offset,
                reason: "missing oid".into(),
            })?;
            let name_bytes = parts.next().ok_or_else(|| ObjectError::InvalidTreeEntry {
                offset,
                reason: "missing name".into(),
            })?;

            let kind = EntryKind::from_bytes(kind_bytes).map_err(|_| {
                ObjectError::InvalidTreeEntry {
                    offset,
                    reason: format!("unknown entry kind '{}'", BStr::new(kind_bytes)),
                }
            })?;
            let oid_hex = std::str::from_utf8(oid_bytes).map_err(|_| {
                ObjectError::InvalidTreeEntry {
                    offset,
                    reason: "non-UTF8 oid".into(),
                }
            })?;
            let oid = ObjectId::from_hex(oid_hex).map_err(|e| ObjectError::InvalidTreeEntry {
                offset,
                reason: e.to_string(),
            })?;
            validate_name(name_bytes, offset)?;

            entries.push(TreeEntry {
                kind,
                oid,
                name: BString::from(name_bytes),
            });
            offset += line.len() + 1;
        }

        for w in entries.windows(2) {
            if w[0].name >= w[1].name {
                return Err(ObjectError::InvalidTreeEntry {
                    offset: 0,
                    reason: "tree entries are not strictly sorted by name".into(),
                });
            }
        }

        Ok(Self { entries })
    }

    /// Serialize to `"{kind} {oid} {name}\n"` lines, already-sorted order.
    pub fn serialize_content(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for e in &self.entries {
            out.extend_from_slice(e.kind.as_bytes());
            out.push(b' ');
            out.extend_from_slice(e.oid.to_hex().as_bytes());
            out.push(b' ');
            out.extend_from_slice(e.name.as_slice());
            out.push(b'\n');
        }
        out
    }

    pub fn get(&self, name: &[u8]) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name.as_slice() == name)
    }
}
