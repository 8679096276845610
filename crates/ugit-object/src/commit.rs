use bstr::BString;
use ugit_hash::ObjectId;

use crate::ObjectError;

/// A node of the history DAG.
///
/// Unlike the upstream git object, commits here carry no author/committer
/// signatures — just a tree, its parents, and a free-form message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub tree: ObjectId,
    pub parents: Vec<ObjectId>,
    pub message: BString,
}

impl Commit {
    pub fn new(tree: ObjectId, parents: Vec<ObjectId>, message: impl Into<BString>) -> Self {
        Self {
            tree,
            parents,
            message: message.into(),
        }
    }

    /// Parse `"tree {oid}\n"` followed by 0-2 `"parent {oid}\n"` lines, a
    /// blank line, then the message body.
    pub fn parse(content: &[u8]) -> Result<Self, ObjectError> {
        let mut lines = content.split(|&b| b == b'\n');

        let tree_line = lines
            .next()
            .ok_or(ObjectError::MissingCommitField { field: "tree" })?;
        let tree_hex = tree_line
            .strip_prefix(b"tree ")
            .ok_or(ObjectError::MissingCommitField { field: "tree" })?;
        let tree = ObjectId::from_hex(
            std::str::from_utf8(tree_hex)
                .map_err(|_| ObjectError::MissingCommitField { field: "tree" })?,
        )
        .map_err(ObjectError::from)?;

        let mut parents = Vec::new();
        let mut consumed_header_bytes = tree_line.len() + 1;
        let mut rest_lines = lines;
        loop {
            let line = match rest_lines.next() {
                Some(l) => l,
                None => break,
            };
            if line.is_empty() {
                consumed_header_bytes += 1;
                break;
            }
            let Some(parent_hex) = line.strip_prefix(b"parent ") else {
                return Err(ObjectError::InvalidHeader(
                    "expected 'parent' or blank line".into(),
                ));
            };
            let parent = ObjectId::from_hex(
                std::str::from_utf8(parent_hex)
                    .map_err(|_| ObjectError::MissingCommitField { field: "parent" })?,
            )
            .map_err(ObjectError::from)?;
            parents.push(parent);
            consumed_header_bytes += line.len() + 1;
        }

        if parents.len() > 2 {
            return Err(ObjectError::InvalidHeader(
                "commit has more than two parents".into(),
            ));
        }

        let message = content
            .get(consumed_header_bytes..)
            .unwrap_or_default()
            .to_vec();

        Ok(Self {
            tree,
            parents,
            message: BString::from(message),
        })
    }

    pub fn serialize_content(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"tree ");
        out.extend_from_slice(self.tree.to_hex().as_bytes());
        out.push(b'\n');
        for parent in &self.parents {
            out.extend_from_slice(b"parent ");
            out.extend_from_slice(parent.to_hex().as_bytes());
            out.push(b'\n');
        }
        out.push(b'\n');
        out.extend_from_slice(&self.message);
        out
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() == 2
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}
