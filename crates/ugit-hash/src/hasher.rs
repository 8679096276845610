use digest::Digest;

use crate::ObjectId;

/// Streaming SHA-1 computation.
///
/// Data can be fed incrementally with [`update`](Hasher::update) or through
/// the [`std::io::Write`] implementation, then finalized into an
/// [`ObjectId`].
pub struct Hasher {
    inner: sha1::Sha1,
}

impl Hasher {
    pub fn new() -> Self {
        Self {
            inner: sha1::Sha1::new(),
        }
    }

    /// Feed data into the hasher.
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Finalize and return the ObjectId.
    pub fn finalize(self) -> ObjectId {
        let result = self.inner.finalize();
        ObjectId::from_bytes(&result).expect("sha1 digest is always 20 bytes")
    }

    /// Convenience: hash data in one call.
    pub fn digest(data: &[u8]) -> ObjectId {
        let mut h = Self::new();
        h.update(data);
        h.finalize()
    }

    /// Hash a framed object: `"{kind} {len}\0{body}"`.
    pub fn hash_object(kind: &str, body: &[u8]) -> (ObjectId, Vec<u8>) {
        let header = format!("{} {}\0", kind, body.len());
        let mut framed = Vec::with_capacity(header.len() + body.len());
        framed.extend_from_slice(header.as_bytes());
        framed.extend_from_slice(body);
        (Self::digest(&framed), framed)
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::io::Write for Hasher {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_digest_is_well_known() {
        let oid = Hasher::digest(b"");
        assert_eq!(oid.to_hex(), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }

    #[test]
    fn incremental_matches_one_shot() {
        let mut h = Hasher::new();
        h.update(b"hello ");
        h.update(b"world");
        let incremental = h.finalize();
        let one_shot = Hasher::digest(b"hello world");
        assert_eq!(incremental, one_shot);
    }

    #[test]
    fn hash_object_frames_kind_and_length() {
        let (oid, framed) = Hasher::hash_object("blob", b"hello\n");
        assert_eq!(framed, b"blob 6\0hello\n");
        assert_eq!(oid, Hasher::digest(b"blob 6\0hello\n"));
    }

    #[test]
    fn write_impl_feeds_hasher() {
        use std::io::Write;
        let mut h = Hasher::new();
        write!(h, "hello").unwrap();
        assert_eq!(h.finalize(), Hasher::digest(b"hello"));
    }
}
