/// Opaque file content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// A blob's content is simply its raw bytes; parsing never fails.
    pub fn parse(content: &[u8]) -> Self {
        Self {
            data: content.to_vec(),
        }
    }

    pub fn serialize_content(&self) -> &[u8] {
        &self.data
    }
}
