use crate::ObjectError;

/// A git blob: opaque file content with no header fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }

    /// Parse blob content. A blob is simply its raw bytes.
    pub fn parse(content: &[u8]) -> Result<Self, ObjectError> {
        Ok(Self {
            data: content.to_vec(),
        })
    }

    /// Serialize: blob content is just the raw data.
    pub fn serialize_content(&self) -> &[u8] {
        &self.data
    }
}
