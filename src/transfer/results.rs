//! Transfer result types
//!
//! Defines the payload produced by reading a source file.

/// A source file ready to be framed for upload
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub display_path: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    /// Payload length declared in the `file` header
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
