use std::fmt;

use serde::{Deserialize, Serialize};

/// MIME type attached to blobs whose content type is unknown.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Opaque identifier of a blob in a blob store.
///
/// Callers must treat the string as opaque. The in-memory store derives it
/// from the BLAKE3 hash of the content, so identical bytes map to the same
/// id, but other stores are free to use any scheme.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobId(String);

impl BlobId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Content-addressed id: hex-encoded BLAKE3 hash of `data`.
    pub fn from_content(data: &[u8]) -> Self {
        Self(hex::encode(blake3::hash(data).as_bytes()))
    }

    /// The raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short representation (first 8 characters).
    pub fn short(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }

    /// Returns `true` for the empty id, which never resolves.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlobId({})", self.short())
    }
}

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BlobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Reference to a contiguous slice of a stored blob.
///
/// References produced by this layer always have `offset == 0` and cover the
/// whole blob. References coming from callers may address a sub-slice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobRef {
    /// Identifier in the blob store.
    #[serde(rename = "blobId")]
    pub id: BlobId,
    /// Number of bytes addressed.
    pub size: u64,
    /// Start of the slice inside the stored blob.
    #[serde(default)]
    pub offset: u64,
    /// Declared name (usually the originating path).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Declared MIME type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl BlobRef {
    /// Reference covering a whole freshly stored blob.
    pub fn new(id: BlobId, size: u64) -> Self {
        Self {
            id,
            size,
            offset: 0,
            name: None,
            mime_type: None,
        }
    }

    /// Attach a declared name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach a declared MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Address `size` bytes starting at `offset` of the same stored blob.
    ///
    /// An offset past `u64::MAX` saturates, so the result never resolves.
    pub fn slice(&self, offset: u64, size: u64) -> Self {
        Self {
            id: self.id.clone(),
            size,
            offset: self.offset.saturating_add(offset),
            name: self.name.clone(),
            mime_type: self.mime_type.clone(),
        }
    }

    /// One past the last addressed byte, or `None` if that overflows.
    pub fn end(&self) -> Option<u64> {
        self.offset.checked_add(self.size)
    }
}

impl fmt::Display for BlobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end() {
            Some(end) => write!(f, "blob:{}[{}..{}]", self.id.short(), self.offset, end),
            None => write!(f, "blob:{}[{}+{}]", self.id.short(), self.offset, self.size),
        }
    }
}
