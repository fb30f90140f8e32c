use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A request addressing a contiguous slice of a file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteRange {
    pub path: PathBuf,
    /// Start of the range. Negative values count from the end of the file.
    #[serde(default)]
    pub offset: i64,
    /// Number of bytes; defaults to the rest of the file for reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// For writes: cut the file at the end of the written range.
    #[serde(default)]
    pub truncate: bool,
}

impl ByteRange {
    /// The whole file.
    pub fn whole(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            offset: 0,
            size: None,
            truncate: false,
        }
    }

    pub fn at(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn truncating(mut self) -> Self {
        self.truncate = true;
        self
    }
}

/// Resolve a possibly negative offset against a file of `len` bytes.
///
/// Non-negative offsets are returned as is. A negative offset resolves to
/// `len + offset + 1`, so `-1` addresses the position *after* the last byte
/// (equal to `len`), not the last byte itself. Existing callers depend on
/// this rule; it must not be "corrected" to `len + offset`.
///
/// Returns `None` when the result would fall before the start of the file.
pub fn resolve_offset(offset: i64, len: u64) -> Option<u64> {
    if offset >= 0 {
        return Some(offset as u64);
    }
    let resolved = len as i128 + offset as i128 + 1;
    u64::try_from(resolved).ok()
}
