//! Byte-range file access for MoFs.
//!
//! Reads and writes arbitrary byte ranges of named files. Offsets may be
//! negative, in which case they are resolved against the current file length
//! (see [`range::resolve_offset`] for the exact, deliberately preserved rule).
//!
//! A write at offset 0 with `truncate` set is an atomic replace: the new
//! content goes to a temporary file in the destination directory, is synced,
//! and is renamed over the destination. Readers observe either the old or the
//! new file, never a mix. Every other write happens in place with no rollback.
//!
//! Paths are not confined to any sandbox here; the embedding application is
//! responsible for that.

pub mod accessor;
pub mod atomic;
pub mod error;
pub mod range;

pub use accessor::FileAccessor;
pub use atomic::atomic_replace;
pub use error::{FsError, FsResult};
pub use range::{resolve_offset, ByteRange};
