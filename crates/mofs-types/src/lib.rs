//! Foundation types for MoFs.
//!
//! This crate provides the shared vocabulary of the blob-addressed I/O layer.
//! Every other MoFs crate depends on `mofs-types`.
//!
//! # Key Types
//!
//! - [`BlobId`]: Opaque identifier handed out by a blob store
//! - [`BlobRef`]: A reference to a (slice of a) stored blob
//! - [`ErrorKind`]: The typed failure taxonomy surfaced to callers
//! - [`FileStat`] / [`FileKind`]: File metadata
//! - [`PermissionMode`] / [`TwoTierPermissions`]: POSIX mode and its lossy
//!   owner/other projection
//! - [`Observer`]: Injected per-component operation observer

pub mod blob;
pub mod error;
pub mod fs;
pub mod observer;

pub use blob::{BlobId, BlobRef, OCTET_STREAM};
pub use error::{Classify, ErrorKind, TypeError};
pub use fs::{FileKind, FileStat, PermissionMode, PermissionTier, TwoTierPermissions};
pub use observer::{
    NoopObserver, Observer, OpEvent, OpOutcome, OpTimer, RecordingObserver, TracingObserver,
};
