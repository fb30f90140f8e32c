//! High-level SDK for MoFs.
//!
//! [`MoFs`] wires the blob store, file accessor, crypto engine, image
//! pipeline, and URI router together behind one observer, and exposes every
//! operation in blob-addressed form: inputs come from a path or a
//! [`BlobRef`], outputs that are bytes go back into the store as a new
//! [`BlobRef`].
//!
//! [`Bridge`] puts a JSON request/response surface on top, for hosts that
//! talk to MoFs across a language boundary.

pub mod bridge;
pub mod config;
pub mod constants;
pub mod encoding;
pub mod error;
pub mod mofs;
pub mod pending;

pub use bridge::{Bridge, BridgeError, Request, Response, StatResponse};
pub use config::MoFsConfig;
pub use constants::{Constants, Paths};
pub use encoding::BlobEncoding;
pub use error::{SdkError, SdkResult};
pub use mofs::{BlobSource, MoFs};
pub use pending::{Cancelled, PendingResult, PendingResults};

// Re-export key types
pub use mofs_crypto::{BlobInfo, CipherDirection};
pub use mofs_fs::ByteRange;
pub use mofs_image::{ImageEncoding, ImageSize, ResizeSpec, TransformSpec};
pub use mofs_provider::{OpenedResource, ResourceUri};
pub use mofs_store::{BlobStore, InMemoryBlobStore};
pub use mofs_types::{
    BlobId, BlobRef, Classify, ErrorKind, FileKind, FileStat, Observer, PermissionMode, TracingObserver,
    TwoTierPermissions,
};
