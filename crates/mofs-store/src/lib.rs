//! Blob store contract for MoFs.
//!
//! The blob store is an opaque key-to-bytes registry. The I/O and transform
//! layer only ever calls [`BlobStore::resolve`] and [`BlobStore::store`]; how
//! long a blob lives is the store's business.
//!
//! # Backends
//!
//! - [`InMemoryBlobStore`] -- `HashMap`-based, content-addressed, with
//!   reference-counted lifetime. Used by tests, the CLI, and embedders that
//!   have no blob registry of their own.
//!
//! # Rules
//!
//! 1. An id returned by `store` resolves to the same bytes until the store
//!    itself evicts it.
//! 2. The store never interprets blob contents.
//! 3. A reference whose range exceeds the stored bytes does not resolve.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryBlobStore;
pub use traits::BlobStore;
