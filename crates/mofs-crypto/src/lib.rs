//! Digest, keyed MAC, and symmetric cipher primitives for MoFs.
//!
//! Everything here operates on plain byte slices; resolving blobs into bytes
//! and storing results happens one layer up. Algorithms are selected by name
//! through the [`FromStr`](std::str::FromStr) impls on the algorithm enums, so
//! an unknown name is a typed [`CryptoError::UnknownAlgorithm`] rather than a
//! generic failure.
//!
//! All primitives wrap the RustCrypto crates. No custom cryptography.

pub mod algorithm;
pub mod cipher;
pub mod digest;
pub mod engine;
pub mod error;
pub mod info;

pub use algorithm::{CipherAlgorithm, CipherDirection, DigestAlgorithm, MacAlgorithm};
pub use cipher::{cipher, AES_BLOCK_LEN};
pub use digest::{digest, hmac};
pub use engine::CryptoEngine;
pub use error::{CryptoError, CryptoResult};
pub use info::BlobInfo;
