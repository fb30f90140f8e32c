use mofs_types::{Classify, ErrorKind};
use thiserror::Error;

/// Errors from digest, MAC, and cipher operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("unknown {family} algorithm: {name:?}")]
    UnknownAlgorithm { family: &'static str, name: String },

    /// Key material could not be loaded for the algorithm.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("invalid key length {0}: expected 16, 24, or 32 bytes")]
    InvalidKeyLength(usize),

    #[error("invalid IV length {0}: expected 16 bytes")]
    InvalidIvLength(usize),

    /// Decryption produced bad padding or the input is not block aligned.
    #[error("decryption failed: bad padding or truncated ciphertext")]
    BadPadding,
}

impl Classify for CryptoError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownAlgorithm { .. } => ErrorKind::UnknownAlgorithm,
            Self::InvalidKey(_) => ErrorKind::InvalidKey,
            Self::InvalidKeyLength(_) | Self::InvalidIvLength(_) | Self::BadPadding => {
                ErrorKind::CryptoFailure
            }
        }
    }
}

/// Result alias for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;
