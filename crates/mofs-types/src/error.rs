use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure taxonomy surfaced to callers.
///
/// Every crate-level error maps onto exactly one kind, so a caller on the far
/// side of the call bridge can branch on it without parsing messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Missing path, blob, or resource.
    NotFound,
    /// Fewer bytes were available than requested.
    IncompleteRead,
    /// Any other OS-level I/O error.
    #[serde(rename = "IOFailure")]
    IoFailure,
    DeleteFailure,
    RenameFailure,
    MkdirFailure,
    /// Bytes could not be decoded as an image.
    NotAnImage,
    /// Algorithm name not recognized by the crypto engine.
    UnknownAlgorithm,
    /// Key material could not be loaded for the algorithm.
    InvalidKey,
    /// Bad padding, bad key/IV length, or another cipher failure.
    CryptoFailure,
    /// Resource requested in a mode other than read.
    UnsupportedMode,
    /// Directory listing produced no result.
    NotADirectory,
    /// Malformed arguments (bad encoding, singular matrix, bad URI).
    InvalidArgument,
}

impl ErrorKind {
    /// All kinds, in declaration order.
    pub const ALL: [ErrorKind; 13] = [
        Self::NotFound,
        Self::IncompleteRead,
        Self::IoFailure,
        Self::DeleteFailure,
        Self::RenameFailure,
        Self::MkdirFailure,
        Self::NotAnImage,
        Self::UnknownAlgorithm,
        Self::InvalidKey,
        Self::CryptoFailure,
        Self::UnsupportedMode,
        Self::NotADirectory,
        Self::InvalidArgument,
    ];

    /// Stable wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NotFound",
            Self::IncompleteRead => "IncompleteRead",
            Self::IoFailure => "IOFailure",
            Self::DeleteFailure => "DeleteFailure",
            Self::RenameFailure => "RenameFailure",
            Self::MkdirFailure => "MkdirFailure",
            Self::NotAnImage => "NotAnImage",
            Self::UnknownAlgorithm => "UnknownAlgorithm",
            Self::InvalidKey => "InvalidKey",
            Self::CryptoFailure => "CryptoFailure",
            Self::UnsupportedMode => "UnsupportedMode",
            Self::NotADirectory => "NotADirectory",
            Self::InvalidArgument => "InvalidArgument",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that know which [`ErrorKind`] they surface as.
pub trait Classify {
    fn kind(&self) -> ErrorKind;
}

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("permission mode out of range: {0:#o}")]
    ModeOutOfRange(u32),

    #[error("invalid octal mode: {0}")]
    InvalidOctal(String),
}
