use std::io;
use std::path::PathBuf;

use mofs_store::StoreError;
use mofs_types::{Classify, ErrorKind};
use thiserror::Error;

/// Errors from URI parsing and resource opening.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("malformed resource URI {0:?}")]
    InvalidUri(String),

    #[error("cannot open {uri} in mode {mode:?}: only \"r\" is supported")]
    UnsupportedMode { uri: String, mode: String },

    /// The URI does not name anything this router serves.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot start pipe producer: {0}")]
    Pipe(#[source] io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ProviderError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound(path.display().to_string())
        } else {
            Self::Io { path, source }
        }
    }
}

impl Classify for ProviderError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUri(_) => ErrorKind::InvalidArgument,
            Self::UnsupportedMode { .. } => ErrorKind::UnsupportedMode,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Io { .. } | Self::Pipe(_) => ErrorKind::IoFailure,
            Self::Store(e) => e.kind(),
        }
    }
}

/// Result alias for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
