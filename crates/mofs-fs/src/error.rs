use std::io;
use std::path::PathBuf;

use mofs_types::{Classify, ErrorKind};
use thiserror::Error;

/// Errors from file accessor operations.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("no such file: {}", .0.display())]
    NotFound(PathBuf),

    #[error("incomplete read of {}: requested {requested} bytes at offset {offset}, got {available}", path.display())]
    IncompleteRead {
        path: PathBuf,
        offset: u64,
        requested: u64,
        available: u64,
    },

    /// The offset resolved to a position before the start of the file.
    #[error("offset {offset} resolves before the start of {} ({len} bytes)", path.display())]
    OffsetBeforeStart { path: PathBuf, offset: i64, len: u64 },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// One or more entries could not be removed. Siblings were still attempted.
    #[error("cannot delete {}: {failed} entries failed, first: {first}", path.display())]
    DeleteFailure {
        path: PathBuf,
        failed: usize,
        first: String,
    },

    #[error("cannot rename {} to {}: {source}", from.display(), to.display())]
    RenameFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot create directory {}: {source}", path.display())]
    MkdirFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot list {}: not a readable directory", .0.display())]
    NotADirectory(PathBuf),
}

impl FsError {
    /// Wrap an I/O error, promoting `NotFound` to [`FsError::NotFound`].
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound(path)
        } else {
            Self::Io { path, source }
        }
    }
}

impl Classify for FsError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::IncompleteRead { .. } => ErrorKind::IncompleteRead,
            Self::OffsetBeforeStart { .. } | Self::Io { .. } => ErrorKind::IoFailure,
            Self::DeleteFailure { .. } => ErrorKind::DeleteFailure,
            Self::RenameFailure { .. } => ErrorKind::RenameFailure,
            Self::MkdirFailure { .. } => ErrorKind::MkdirFailure,
            Self::NotADirectory(_) => ErrorKind::NotADirectory,
        }
    }
}

/// Result alias for file accessor operations.
pub type FsResult<T> = Result<T, FsError>;
