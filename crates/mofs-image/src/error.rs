use mofs_types::{Classify, ErrorKind};
use thiserror::Error;

/// Errors from the image pipeline.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("not an image: {0}")]
    NotAnImage(String),

    /// The matrix cannot be inverted or the canvas is empty.
    #[error("invalid transform: {0}")]
    InvalidTransform(String),

    #[error("encoding to {encoding} failed: {reason}")]
    Encode {
        encoding: &'static str,
        reason: String,
    },
}

impl Classify for ImageError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAnImage(_) => ErrorKind::NotAnImage,
            Self::InvalidTransform(_) => ErrorKind::InvalidArgument,
            Self::Encode { .. } => ErrorKind::IoFailure,
        }
    }
}

/// Result alias for image pipeline operations.
pub type ImageResult<T> = Result<T, ImageError>;
