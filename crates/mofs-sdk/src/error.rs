use mofs_types::{Classify, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error(transparent)]
    Store(#[from] mofs_store::StoreError),

    #[error(transparent)]
    Fs(#[from] mofs_fs::FsError),

    #[error(transparent)]
    Crypto(#[from] mofs_crypto::CryptoError),

    #[error(transparent)]
    Image(#[from] mofs_image::ImageError),

    #[error(transparent)]
    Provider(#[from] mofs_provider::ProviderError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Classify for SdkError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Store(e) => e.kind(),
            Self::Fs(e) => e.kind(),
            Self::Crypto(e) => e.kind(),
            Self::Image(e) => e.kind(),
            Self::Provider(e) => e.kind(),
            Self::InvalidArgument(_) | Self::Config(_) => ErrorKind::InvalidArgument,
            Self::Io(_) => ErrorKind::IoFailure,
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
