use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Text representation of blob bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlobEncoding {
    #[default]
    Base64,
    Utf8,
}

impl BlobEncoding {
    /// Bytes for `text` in this encoding.
    pub fn decode(&self, text: &str) -> SdkResult<Vec<u8>> {
        match self {
            Self::Base64 => STANDARD
                .decode(text.trim())
                .map_err(|e| SdkError::InvalidArgument(format!("bad base64: {e}"))),
            Self::Utf8 => Ok(text.as_bytes().to_vec()),
        }
    }

    /// Text for `bytes`. Invalid UTF-8 is replaced, not rejected.
    pub fn encode(&self, bytes: &[u8]) -> String {
        match self {
            Self::Base64 => STANDARD.encode(bytes),
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}

impl FromStr for BlobEncoding {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base64" => Ok(Self::Base64),
            "utf8" | "utf-8" => Ok(Self::Utf8),
            other => Err(SdkError::InvalidArgument(format!("unknown encoding {other:?}"))),
        }
    }
}

impl fmt::Display for BlobEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base64 => f.write_str("base64"),
            Self::Utf8 => f.write_str("utf8"),
        }
    }
}

/// Decode a base64 argument such as a key or IV.
pub(crate) fn decode_base64(field: &str, text: &str) -> SdkResult<Vec<u8>> {
    STANDARD
        .decode(text.trim())
        .map_err(|e| SdkError::InvalidArgument(format!("{field}: bad base64: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_both_ways() {
        assert_eq!(BlobEncoding::Base64.decode("aGVsbG8=").unwrap(), b"hello");
        assert_eq!(BlobEncoding::Base64.encode(b"hello"), "aGVsbG8=");
    }

    #[test]
    fn bad_base64_is_invalid_argument() {
        assert!(matches!(
            BlobEncoding::Base64.decode("not base64!"),
            Err(SdkError::InvalidArgument(_))
        ));
    }

    #[test]
    fn utf8_is_lossy_on_output() {
        assert_eq!(BlobEncoding::Utf8.encode(&[0x68, 0x69, 0xFF]), "hi\u{FFFD}");
        assert_eq!(BlobEncoding::Utf8.decode("héllo").unwrap(), "héllo".as_bytes());
    }

    #[test]
    fn parses_names() {
        assert_eq!("utf8".parse::<BlobEncoding>().unwrap(), BlobEncoding::Utf8);
        assert!("hex".parse::<BlobEncoding>().is_err());
    }
}
