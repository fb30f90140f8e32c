use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CryptoError;

/// Hash algorithms accepted by [`digest`](crate::digest()).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Sha512,
}

impl DigestAlgorithm {
    pub const ALL: [Self; 4] = [Self::Md5, Self::Sha1, Self::Sha256, Self::Sha512];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }

    /// Length of the raw digest in bytes.
    pub fn output_len(&self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }
}

impl FromStr for DigestAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| CryptoError::UnknownAlgorithm {
                family: "digest",
                name: s.to_string(),
            })
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hash functions accepted by [`hmac`](crate::hmac()).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacAlgorithm {
    Sha1,
    Sha256,
    Sha512,
}

impl MacAlgorithm {
    pub const ALL: [Self; 3] = [Self::Sha1, Self::Sha256, Self::Sha512];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }
}

impl FromStr for MacAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| CryptoError::UnknownAlgorithm {
                family: "hmac",
                name: s.to_string(),
            })
    }
}

impl fmt::Display for MacAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Symmetric ciphers accepted by [`cipher`](crate::cipher()).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CipherAlgorithm {
    #[serde(rename = "aes-cbc")]
    AesCbc,
}

impl CipherAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AesCbc => "aes-cbc",
        }
    }
}

impl FromStr for CipherAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aes-cbc" => Ok(Self::AesCbc),
            _ => Err(CryptoError::UnknownAlgorithm {
                family: "cipher",
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for CipherAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CipherDirection {
    Encrypt,
    Decrypt,
}

impl CipherDirection {
    pub fn from_encrypt_flag(encrypt: bool) -> Self {
        if encrypt {
            Self::Encrypt
        } else {
            Self::Decrypt
        }
    }
}

impl FromStr for CipherDirection {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "encrypt" => Ok(Self::Encrypt),
            "decrypt" => Ok(Self::Decrypt),
            _ => Err(CryptoError::UnknownAlgorithm {
                family: "cipher direction",
                name: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mofs_types::{Classify, ErrorKind};

    #[test]
    fn digest_names_round_trip() {
        for alg in DigestAlgorithm::ALL {
            assert_eq!(alg.as_str().parse::<DigestAlgorithm>().unwrap(), alg);
        }
    }

    #[test]
    fn names_are_case_sensitive() {
        assert!("SHA256".parse::<DigestAlgorithm>().is_err());
        assert!("sha-256".parse::<DigestAlgorithm>().is_err());
    }

    #[test]
    fn md5_is_not_a_mac() {
        let err = "md5".parse::<MacAlgorithm>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownAlgorithm);
    }

    #[test]
    fn only_aes_cbc_cipher() {
        assert_eq!("aes-cbc".parse::<CipherAlgorithm>().unwrap(), CipherAlgorithm::AesCbc);
        let err = "aes-gcm".parse::<CipherAlgorithm>().unwrap_err();
        assert!(matches!(err, CryptoError::UnknownAlgorithm { family: "cipher", .. }));
    }

    #[test]
    fn serde_uses_wire_names() {
        assert_eq!(serde_json::to_string(&DigestAlgorithm::Sha512).unwrap(), "\"sha512\"");
        assert_eq!(serde_json::to_string(&CipherAlgorithm::AesCbc).unwrap(), "\"aes-cbc\"");
        let dir: CipherDirection = serde_json::from_str("\"decrypt\"").unwrap();
        assert_eq!(dir, CipherDirection::from_encrypt_flag(false));
    }
}
