use serde::{Deserialize, Serialize};

use crate::algorithm::DigestAlgorithm;
use crate::digest::digest;

/// Size and common digests of a byte buffer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobInfo {
    pub size: u64,
    pub md5: String,
    pub sha1: String,
    pub sha256: String,
}

impl BlobInfo {
    pub fn of(data: &[u8]) -> Self {
        Self {
            size: data.len() as u64,
            md5: digest(data, DigestAlgorithm::Md5),
            sha1: digest(data, DigestAlgorithm::Sha1),
            sha256: digest(data, DigestAlgorithm::Sha256),
        }
    }
}
