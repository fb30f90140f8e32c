use hmac::{Hmac, Mac};
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};

use crate::algorithm::{DigestAlgorithm, MacAlgorithm};
use crate::error::{CryptoError, CryptoResult};

/// Hash `data` and return the lowercase hex digest.
pub fn digest(data: &[u8], algorithm: DigestAlgorithm) -> String {
    match algorithm {
        DigestAlgorithm::Md5 => hex::encode(Md5::digest(data)),
        DigestAlgorithm::Sha1 => hex::encode(Sha1::digest(data)),
        DigestAlgorithm::Sha256 => hex::encode(Sha256::digest(data)),
        DigestAlgorithm::Sha512 => hex::encode(Sha512::digest(data)),
    }
}

/// Keyed MAC of `data`, as lowercase hex.
///
/// An empty key is rejected with [`CryptoError::InvalidKey`]; any other
/// length is accepted and hashed or padded per RFC 2104.
pub fn hmac(data: &[u8], algorithm: MacAlgorithm, key: &[u8]) -> CryptoResult<String> {
    if key.is_empty() {
        return Err(CryptoError::InvalidKey("empty key".into()));
    }
    match algorithm {
        MacAlgorithm::Sha1 => mac_hex::<Hmac<Sha1>>(data, key),
        MacAlgorithm::Sha256 => mac_hex::<Hmac<Sha256>>(data, key),
        MacAlgorithm::Sha512 => mac_hex::<Hmac<Sha512>>(data, key),
    }
}

fn mac_hex<M: Mac + hmac::digest::KeyInit>(data: &[u8], key: &[u8]) -> CryptoResult<String> {
    let mut mac =
        <M as Mac>::new_from_slice(key).map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
    mac.update(data);
    Ok(hex::encode(mac.finalize().into_bytes()))
}
