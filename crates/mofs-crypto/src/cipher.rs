use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes::{Aes128, Aes192, Aes256};
use tracing::debug;

use crate::algorithm::{CipherAlgorithm, CipherDirection};
use crate::error::{CryptoError, CryptoResult};

/// AES block size; also the required IV length.
pub const AES_BLOCK_LEN: usize = 16;

macro_rules! aes_cbc {
    ($aes:ty, $data:expr, $direction:expr, $key:expr, $iv:expr) => {
        match $direction {
            CipherDirection::Encrypt => cbc::Encryptor::<$aes>::new_from_slices($key, $iv)
                .map(|enc| enc.encrypt_padded_vec_mut::<Pkcs7>($data))
                .map_err(|_| CryptoError::InvalidKeyLength($key.len())),
            CipherDirection::Decrypt => cbc::Decryptor::<$aes>::new_from_slices($key, $iv)
                .map_err(|_| CryptoError::InvalidKeyLength($key.len()))?
                .decrypt_padded_vec_mut::<Pkcs7>($data)
                .map_err(|_| CryptoError::BadPadding),
        }
    };
}

/// Encrypt or decrypt `data` with PKCS#7 padding.
///
/// The AES variant follows from the key length (16, 24, or 32 bytes). The IV
/// must be exactly one block long.
pub fn cipher(
    data: &[u8],
    algorithm: CipherAlgorithm,
    direction: CipherDirection,
    key: &[u8],
    iv: &[u8],
) -> CryptoResult<Vec<u8>> {
    let CipherAlgorithm::AesCbc = algorithm;
    if iv.len() != AES_BLOCK_LEN {
        return Err(CryptoError::InvalidIvLength(iv.len()));
    }
    debug!(key_bits = key.len() * 8, ?direction, len = data.len(), "aes-cbc");
    match key.len() {
        16 => aes_cbc!(Aes128, data, direction, key, iv),
        24 => aes_cbc!(Aes192, data, direction, key, iv),
        32 => aes_cbc!(Aes256, data, direction, key, iv),
        n => Err(CryptoError::InvalidKeyLength(n)),
    }
}
