use std::sync::Arc;

use mofs_types::{NoopObserver, Observer, OpTimer};

use crate::algorithm::{CipherAlgorithm, CipherDirection, DigestAlgorithm, MacAlgorithm};
use crate::error::{CryptoError, CryptoResult};
use crate::info::BlobInfo;

const COMPONENT: &str = "crypto";

/// Runs digest, MAC, and cipher operations and reports them to an observer.
///
/// Algorithm names arrive as strings and are parsed here, so an unknown name
/// is recorded as a failed operation like any other error.
pub struct CryptoEngine {
    observer: Arc<dyn Observer>,
}

impl CryptoEngine {
    pub fn new(observer: Arc<dyn Observer>) -> Self {
        Self { observer }
    }

    pub fn digest(&self, data: &[u8], algorithm: &str) -> CryptoResult<String> {
        let timer = OpTimer::start(COMPONENT, "digest", algorithm);
        let result = algorithm
            .parse::<DigestAlgorithm>()
            .map(|alg| crate::digest::digest(data, alg));
        timer.finish(&*self.observer, &result, |_| Some(data.len() as u64));
        result
    }

    pub fn hmac(&self, data: &[u8], algorithm: &str, key: &[u8]) -> CryptoResult<String> {
        let timer = OpTimer::start(COMPONENT, "hmac", algorithm);
        let result = algorithm
            .parse::<MacAlgorithm>()
            .and_then(|alg| crate::digest::hmac(data, alg, key));
        timer.finish(&*self.observer, &result, |_| Some(data.len() as u64));
        result
    }

    pub fn cipher(
        &self,
        data: &[u8],
        algorithm: &str,
        direction: CipherDirection,
        key: &[u8],
        iv: &[u8],
    ) -> CryptoResult<Vec<u8>> {
        let op = match direction {
            CipherDirection::Encrypt => "encrypt",
            CipherDirection::Decrypt => "decrypt",
        };
        let timer = OpTimer::start(COMPONENT, op, algorithm);
        let result = algorithm
            .parse::<CipherAlgorithm>()
            .and_then(|alg| crate::cipher::cipher(data, alg, direction, key, iv));
        timer.finish(&*self.observer, &result, |out| Some(out.len() as u64));
        result
    }

    pub fn info(&self, data: &[u8]) -> BlobInfo {
        let timer = OpTimer::start(COMPONENT, "info", "md5,sha1,sha256");
        let info = BlobInfo::of(data);
        timer.finish(&*self.observer, &Ok::<_, CryptoError>(()), |_| {
            Some(data.len() as u64)
        });
        info
    }
}

impl Default for CryptoEngine {
    fn default() -> Self {
        Self::new(Arc::new(NoopObserver))
    }
}

impl std::fmt::Debug for CryptoEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoEngine").finish_non_exhaustive()
    }
}
