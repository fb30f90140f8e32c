use mofs_types::{BlobId, BlobRef};

use crate::error::{StoreError, StoreResult};

/// Opaque key-to-bytes registry.
///
/// All implementations must satisfy these invariants:
/// - An id returned by [`store`](Self::store) resolves to the same bytes until
///   the store evicts it on its own terms.
/// - The store never interprets blob contents.
/// - Concurrent resolves are always safe.
/// - No ordering or expiry guarantees beyond the first rule.
pub trait BlobStore: Send + Sync {
    /// Resolve a whole stored blob by id.
    ///
    /// Returns `Ok(None)` if the blob does not exist.
    fn resolve_id(&self, id: &BlobId) -> StoreResult<Option<Vec<u8>>>;

    /// Register bytes and return their id.
    fn store(&self, data: Vec<u8>) -> StoreResult<BlobId>;

    /// Drop one reference to a blob. Returns `true` if the id was known.
    fn release(&self, id: &BlobId) -> StoreResult<bool>;

    /// Resolve the slice of a blob addressed by `blob`.
    ///
    /// Returns `Ok(None)` if the blob does not exist or the reference points
    /// past its end,
    /// including a range whose end overflows `u64`. The default implementation resolves the whole blob and
    /// copies the slice out; backends may override to avoid the copy.
    fn resolve(&self, blob: &BlobRef) -> StoreResult<Option<Vec<u8>>> {
        let Some(data) = self.resolve_id(&blob.id)? else {
            return Ok(None);
        };
        let len = data.len() as u64;
        if blob.offset == 0 && blob.size == len {
            return Ok(Some(data));
        }
        match blob.end() {
            Some(end) if end <= len => Ok(Some(data[blob.offset as usize..end as usize].to_vec())),
            _ => Ok(None),
        }
    }

    /// Like [`resolve`](Self::resolve), but a missing blob is an error.
    fn require(&self, blob: &BlobRef) -> StoreResult<Vec<u8>> {
        self.resolve(blob)?
            .ok_or_else(|| StoreError::NotFound(blob.id.clone()))
    }

    /// Check whether a blob is currently registered.
    fn contains(&self, id: &BlobId) -> StoreResult<bool> {
        Ok(self.resolve_id(id)?.is_some())
    }

    /// Store bytes and wrap the id in a reference covering all of them.
    fn store_ref(&self, data: Vec<u8>) -> StoreResult<BlobRef> {
        let size = data.len() as u64;
        let id = self.store(data)?;
        Ok(BlobRef::new(id, size))
    }
}
