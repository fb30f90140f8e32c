use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use mofs_types::BlobId;
use tracing::debug;

use crate::error::StoreResult;
use crate::traits::BlobStore;

struct Entry {
    data: Arc<[u8]>,
    refs: usize,
}

/// In-memory, HashMap-based blob store.
///
/// Ids are content-addressed: storing the same bytes twice returns the same
/// id and bumps a reference count. [`release`](BlobStore::release) drops one
/// reference and evicts the blob once none remain. All state sits behind a
/// `RwLock`; bytes are shared, so resolving only copies on the way out.
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<BlobId, Entry>>,
}

impl InMemoryBlobStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
        }
    }

    /// Number of distinct blobs currently stored.
    pub fn len(&self) -> usize {
        self.blobs.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.blobs.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all stored blobs.
    pub fn total_bytes(&self) -> u64 {
        self.blobs
            .read()
            .expect("lock poisoned")
            .values()
            .map(|e| e.data.len() as u64)
            .sum()
    }

    /// Outstanding references to `id` (0 if unknown).
    pub fn ref_count(&self, id: &BlobId) -> usize {
        self.blobs
            .read()
            .expect("lock poisoned")
            .get(id)
            .map_or(0, |e| e.refs)
    }

    /// Remove all blobs regardless of reference counts.
    pub fn clear(&self) {
        self.blobs.write().expect("lock poisoned").clear();
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobStore for InMemoryBlobStore {
    fn resolve_id(&self, id: &BlobId) -> StoreResult<Option<Vec<u8>>> {
        let map = self.blobs.read().expect("lock poisoned");
        Ok(map.get(id).map(|e| e.data.to_vec()))
    }

    fn store(&self, data: Vec<u8>) -> StoreResult<BlobId> {
        let id = BlobId::from_content(&data);
        let size = data.len();
        let mut map = self.blobs.write().expect("lock poisoned");
        let entry = map.entry(id.clone()).or_insert_with(|| Entry {
            data: data.into(),
            refs: 0,
        });
        entry.refs += 1;
        debug!(id = %id.short(), size, refs = entry.refs, "blob stored");
        Ok(id)
    }

    fn release(&self, id: &BlobId) -> StoreResult<bool> {
        let mut map = self.blobs.write().expect("lock poisoned");
        let Some(entry) = map.get_mut(id) else {
            return Ok(false);
        };
        entry.refs -= 1;
        if entry.refs == 0 {
            map.remove(id);
            debug!(id = %id.short(), "blob evicted");
        }
        Ok(true)
    }

    fn contains(&self, id: &BlobId) -> StoreResult<bool> {
        Ok(self.blobs.read().expect("lock poisoned").contains_key(id))
    }
}

impl std::fmt::Debug for InMemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBlobStore")
            .field("blob_count", &self.len())
            .field("total_bytes", &self.total_bytes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use mofs_types::BlobRef;

    // -----------------------------------------------------------------------
    // Store / resolve
    // -----------------------------------------------------------------------

    #[test]
    fn store_and_resolve() {
        let store = InMemoryBlobStore::new();
        let id = store.store(b"hello world".to_vec()).unwrap();
        assert_eq!(store.resolve_id(&id).unwrap().unwrap(), b"hello world");
    }

    #[test]
    fn resolve_missing_returns_none() {
        let store = InMemoryBlobStore::new();
        assert!(store.resolve_id(&BlobId::new("missing")).unwrap().is_none());
    }

    #[test]
    fn store_ref_covers_whole_blob() {
        let store = InMemoryBlobStore::new();
        let r = store.store_ref(b"12345".to_vec()).unwrap();
        assert_eq!(r.size, 5);
        assert_eq!(r.offset, 0);
        assert_eq!(store.resolve(&r).unwrap().unwrap(), b"12345");
    }

    #[test]
    fn resolve_slice() {
        let store = InMemoryBlobStore::new();
        let r = store.store_ref(b"0123456789".to_vec()).unwrap();
        assert_eq!(store.resolve(&r.slice(2, 3)).unwrap().unwrap(), b"234");
    }

    #[test]
    fn resolve_past_end_is_none() {
        let store = InMemoryBlobStore::new();
        let r = store.store_ref(b"abc".to_vec()).unwrap();
        assert!(store.resolve(&r.slice(2, 5)).unwrap().is_none());
    }

    #[test]
    fn resolve_overflowing_range_is_none() {
        let store = InMemoryBlobStore::new();
        let stored = store.store_ref(b"0123456789".to_vec()).unwrap();
        let mut r = stored.clone();
        r.offset = 5;
        r.size = u64::MAX;
        assert!(store.resolve(&r).unwrap().is_none());
        assert!(matches!(store.require(&r), Err(StoreError::NotFound(_))));
        assert!(store.resolve(&stored.slice(u64::MAX, 2)).unwrap().is_none());
    }

    #[test]
    fn require_missing_is_not_found() {
        let store = InMemoryBlobStore::new();
        let r = BlobRef::new(BlobId::new("nope"), 1);
        assert!(matches!(store.require(&r), Err(StoreError::NotFound(_))));
    }

    // -----------------------------------------------------------------------
    // Content addressing and reference counting
    // -----------------------------------------------------------------------

    #[test]
    fn same_content_produces_same_id() {
        let store = InMemoryBlobStore::new();
        let id1 = store.store(b"identical".to_vec()).unwrap();
        let id2 = store.store(b"identical".to_vec()).unwrap();
        assert_eq!(id1, id2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.ref_count(&id1), 2);
    }

    #[test]
    fn release_evicts_after_last_reference() {
        let store = InMemoryBlobStore::new();
        let id = store.store(b"twice".to_vec()).unwrap();
        store.store(b"twice".to_vec()).unwrap();

        assert!(store.release(&id).unwrap());
        assert!(store.contains(&id).unwrap());
        assert!(store.release(&id).unwrap());
        assert!(!store.contains(&id).unwrap());
        assert!(!store.release(&id).unwrap());
    }

    #[test]
    fn empty_blob_is_storable() {
        let store = InMemoryBlobStore::new();
        let r = store.store_ref(Vec::new()).unwrap();
        assert_eq!(store.resolve(&r).unwrap().unwrap(), Vec::<u8>::new());
    }

    // -----------------------------------------------------------------------
    // Utility methods
    // -----------------------------------------------------------------------

    #[test]
    fn len_total_bytes_and_clear() {
        let store = InMemoryBlobStore::default();
        assert!(store.is_empty());
        store.store(b"12345".to_vec()).unwrap();
        store.store(b"123456789".to_vec()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.total_bytes(), 14);
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn concurrent_resolves_are_safe() {
        use std::thread;

        let store = Arc::new(InMemoryBlobStore::new());
        let id = store.store(b"shared data".to_vec()).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                let id = id.clone();
                thread::spawn(move || {
                    let data = store.resolve_id(&id).unwrap().unwrap();
                    assert_eq!(BlobId::from_content(&data), id);
                })
            })
            .collect();

        for h in handles {
            h.join().expect("thread should not panic");
        }
    }

    #[test]
    fn debug_format() {
        let store = InMemoryBlobStore::new();
        store.store(b"x".to_vec()).unwrap();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryBlobStore"));
        assert!(debug.contains("blob_count"));
    }
}
