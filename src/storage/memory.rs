//! In-process blob store

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::StorageError;

use super::BlobStore;

/// Blob store held in memory. Counts calls so callers can check that a
/// failed validation never reached storage.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<(String, String), Vec<u8>>>,
    calls: AtomicUsize,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with one blob
    pub fn with_blob(container: &str, blob: &str, payload: impl Into<Vec<u8>>) -> Self {
        let store = Self::new();
        store
            .lock()
            .insert((container.to_string(), blob.to_string()), payload.into());
        store
    }

    /// Number of put and get calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Current contents of a blob, without counting as a call
    pub fn blob(&self, container: &str, blob: &str) -> Option<Vec<u8>> {
        self.lock()
            .get(&(container.to_string(), blob.to_string()))
            .cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(String, String), Vec<u8>>> {
        self.blobs.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl BlobStore for MemoryBlobStore {
    fn put(&self, container: &str, blob: &str, payload: &[u8]) -> Result<(), StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.lock()
            .insert((container.to_string(), blob.to_string()), payload.to_vec());
        Ok(())
    }

    fn get(&self, container: &str, blob: &str) -> Result<Vec<u8>, StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.blob(container, blob)
            .ok_or_else(|| StorageError::NotFound {
                container: container.to_string(),
                blob: blob.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_overwrite() {
        let store = MemoryBlobStore::new();
        store.put("c", "b", b"one").unwrap();
        store.put("c", "b", b"two").unwrap();
        assert_eq!(store.get("c", "b").unwrap(), b"two");
        assert_eq!(store.calls(), 3);
    }

    #[test]
    fn test_missing_blob() {
        let store = MemoryBlobStore::new();
        let err = store.get("c", "missing").unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }
}
