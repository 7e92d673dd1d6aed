//! Blob storage collaborators

mod fs;
mod memory;

use crate::error::StorageError;

pub use fs::FsBlobStore;
pub use memory::MemoryBlobStore;

/// Upload and download of opaque payloads by container and blob name.
///
/// Calls block until the store answers. Overwrites are last-writer-wins.
pub trait BlobStore: Send + Sync {
    fn put(&self, container: &str, blob: &str, payload: &[u8]) -> Result<(), StorageError>;

    fn get(&self, container: &str, blob: &str) -> Result<Vec<u8>, StorageError>;
}

impl<S: BlobStore + ?Sized> BlobStore for &S {
    fn put(&self, container: &str, blob: &str, payload: &[u8]) -> Result<(), StorageError> {
        (**self).put(container, blob, payload)
    }

    fn get(&self, container: &str, blob: &str) -> Result<Vec<u8>, StorageError> {
        (**self).get(container, blob)
    }
}

impl<S: BlobStore + ?Sized> BlobStore for Box<S> {
    fn put(&self, container: &str, blob: &str, payload: &[u8]) -> Result<(), StorageError> {
        (**self).put(container, blob, payload)
    }

    fn get(&self, container: &str, blob: &str) -> Result<Vec<u8>, StorageError> {
        (**self).get(container, blob)
    }
}
