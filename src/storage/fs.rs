//! Blob store backed by a local directory

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::error::StorageError;

use super::BlobStore;

/// Connection string key naming the root directory
const ROOT_KEY: &str = "Root";

/// Stores each blob as `<root>/<container>/<blob>`
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Open from a resolved connection string: either `Key=Value;` pairs
    /// including `Root=<dir>`, or a bare directory path
    pub fn from_connection_string(connection_string: &str) -> Result<Self, StorageError> {
        let connection_string = connection_string.trim();
        if connection_string.is_empty() {
            return Err(StorageError::InvalidConnection(
                "connection string is empty".into(),
            ));
        }

        if !connection_string.contains('=') {
            return Ok(Self::new(connection_string));
        }

        connection_string
            .split(';')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case(ROOT_KEY))
            .map(|(_, value)| Self::new(value.trim()))
            .ok_or_else(|| {
                StorageError::InvalidConnection(format!("missing {} setting", ROOT_KEY))
            })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, container: &str, blob: &str) -> Result<PathBuf, StorageError> {
        for part in [container, blob] {
            let escapes = Path::new(part)
                .components()
                .any(|c| !matches!(c, Component::Normal(_)));
            if part.is_empty() || escapes {
                return Err(StorageError::InvalidConnection(format!(
                    "invalid container or blob name: {}",
                    part
                )));
            }
        }
        Ok(self.root.join(container).join(blob))
    }
}

impl BlobStore for FsBlobStore {
    fn put(&self, container: &str, blob: &str, payload: &[u8]) -> Result<(), StorageError> {
        let path = self.blob_path(container, blob)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, payload)?;
        log::debug!("Wrote {} bytes to {}", payload.len(), path.display());
        Ok(())
    }

    fn get(&self, container: &str, blob: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.blob_path(container, blob)?;
        fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound {
                container: container.to_string(),
                blob: blob.to_string(),
            },
            _ => StorageError::Io(e),
        })
    }
}
