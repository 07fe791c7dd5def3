//! Media storage contract used by the admin editors.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid stored path `{0}`")]
    InvalidPath(String),
    #[error("stored file `{0}` not found")]
    NotFound(String),
    #[error("uploaded file is empty")]
    EmptyPayload,
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Stores opaque file bytes under a namespace and addresses them by relative path.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Persist `data` below `namespace` and return the stored relative path.
    async fn store(
        &self,
        namespace: &str,
        original_name: &str,
        data: Bytes,
    ) -> Result<String, StorageError>;

    /// Remove a stored file. Missing files are treated as success.
    async fn delete(&self, stored_path: &str) -> Result<(), StorageError>;

    async fn read(&self, stored_path: &str) -> Result<Bytes, StorageError>;
}
