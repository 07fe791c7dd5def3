//! Filesystem-backed media storage.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use slug::slugify;
use thiserror::Error;
use tokio::{fs, io::AsyncWriteExt};
use uuid::Uuid;

use crate::application::storage::{MediaStorage, StorageError};

#[derive(Debug, Error)]
pub enum UploadStorageError {
    #[error("invalid stored path")]
    InvalidPath,
    #[error("invalid storage namespace `{0}`")]
    InvalidNamespace(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("uploaded file is empty")]
    EmptyPayload,
}

/// Stores files below a root directory as `{namespace}/{uuid}-{name}`.
#[derive(Debug)]
pub struct UploadStorage {
    root: PathBuf,
}

impl UploadStorage {
    /// Initialise storage rooted at the provided directory, creating it if necessary.
    pub fn new(root: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn store_bytes(
        &self,
        namespace: &str,
        original_name: &str,
        data: Bytes,
    ) -> Result<String, UploadStorageError> {
        if data.is_empty() {
            return Err(UploadStorageError::EmptyPayload);
        }

        let stored_path = build_stored_path(namespace, original_name)?;
        let absolute = self.resolve(&stored_path)?;

        if let Some(parent) = absolute.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(&absolute).await?;
        if let Err(err) = file.write_all(&data).await {
            drop(file);
            let _ = fs::remove_file(&absolute).await;
            return Err(err.into());
        }
        file.flush().await?;

        Ok(stored_path)
    }

    pub async fn read_bytes(&self, stored_path: &str) -> Result<Bytes, UploadStorageError> {
        let absolute = self.resolve(stored_path)?;
        let data = fs::read(absolute).await?;
        Ok(Bytes::from(data))
    }

    /// Remove the stored payload. Missing files are treated as success.
    pub async fn remove(&self, stored_path: &str) -> Result<(), UploadStorageError> {
        let absolute = self.resolve(stored_path)?;
        match fs::remove_file(&absolute).await {
            Ok(_) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(UploadStorageError::Io(err)),
        }
    }

    fn resolve(&self, stored_path: &str) -> Result<PathBuf, UploadStorageError> {
        let relative = Path::new(stored_path);
        if stored_path.is_empty()
            || relative.is_absolute()
            || relative
                .components()
                .any(|component| matches!(component, Component::ParentDir | Component::Prefix(_)))
        {
            return Err(UploadStorageError::InvalidPath);
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl MediaStorage for UploadStorage {
    async fn store(
        &self,
        namespace: &str,
        original_name: &str,
        data: Bytes,
    ) -> Result<String, StorageError> {
        self.store_bytes(namespace, original_name, data)
            .await
            .map_err(|err| storage_error(err, original_name))
    }

    async fn delete(&self, stored_path: &str) -> Result<(), StorageError> {
        self.remove(stored_path)
            .await
            .map_err(|err| storage_error(err, stored_path))
    }

    async fn read(&self, stored_path: &str) -> Result<Bytes, StorageError> {
        self.read_bytes(stored_path)
            .await
            .map_err(|err| storage_error(err, stored_path))
    }
}

fn storage_error(err: UploadStorageError, path: &str) -> StorageError {
    match err {
        UploadStorageError::InvalidPath | UploadStorageError::InvalidNamespace(_) => {
            StorageError::InvalidPath(path.to_string())
        }
        UploadStorageError::EmptyPayload => StorageError::EmptyPayload,
        UploadStorageError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
            StorageError::NotFound(path.to_string())
        }
        UploadStorageError::Io(io) => StorageError::Backend(io.to_string()),
    }
}

fn build_stored_path(namespace: &str, original_name: &str) -> Result<String, UploadStorageError> {
    let namespace = namespace.trim_matches('/');
    let valid = !namespace.is_empty()
        && namespace.split('/').all(|segment| {
            !segment.is_empty()
                && segment != ".."
                && segment != "."
                && segment
                    .chars()
                    .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
        });
    if !valid {
        return Err(UploadStorageError::InvalidNamespace(namespace.to_string()));
    }

    let identifier = Uuid::new_v4();
    let filename = sanitize_filename(original_name);
    Ok(format!("{namespace}/{identifier}-{filename}"))
}

fn sanitize_filename(original: &str) -> String {
    let path = Path::new(original);
    let stem = path
        .file_stem()
        .and_then(|value| value.to_str())
        .unwrap_or("upload");
    let mut base = slugify(stem);
    if base.is_empty() {
        base = "upload".to_string();
    }

    let extension = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.trim_matches('.').to_ascii_lowercase())
        .filter(|value| !value.is_empty());

    match extension {
        Some(ext) => format!("{base}.{ext}"),
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> (tempfile::TempDir, UploadStorage) {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = UploadStorage::new(dir.path().join("public")).expect("storage");
        (dir, storage)
    }

    #[tokio::test]
    async fn stores_under_namespace_with_sanitized_name() {
        let (_dir, storage) = storage();
        let path = storage
            .store("posts", "My Holiday Photo.PNG", Bytes::from_static(b"png"))
            .await
            .expect("stored");

        assert!(path.starts_with("posts/"), "{path}");
        assert!(path.ends_with("-my-holiday-photo.png"), "{path}");
        assert!(storage.root().join(&path).is_file());
        assert_eq!(storage.read(&path).await.unwrap(), Bytes::from_static(b"png"));
    }

    #[tokio::test]
    async fn two_uploads_with_same_name_do_not_collide() {
        let (_dir, storage) = storage();
        let first = storage
            .store("posts", "a.png", Bytes::from_static(b"1"))
            .await
            .unwrap();
        let second = storage
            .store("posts", "a.png", Bytes::from_static(b"2"))
            .await
            .unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn delete_removes_file_and_tolerates_missing() {
        let (_dir, storage) = storage();
        let path = storage
            .store("posts", "a.png", Bytes::from_static(b"1"))
            .await
            .unwrap();

        storage.delete(&path).await.expect("delete");
        assert!(!storage.root().join(&path).exists());
        storage.delete(&path).await.expect("second delete is a no-op");
    }

    #[tokio::test]
    async fn rejects_escaping_paths() {
        let (_dir, storage) = storage();
        for path in ["../secret", "/etc/passwd", "posts/../../x", ""] {
            let err = storage.read(path).await.expect_err(path);
            assert!(matches!(err, StorageError::InvalidPath(_)), "{path}: {err:?}");
        }
    }

    #[tokio::test]
    async fn rejects_empty_payload_and_bad_namespace() {
        let (_dir, storage) = storage();
        let err = storage
            .store("posts", "a.png", Bytes::new())
            .await
            .expect_err("empty");
        assert!(matches!(err, StorageError::EmptyPayload));

        let err = storage
            .store("../posts", "a.png", Bytes::from_static(b"1"))
            .await
            .expect_err("namespace");
        assert!(matches!(err, StorageError::InvalidPath(_)));
    }

    #[tokio::test]
    async fn missing_file_reads_as_not_found() {
        let (_dir, storage) = storage();
        let err = storage.read("posts/nope.png").await.expect_err("missing");
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[test]
    fn sanitize_falls_back_to_upload() {
        assert_eq!(sanitize_filename("???.JPG"), "upload.jpg");
        assert_eq!(sanitize_filename("noext"), "noext");
    }
}
