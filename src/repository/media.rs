//! Media Storage
//!
//! Binary objects (deck banners, avatars, profile photos, wallpapers) live in
//! named buckets behind the `MediaStorage` trait. `LocalMediaStorage` keeps
//! them on disk and serves stable public URLs.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::path::{Component, Path, PathBuf};

use crate::domain::{StoreError, StoreResult};

/// Characters left unescaped inside one key segment
const KEY_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// A file picked by the user for upload
#[derive(Debug, Clone, PartialEq)]
pub struct MediaFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl MediaFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Lowercased extension, "bin" when the name has none
    pub fn extension(&self) -> String {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_else(|| "bin".to_string())
    }

    pub fn content_type(&self) -> String {
        mime_guess::from_path(&self.file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }
}

#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Store `bytes` under `bucket/key`. Without `upsert`, an existing
    /// object makes the upload fail with `StoreError::Conflict`.
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: &[u8],
        content_type: &str,
        upsert: bool,
    ) -> StoreResult<()>;

    /// Public URL for an object; does not check that it exists
    fn public_url(&self, bucket: &str, key: &str) -> String;
}

/// Upload `file` and return its public URL
pub async fn upload_file(
    media: &dyn MediaStorage,
    bucket: &str,
    key: &str,
    file: &MediaFile,
    upsert: bool,
) -> StoreResult<String> {
    media
        .upload(bucket, key, &file.bytes, &file.content_type(), upsert)
        .await?;
    Ok(media.public_url(bucket, key))
}

/// Filesystem-backed media storage
pub struct LocalMediaStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalMediaStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    fn object_path(&self, bucket: &str, key: &str) -> StoreResult<PathBuf> {
        let relative = Path::new(bucket).join(key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if bucket.is_empty() || key.is_empty() || escapes {
            return Err(StoreError::InvalidInput(format!("Invalid object key {}/{}", bucket, key)));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: &[u8],
        content_type: &str,
        upsert: bool,
    ) -> StoreResult<()> {
        let path = self.object_path(bucket, key)?;

        if !upsert && tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StoreError::Conflict(format!("Object {}/{} already exists", bucket, key)));
        }
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Internal(e.to_string()))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| StoreError::Internal(e.to_string()))?;

        log::debug!("Stored {}/{} ({}, {} bytes)", bucket, key, content_type, bytes.len());
        Ok(())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        let encoded: Vec<String> = key
            .split('/')
            .map(|segment| utf8_percent_encode(segment, KEY_SEGMENT).to_string())
            .collect();
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.public_base_url.trim_end_matches('/'),
            bucket,
            encoded.join("/")
        )
    }
}
