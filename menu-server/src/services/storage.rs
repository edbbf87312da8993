//! Asset storage
//!
//! Meal images and QR codes are stored under relative paths such as
//! `meals/<uuid>.png`; the database only keeps the relative path.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use image::ImageFormat;
use uuid::Uuid;

use crate::utils::{AppError, AppResult, ErrorCode};

/// Extensions accepted for meal images
pub const IMAGE_EXTENSIONS: &[&str] = &["jpeg", "png", "jpg", "gif", "bmp", "svg"];

/// File received in a multipart form
#[derive(Debug, Clone, Default)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl UploadedFile {
    /// Lowercased extension of the client file name
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }

    /// Accepted image: known extension and content matching an image format
    pub fn is_image(&self) -> bool {
        if self.data.is_empty() {
            return false;
        }
        let Some(ext) = self.extension() else {
            return false;
        };
        if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            return false;
        }
        if ext == "svg" {
            return String::from_utf8_lossy(&self.data).contains("<svg");
        }
        matches!(
            image::guess_format(&self.data),
            Ok(ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::Gif | ImageFormat::Bmp)
        )
    }
}

/// Storage backend for uploaded and generated assets
#[async_trait]
pub trait AssetStorage: Send + Sync {
    /// Write `data` to `{dir}/{name}` and return the relative path
    async fn put(&self, dir: &str, name: &str, data: &[u8]) -> AppResult<String>;

    /// Remove an asset; false when nothing was removed
    async fn delete(&self, path: &str) -> bool;

    async fn read(&self, path: &str) -> AppResult<Vec<u8>>;

    /// Public URL of a stored asset
    fn url(&self, path: &str) -> String;

    /// Store an upload under a fresh name, keeping its extension
    async fn store(&self, dir: &str, file: &UploadedFile) -> AppResult<String> {
        let name = match file.extension() {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };
        self.put(dir, &name, &file.data).await
    }
}

/// Filesystem storage rooted at `{WORK_DIR}/storage`
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
    public_url: String,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_url: public_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Map a relative asset path into the storage root
    ///
    /// Only plain relative components are allowed.
    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        let relative = Path::new(path);
        let plain = !path.is_empty()
            && !path.contains('\\')
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            return Err(AppError::with_message(
                ErrorCode::AssetNotFound,
                format!("Invalid asset path: {path}"),
            ));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl AssetStorage for LocalStorage {
    async fn put(&self, dir: &str, name: &str, data: &[u8]) -> AppResult<String> {
        let relative = format!("{dir}/{name}");
        let target = self.resolve(&relative)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_message(
                    ErrorCode::StorageFailed,
                    format!("Failed to create storage directory: {e}"),
                )
            })?;
        }
        tokio::fs::write(&target, data).await.map_err(|e| {
            AppError::with_message(ErrorCode::StorageFailed, format!("Failed to save file: {e}"))
        })?;

        tracing::debug!(path = %relative, size = data.len(), "Asset stored");
        Ok(relative)
    }

    async fn delete(&self, path: &str) -> bool {
        let Ok(target) = self.resolve(path) else {
            return false;
        };
        match tokio::fs::remove_file(&target).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Failed to delete asset");
                false
            }
        }
    }

    async fn read(&self, path: &str) -> AppResult<Vec<u8>> {
        let target = self.resolve(path)?;
        tokio::fs::read(&target).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AppError::new(ErrorCode::AssetNotFound),
            _ => AppError::with_message(ErrorCode::StorageFailed, format!("Failed to read file: {e}")),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/storage/{}", self.public_url, path)
    }
}
