//! File storage for uploaded images.
//!
//! Files live below a media root and are addressed by public URLs of the
//! form `{base_url}/{subdir}/{stem}_{suffix}{ext}`.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use crate::config::{Config, MEDIA_URL_PATH, UPLOAD_SUFFIX_LEN};
use crate::domain::{FileUpload, UploadedFile};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Stores and removes binary files.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UploadService: Send + Sync {
    /// Store a file and return its public URL.
    ///
    /// # Errors
    /// Any I/O failure is an internal error.
    async fn upload_file(&self, file: FileUpload) -> AppResult<UploadedFile>;

    /// Remove the file behind `url`. Returns `false` when there was nothing
    /// to remove.
    async fn delete_file(&self, url: &str) -> AppResult<bool>;
}

/// Upload service backed by the local filesystem
///
/// ```
/// # use workout_catalog::domain::FileUpload;
/// # use workout_catalog::infra::{LocalUploadService, UploadService};
/// # tokio_test::block_on(async {
/// let media = tempfile::tempdir().unwrap();
/// let store = LocalUploadService::new(media.path(), "http://localhost:8000/media");
///
/// let stored = store
///     .upload_file(FileUpload::new(b"png".to_vec(), "cover.png", "styles/images"))
///     .await
///     .unwrap();
/// assert!(stored.url.starts_with("http://localhost:8000/media/styles/images/cover_"));
/// assert!(store.delete_file(&stored.url).await.unwrap());
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct LocalUploadService {
    media_dir: PathBuf,
    base_url: String,
}

impl LocalUploadService {
    pub fn new(media_dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            media_dir: media_dir.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Media served by this backend under `MEDIA_URL_PATH`
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.media_dir.clone(),
            format!("{}{}", config.backend_url.trim_end_matches('/'), MEDIA_URL_PATH),
        )
    }

    fn stored_name(filename: &str) -> String {
        let original = Path::new(filename)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let original = Path::new(&original);

        let stem = original
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "file".to_string());
        let ext = original
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let suffix = Uuid::new_v4().simple().to_string();

        format!("{}_{}{}", stem, &suffix[..UPLOAD_SUFFIX_LEN], ext)
    }

    /// Relative paths only, without `..`
    fn is_contained(relative: &Path) -> bool {
        relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    }
}

#[async_trait]
impl UploadService for LocalUploadService {
    async fn upload_file(&self, file: FileUpload) -> AppResult<UploadedFile> {
        let subdir = file.directory.trim_matches('/');
        if !Self::is_contained(Path::new(subdir)) {
            return Err(AppError::internal(format!(
                "Refusing to store outside the media directory: {}",
                subdir
            )));
        }

        let dir = self.media_dir.join(subdir);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::internal(format!("Failed to create {}: {}", dir.display(), e)))?;

        let name = Self::stored_name(&file.filename);
        let path = dir.join(&name);
        tokio::fs::write(&path, &file.content)
            .await
            .map_err(|e| AppError::internal(format!("Failed to write {}: {}", path.display(), e)))?;

        tracing::debug!(path = %path.display(), bytes = file.content.len(), "Stored upload");

        let url = if subdir.is_empty() {
            format!("{}/{}", self.base_url, name)
        } else {
            format!("{}/{}/{}", self.base_url, subdir, name)
        };
        Ok(UploadedFile { url })
    }

    async fn delete_file(&self, url: &str) -> AppResult<bool> {
        let prefix = format!("{}/", self.base_url);
        let Some(relative) = url.strip_prefix(&prefix) else {
            tracing::warn!(url, "Not a media URL of this backend, nothing deleted");
            return Ok(false);
        };

        let relative = Path::new(relative);
        if !Self::is_contained(relative) {
            tracing::warn!(url, "Media URL escapes the media directory, nothing deleted");
            return Ok(false);
        }

        let path = self.media_dir.join(relative);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Deleted upload");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://localhost:8000/media";

    #[tokio::test]
    async fn test_upload_writes_file_and_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let service = LocalUploadService::new(dir.path(), BASE);

        let uploaded = service
            .upload_file(FileUpload::new(b"png".to_vec(), "cover.png", "styles/images"))
            .await
            .unwrap();

        let relative = uploaded
            .url
            .strip_prefix("http://localhost:8000/media/styles/images/")
            .unwrap();
        assert!(relative.starts_with("cover_"));
        assert!(relative.ends_with(".png"));
        assert_eq!(relative.len(), "cover_".len() + UPLOAD_SUFFIX_LEN + ".png".len());

        let stored = std::fs::read(dir.path().join("styles/images").join(relative)).unwrap();
        assert_eq!(stored, b"png");
    }

    #[tokio::test]
    async fn test_upload_strips_client_directories() {
        let dir = tempfile::tempdir().unwrap();
        let service = LocalUploadService::new(dir.path(), BASE);

        let uploaded = service
            .upload_file(FileUpload::new(vec![1], "../../etc/passwd", "avatars"))
            .await
            .unwrap();

        assert!(uploaded.url.starts_with("http://localhost:8000/media/avatars/passwd_"));
    }

    #[tokio::test]
    async fn test_delete_removes_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let service = LocalUploadService::new(dir.path(), BASE);
        let uploaded = service
            .upload_file(FileUpload::new(vec![1, 2, 3], "a.jpg", "workouts/images"))
            .await
            .unwrap();

        assert!(service.delete_file(&uploaded.url).await.unwrap());
        assert!(!service.delete_file(&uploaded.url).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_ignores_foreign_and_escaping_urls() {
        let dir = tempfile::tempdir().unwrap();
        let service = LocalUploadService::new(dir.path(), BASE);

        assert!(!service.delete_file("https://elsewhere/x.png").await.unwrap());
        assert!(!service
            .delete_file("http://localhost:8000/media/../secret")
            .await
            .unwrap());
    }
}
