//! Local filesystem implementation of [`MediaStore`].
//!
//! Files are content-addressed by SHA-256 and sharded into two directory
//! levels, so identical uploads share one file.

use std::path::PathBuf;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::fs;

use super::{validate_upload, MediaStore};
use crate::errors::AppError;

pub struct LocalMediaStore {
    /// Root directory for all uploads (e.g. "./data/uploads")
    root_path: PathBuf,
    /// Public URL prefix (e.g. "/uploads")
    url_prefix: String,
}

impl LocalMediaStore {
    pub fn new(root: PathBuf, url_prefix: impl Into<String>) -> Self {
        Self {
            root_path: root,
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    /// "ab/cd/abcd...ef.png"
    fn relative_path(hash: &str, extension: &str) -> String {
        format!("{}/{}/{}.{}", &hash[0..2], &hash[2..4], hash, extension)
    }
}

fn extension_for(content_type: &str) -> &'static str {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    mime_guess::get_mime_extensions_str(essence)
        .and_then(|exts| exts.first().copied())
        .unwrap_or("bin")
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn save(&self, data: &[u8], content_type: &str) -> Result<String, AppError> {
        validate_upload(data, content_type)?;

        let hash = format!("{:x}", Sha256::digest(data));
        let relative = Self::relative_path(&hash, extension_for(content_type));
        let target = self.root_path.join(&relative);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }

        if fs::try_exists(&target).await? {
            tracing::debug!(%relative, "upload already stored");
        } else {
            fs::write(&target, data).await?;
            tracing::info!(%relative, bytes = data.len(), "upload stored");
        }

        Ok(format!("{}/{}", self.url_prefix, relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_is_content_addressed() {
        let dir = TempDir::new().unwrap();
        let store = LocalMediaStore::new(dir.path().to_path_buf(), "/uploads/");

        let first = store.save(b"fake-png", "image/png").await.unwrap();
        let second = store.save(b"fake-png", "image/png").await.unwrap();
        let other = store.save(b"other-png", "image/png").await.unwrap();

        assert_eq!(first, second);
        assert_ne!(first, other);
        assert!(first.starts_with("/uploads/"));
        assert!(first.ends_with(".png"));

        let relative = first.trim_start_matches("/uploads/");
        let stored = std::fs::read(dir.path().join(relative)).unwrap();
        assert_eq!(stored, b"fake-png");
    }

    #[tokio::test]
    async fn test_rejects_non_images() {
        let dir = TempDir::new().unwrap();
        let store = LocalMediaStore::new(dir.path().to_path_buf(), "/uploads");
        let err = store.save(b"hello", "text/plain").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_extension_for() {
        assert_eq!(extension_for("image/png"), "png");
        assert_eq!(extension_for("application/x-unknown-thing"), "bin");
    }
}
