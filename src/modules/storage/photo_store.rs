use chrono::Utc;
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::shared::validation::FILE_EXTENSION_REGEX;

/// Blob store for uploaded report photos, backed by a local media directory.
///
/// Keys look like `photos/2026/08/29/<uuid>.jpg` and are stable once issued;
/// the reports table references them by key only.
pub struct PhotoStore {
    media_root: PathBuf,
}

impl PhotoStore {
    pub fn new(media_root: impl Into<PathBuf>) -> Self {
        Self {
            media_root: media_root.into(),
        }
    }

    /// Create the media root if missing
    pub async fn ensure_media_root(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.media_root)
            .await
            .map_err(|e| {
                AppError::Internal(format!(
                    "Failed to create media root {}: {}",
                    self.media_root.display(),
                    e
                ))
            })?;
        Ok(())
    }

    /// Write photo bytes under a fresh dated key and return the key
    pub async fn store(
        &self,
        data: &[u8],
        original_filename: &str,
        content_type: &str,
    ) -> Result<String> {
        let extension = extension_for(content_type, original_filename);
        let key = format!(
            "photos/{}/{}.{}",
            Utc::now().format("%Y/%m/%d"),
            Uuid::new_v4(),
            extension
        );

        let path = self.media_root.join(&key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Internal(format!("Failed to create photo directory: {}", e))
            })?;
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write photo {}: {}", key, e)))?;

        debug!("Photo stored: {} ({} bytes)", key, data.len());
        Ok(key)
    }

    /// Remove a stored photo. Used to clean up after a failed commit;
    /// a missing file is not an error.
    pub async fn remove(&self, key: &str) -> Result<()> {
        let path = self.media_root.join(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Internal(format!(
                "Failed to remove photo {}: {}",
                key, e
            ))),
        }
    }

    /// Absolute filesystem path for a stored key
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.media_root.join(key)
    }
}

/// Pick a file extension: declared content type first, then the original
/// filename, falling back to "bin". Anything unsafe is rejected.
fn extension_for(content_type: &str, original_filename: &str) -> String {
    if let Some(ext) = extension_from_content_type(content_type) {
        return ext.to_string();
    }

    let from_name = original_filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|e| FILE_EXTENSION_REGEX.is_match(e));

    from_name.unwrap_or_else(|| "bin".to_string())
}

fn extension_from_content_type(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_prefers_content_type() {
        assert_eq!(extension_for("image/jpeg", "photo.png"), "jpg");
        assert_eq!(extension_for("image/webp", "photo"), "webp");
    }

    #[test]
    fn test_extension_falls_back_to_filename() {
        assert_eq!(extension_for("application/octet-stream", "photo.PNG"), "png");
        // a dotless name has no extension, even when it looks like one
        assert_eq!(extension_for("application/octet-stream", "photo"), "bin");
        assert_eq!(extension_for("application/octet-stream", "photo."), "bin");
        // traversal attempts never become extensions
        assert_eq!(extension_for("application/octet-stream", "x.../etc"), "bin");
    }

    #[tokio::test]
    async fn test_store_and_remove_round_trip() {
        let root = std::env::temp_dir().join(format!("machirepo-test-{}", Uuid::new_v4()));
        let store = PhotoStore::new(&root);
        store.ensure_media_root().await.unwrap();

        let bytes = vec![0xffu8, 0xd8, 0x00, 0x10, 0x7f];
        let key = store.store(&bytes, "pothole.jpg", "image/jpeg").await.unwrap();
        assert!(key.starts_with("photos/"));
        assert!(key.ends_with(".jpg"));

        let written = tokio::fs::read(store.path_for(&key)).await.unwrap();
        assert_eq!(written, bytes);

        store.remove(&key).await.unwrap();
        assert!(!store.path_for(&key).exists());
        // removing again is a no-op
        store.remove(&key).await.unwrap();

        tokio::fs::remove_dir_all(&root).await.ok();
    }
}
