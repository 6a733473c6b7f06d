use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::media::dtos::{get_extension_from_content_type, UploadMediaResponseDto};
use crate::modules::storage::{AmazonMediaStorage, MediaMetadata, StoredMedia};

/// Service for media operations
pub struct MediaService {
    storage: Arc<AmazonMediaStorage>,
}

impl MediaService {
    pub fn new(storage: Arc<AmazonMediaStorage>) -> Self {
        Self { storage }
    }

    /// Build a unique object name for an upload
    ///
    /// The extension comes from the content type when known, otherwise from
    /// the original filename.
    fn media_name(original_filename: &str, content_type: &str) -> String {
        let id = Uuid::new_v4();
        let extension = get_extension_from_content_type(content_type).or_else(|| {
            original_filename
                .rsplit_once('.')
                .map(|(_, ext)| ext)
                .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        });

        match extension {
            Some(ext) => format!("{}.{}", id, ext.to_ascii_lowercase()),
            None => id.to_string(),
        }
    }

    /// Store an uploaded file under a fresh name
    pub async fn upload(
        &self,
        data: &[u8],
        original_filename: &str,
        content_type: &str,
        metadata: Option<&MediaMetadata>,
    ) -> Result<UploadMediaResponseDto> {
        let name = Self::media_name(original_filename, content_type);
        let id = self
            .storage
            .put(data, &name, content_type, metadata)
            .await?;

        info!(
            "Media stored: id={}, content_type={}, size={}",
            id,
            content_type,
            data.len()
        );

        Ok(UploadMediaResponseDto {
            url: self.storage.url_for_media(&id),
            id,
        })
    }

    pub async fn fetch(&self, id: &str) -> Result<StoredMedia> {
        self.storage
            .get(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Media '{}' not found", id)))
    }

    pub async fn metadata(&self, id: &str) -> Result<MediaMetadata> {
        self.storage
            .get_metadata(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Media '{}' not found", id)))
    }

    pub async fn update_metadata(&self, id: &str, metadata: &MediaMetadata) -> Result<()> {
        self.storage.update_metadata(id, metadata).await
    }

    pub async fn exists(&self, id: &str) -> bool {
        self.storage.exists(id).await
    }

    pub async fn delete(&self, id: &str) {
        self.storage.delete(id).await;
    }

    pub fn url(&self, id: &str) -> String {
        self.storage.url_for_media(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_name_prefers_content_type_extension() {
        let name = MediaService::media_name("photo.jpeg", "image/png");
        assert!(name.ends_with(".png"));
        assert!(Uuid::parse_str(name.trim_end_matches(".png")).is_ok());
    }

    #[test]
    fn test_media_name_falls_back_to_filename_extension() {
        assert!(MediaService::media_name("notes.TXT", "text/plain").ends_with(".txt"));
    }

    #[test]
    fn test_media_name_without_extension() {
        let name = MediaService::media_name("README", "text/plain");
        assert!(Uuid::parse_str(&name).is_ok());

        let name = MediaService::media_name("weird.e x t", "text/plain");
        assert!(Uuid::parse_str(&name).is_ok());
    }

    #[test]
    fn test_media_names_are_unique() {
        assert_ne!(
            MediaService::media_name("a.png", "image/png"),
            MediaService::media_name("a.png", "image/png")
        );
    }
}
