//! Amazon S3 media storage
//!
//! Adapts the [`MediaStorage`] contract to one S3 bucket. Every operation is a
//! single request against the bound bucket. Existence misses and delete
//! failures degrade to `false`/`None`/log output instead of errors.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::core::config::AmazonConfig;
use crate::core::error::{AppError, Result};
use crate::modules::storage::client::{
    is_success, validate_headers, ListPage, ObjectResponse, ObjectStoreClient, StoreError,
};
use crate::modules::storage::metadata::{decode_metadata, encode_metadata, MediaMetadata};
use crate::modules::storage::s3_client::S3ObjectClient;
use crate::modules::storage::traits::MediaStorage;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A media object fetched from storage, fully buffered in memory
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMedia {
    pub content: Vec<u8>,
    pub content_type: String,
    /// Length reported by the provider
    pub length: u64,
    pub name: String,
    pub metadata: MediaMetadata,
}

impl StoredMedia {
    fn from_response(name: &str, response: ObjectResponse) -> Self {
        let metadata = decode_metadata(&response.headers);
        let content_type = response
            .header("content-type")
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let length = response
            .header("content-length")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(response.body.len() as u64);

        Self {
            content: response.body,
            content_type,
            length,
            name: name.to_string(),
            metadata,
        }
    }
}

/// Outcome of a single object lookup
enum Lookup {
    Found(ObjectResponse),
    Missing(u16),
    Failed(StoreError),
}

impl From<std::result::Result<ObjectResponse, StoreError>> for Lookup {
    fn from(result: std::result::Result<ObjectResponse, StoreError>) -> Self {
        match result {
            Ok(response) if response.is_success() => Lookup::Found(response),
            Ok(response) => Lookup::Missing(response.status),
            Err(e) => Lookup::Failed(e),
        }
    }
}

/// Media storage backed by a single Amazon S3 bucket
pub struct AmazonMediaStorage {
    client: Arc<dyn ObjectStoreClient>,
    container_name: String,
    endpoint: String,
    use_https: bool,
}

impl AmazonMediaStorage {
    /// Connect to the bucket named in `config`
    pub fn new(config: &AmazonConfig) -> Result<Self> {
        let client = S3ObjectClient::new(config)
            .map_err(|e| AppError::Internal(format!("Failed to create S3 client: {}", e)))?;
        Ok(Self::with_client(config, Arc::new(client)))
    }

    /// Load the configuration from the environment and connect
    pub fn from_env() -> Result<Self> {
        Self::new(&AmazonConfig::from_env()?)
    }

    /// Bind the adapter to an already constructed client
    pub fn with_client(config: &AmazonConfig, client: Arc<dyn ObjectStoreClient>) -> Self {
        Self {
            client,
            container_name: config.container_name.clone(),
            endpoint: config.endpoint(),
            use_https: config.use_https,
        }
    }

    pub fn container_name(&self) -> &str {
        &self.container_name
    }

    /// Public URL of a stored media object
    ///
    /// # Returns
    /// `{scheme}://{container}.{endpoint}/{media_id}`
    pub fn url_for_media(&self, media_id: &str) -> String {
        let protocol = if self.use_https { "https" } else { "http" };
        format!(
            "{}://{}.{}/{}",
            protocol, self.container_name, self.endpoint, media_id
        )
    }

    /// Check if a media object exists
    ///
    /// Any failure, including transport errors, reads as "does not exist".
    pub async fn exists(&self, id_or_filename: &str) -> bool {
        match self.lookup(id_or_filename).await {
            Lookup::Found(_) => true,
            Lookup::Missing(status) => {
                debug!("File '{}' not found in S3 (status {})", id_or_filename, status);
                false
            }
            Lookup::Failed(e) => {
                error!("Checking file '{}' in S3 failed: {}", id_or_filename, e);
                false
            }
        }
    }

    /// Fetch a media object with its content and metadata
    pub async fn get(&self, id_or_filename: &str) -> Option<StoredMedia> {
        let lookup: Lookup = self.client.get_object(id_or_filename).await.into();
        match lookup {
            Lookup::Found(response) => Some(StoredMedia::from_response(id_or_filename, response)),
            Lookup::Missing(status) => {
                debug!(
                    "Retrieving file '{}' from S3 failed with status {}",
                    id_or_filename, status
                );
                None
            }
            Lookup::Failed(e) => {
                error!("Retrieving file '{}' from S3 failed: {}", id_or_filename, e);
                None
            }
        }
    }

    /// Custom metadata of a stored object, without downloading its content
    pub async fn get_metadata(&self, id_or_filename: &str) -> Option<MediaMetadata> {
        match self.lookup(id_or_filename).await {
            Lookup::Found(response) => Some(decode_metadata(&response.headers)),
            Lookup::Missing(_) => None,
            Lookup::Failed(e) => {
                error!(
                    "Reading metadata of '{}' from S3 failed: {}",
                    id_or_filename, e
                );
                None
            }
        }
    }

    /// Store a media object unless one with the same name already exists
    ///
    /// # Returns
    /// The name the content is stored under
    pub async fn put(
        &self,
        content: &[u8],
        filename: &str,
        content_type: &str,
        metadata: Option<&MediaMetadata>,
    ) -> Result<String> {
        debug!("Going to save media file with {}", filename);

        let headers = metadata.map(encode_metadata).unwrap_or_default();
        validate_headers(&headers)?;

        match self.lookup(filename).await {
            Lookup::Found(_) => {
                debug!("File '{}' already exists in S3, keeping it", filename);
                return Ok(filename.to_string());
            }
            Lookup::Missing(_) => {}
            Lookup::Failed(e) => {
                warn!("Could not check '{}' before upload: {}", filename, e);
            }
        }

        match self
            .client
            .put_object(filename, content, content_type, &headers)
            .await
        {
            Ok(status) if is_success(status) => {
                debug!(
                    "Uploaded file '{}' to bucket '{}'",
                    filename, self.container_name
                );
                Ok(filename.to_string())
            }
            Ok(status) => {
                let message = format!(
                    "Uploading file '{}' to amazon S3 failed with status {}",
                    filename, status
                );
                error!("{}", message);
                Err(AppError::Internal(message))
            }
            Err(e) => {
                error!("Uploading file '{}' to amazon S3 failed: {}", filename, e);
                Err(e.into())
            }
        }
    }

    /// Delete a media object
    ///
    /// Failures are only logged.
    pub async fn delete(&self, id_or_filename: &str) {
        match self.client.delete_object(id_or_filename).await {
            Ok(status) => {
                debug!(
                    "Amazon S3 file deleted {} with status {}",
                    id_or_filename, status
                );
            }
            Err(e) => {
                warn!("Deleting file '{}' from S3 failed: {}", id_or_filename, e);
            }
        }
    }

    /// Replace the custom metadata of a stored object
    ///
    /// An empty map is a no-op and does not contact S3. The replacing copy
    /// drops every stored header, so the current content type is read first
    /// and sent along with the new metadata.
    pub async fn update_metadata(&self, key: &str, metadata: &MediaMetadata) -> Result<()> {
        if metadata.is_empty() {
            return Ok(());
        }

        let mut headers = encode_metadata(metadata);
        validate_headers(&headers)?;

        let head = self.client.head_object(key).await?;
        if !head.is_success() {
            return Err(AppError::Internal(format!(
                "Updating metadata for file {} failed with status {}",
                key, head.status
            )));
        }
        if let Some(content_type) = head.header("content-type") {
            headers.push(("content-type".to_string(), content_type.to_string()));
        }

        let status = self.client.replace_metadata(key, &headers).await?;
        if !is_success(status) {
            return Err(AppError::Internal(format!(
                "Updating metadata for file {} failed with status {}",
                key, status
            )));
        }

        debug!("Updated metadata for '{}' ({} entries)", key, metadata.len());
        Ok(())
    }

    /// List the objects of the bound bucket, starting after `marker`
    pub async fn bucket_objects(&self, marker: Option<&str>) -> Result<ListPage> {
        let (status, page) = self.client.list_objects(marker).await?;
        if !is_success(status) {
            return Err(AppError::Internal(format!(
                "Retrieving the list of files from bucket {} failed with status {}",
                self.container_name, status
            )));
        }
        Ok(page)
    }

    async fn lookup(&self, id_or_filename: &str) -> Lookup {
        self.client.head_object(id_or_filename).await.into()
    }
}

#[async_trait]
impl MediaStorage for AmazonMediaStorage {
    async fn get(&self, id_or_filename: &str) -> Option<StoredMedia> {
        AmazonMediaStorage::get(self, id_or_filename).await
    }

    async fn put(
        &self,
        content: &[u8],
        filename: &str,
        content_type: &str,
        metadata: Option<&MediaMetadata>,
    ) -> Result<String> {
        AmazonMediaStorage::put(self, content, filename, content_type, metadata).await
    }

    async fn delete(&self, id_or_filename: &str) {
        AmazonMediaStorage::delete(self, id_or_filename).await
    }

    async fn exists(&self, id_or_filename: &str) -> bool {
        AmazonMediaStorage::exists(self, id_or_filename).await
    }
}
