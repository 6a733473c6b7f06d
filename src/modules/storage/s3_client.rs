//! Amazon S3 client
//!
//! Binds one rust-s3 [`Bucket`] to the configured container and region and
//! exposes it through [`ObjectStoreClient`]. rust-s3 is built without its
//! `fail-on-err` feature, so non-success statuses come back as data.

use std::collections::HashMap;

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, Region};
use tracing::{debug, info};

use crate::core::config::AmazonConfig;
use crate::modules::storage::client::{
    validate_headers, ListPage, ObjectResponse, ObjectStoreClient, ObjectSummary, StoreError,
};
use crate::modules::storage::metadata::USER_METADATA_HEADER;

/// S3 storage client bound to a single bucket
pub struct S3ObjectClient {
    bucket: Box<Bucket>,
}

impl S3ObjectClient {
    /// Create a new S3 client from configuration
    ///
    /// The connection always speaks TLS to the regional endpoint and addresses
    /// objects virtual-host style (`https://{bucket}.{endpoint}/{key}`).
    pub fn new(config: &AmazonConfig) -> Result<Self, StoreError> {
        let credentials = Credentials::new(
            Some(&config.access_key_id),
            Some(&config.secret_access_key),
            None,
            None,
            None,
        )?;

        let endpoint = config.endpoint();
        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: format!("https://{}", endpoint),
        };

        let bucket = Bucket::new(&config.container_name, region, credentials)?;

        info!(
            "S3 client initialized for endpoint: {}, bucket: {}",
            endpoint,
            bucket.name()
        );

        Ok(Self { bucket })
    }

    /// Clone the bucket handle with extra headers attached to every request
    fn bucket_with_headers(&self, headers: &[(String, String)]) -> Result<Bucket, StoreError> {
        // add_header panics on names or values the http crate rejects
        validate_headers(headers)?;
        let mut bucket = (*self.bucket).clone();
        for (name, value) in headers {
            bucket.add_header(name, value);
        }
        Ok(bucket)
    }
}

#[async_trait]
impl ObjectStoreClient for S3ObjectClient {
    async fn head_object(&self, key: &str) -> Result<ObjectResponse, StoreError> {
        let (head, status) = self.bucket.head_object(key).await?;

        let mut headers = HashMap::new();
        if let Some(content_type) = head.content_type {
            headers.insert("content-type".to_string(), content_type);
        }
        if let Some(content_length) = head.content_length {
            headers.insert("content-length".to_string(), content_length.to_string());
        }
        for (name, value) in head.metadata.unwrap_or_default() {
            let name = name.to_ascii_lowercase();
            let name = if name.starts_with(USER_METADATA_HEADER) {
                name
            } else {
                format!("{}{}", USER_METADATA_HEADER, name)
            };
            headers.insert(name, value);
        }

        debug!("HEAD '{}' in bucket '{}': {}", key, self.bucket.name(), status);
        Ok(ObjectResponse {
            status,
            headers,
            body: Vec::new(),
        })
    }

    async fn get_object(&self, key: &str) -> Result<ObjectResponse, StoreError> {
        let response = self.bucket.get_object(key).await?;
        let status = response.status_code();
        let headers = response
            .headers()
            .into_iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value))
            .collect();

        debug!("GET '{}' in bucket '{}': {}", key, self.bucket.name(), status);
        Ok(ObjectResponse {
            status,
            headers,
            body: response.bytes().to_vec(),
        })
    }

    async fn put_object(
        &self,
        key: &str,
        content: &[u8],
        content_type: &str,
        headers: &[(String, String)],
    ) -> Result<u16, StoreError> {
        let bucket = self.bucket_with_headers(headers)?;
        let response = bucket
            .put_object_with_content_type(key, content, content_type)
            .await?;
        Ok(response.status_code())
    }

    async fn replace_metadata(
        &self,
        key: &str,
        headers: &[(String, String)],
    ) -> Result<u16, StoreError> {
        // S3 has no in-place metadata update; copy the object onto itself
        let mut headers = headers.to_vec();
        headers.push((
            "x-amz-metadata-directive".to_string(),
            "REPLACE".to_string(),
        ));
        let bucket = self.bucket_with_headers(&headers)?;
        let status = bucket.copy_object_internal(key, key).await?;
        Ok(status)
    }

    async fn delete_object(&self, key: &str) -> Result<u16, StoreError> {
        let response = self.bucket.delete_object(key).await?;
        Ok(response.status_code())
    }

    async fn list_objects(&self, marker: Option<&str>) -> Result<(u16, ListPage), StoreError> {
        let (result, status) = self
            .bucket
            .list_page(String::new(), None, None, marker.map(str::to_string), None)
            .await?;

        let objects: Vec<ObjectSummary> = result
            .contents
            .into_iter()
            .map(|object| ObjectSummary {
                key: object.key,
                size: object.size,
                last_modified: object.last_modified,
                e_tag: object.e_tag,
            })
            .collect();

        let next_marker = if result.is_truncated {
            objects.last().map(|object| object.key.clone())
        } else {
            None
        };

        Ok((
            status,
            ListPage {
                objects,
                next_marker,
            },
        ))
    }
}
