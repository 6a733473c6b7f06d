//! Wire-level seam between the media adapter and an S3-compatible service.
//!
//! Implementations report provider status codes as data. Only failures that
//! prevent a status from being obtained at all (DNS, TLS, signing, a dropped
//! connection) are returned as [`StoreError`].

use std::collections::HashMap;

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue};
use thiserror::Error;

/// Failure of the underlying object-storage transport.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("S3 request failed: {0}")]
    S3(#[from] s3::error::S3Error),

    #[error("S3 credentials rejected: {0}")]
    Credentials(#[from] s3::creds::error::CredentialsError),

    #[error("Header '{0}' cannot be sent to S3")]
    InvalidHeader(String),

    #[error("Object store unavailable: {0}")]
    Unavailable(String),
}

/// Raw provider response for a HEAD or GET request.
#[derive(Debug, Clone, Default)]
pub struct ObjectResponse {
    pub status: u16,
    /// Response headers with lowercase names
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl ObjectResponse {
    pub fn is_success(&self) -> bool {
        is_success(self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// One object of a bucket listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub size: u64,
    pub last_modified: String,
    pub e_tag: Option<String>,
}

/// A page of a bucket listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub objects: Vec<ObjectSummary>,
    /// Marker to pass to the next listing call, `None` on the last page
    pub next_marker: Option<String>,
}

/// Statuses the provider uses to acknowledge a successful request.
pub fn is_success(status: u16) -> bool {
    matches!(status, 200 | 201)
}

/// Reject headers the HTTP layer cannot carry, before any request is built.
pub fn validate_headers(headers: &[(String, String)]) -> Result<(), StoreError> {
    for (name, value) in headers {
        if HeaderName::from_bytes(name.as_bytes()).is_err() || HeaderValue::from_str(value).is_err()
        {
            return Err(StoreError::InvalidHeader(name.clone()));
        }
    }
    Ok(())
}

#[async_trait]
pub trait ObjectStoreClient: Send + Sync {
    async fn head_object(&self, key: &str) -> Result<ObjectResponse, StoreError>;

    async fn get_object(&self, key: &str) -> Result<ObjectResponse, StoreError>;

    /// Upload `content` with the given extra request headers, returning the status code
    async fn put_object(
        &self,
        key: &str,
        content: &[u8],
        content_type: &str,
        headers: &[(String, String)],
    ) -> Result<u16, StoreError>;

    /// Replace the custom metadata of an existing object
    async fn replace_metadata(
        &self,
        key: &str,
        headers: &[(String, String)],
    ) -> Result<u16, StoreError>;

    async fn delete_object(&self, key: &str) -> Result<u16, StoreError>;

    /// List objects whose keys sort after `marker`
    async fn list_objects(&self, marker: Option<&str>) -> Result<(u16, ListPage), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_success() {
        assert!(is_success(200));
        assert!(is_success(201));
        assert!(!is_success(204));
        assert!(!is_success(403));
        assert!(!is_success(404));
        assert!(!is_success(500));
    }

    fn header(name: &str, value: &str) -> Vec<(String, String)> {
        vec![(name.to_string(), value.to_string())]
    }

    #[test]
    fn test_validate_headers() {
        assert!(validate_headers(&header("x-amz-meta-byline", "\"AP\"")).is_ok());
        assert!(validate_headers(&header("x-amz-meta-crop_16x9", "{\"a\":[1,2]}")).is_ok());

        for (name, value) in [
            ("x-amz-meta-bad key", "1"),
            ("x-amz-meta-colon:", "1"),
            ("", "1"),
            ("x-amz-meta-ok", "line\nbreak"),
        ] {
            match validate_headers(&header(name, value)) {
                Err(StoreError::InvalidHeader(rejected)) => assert_eq!(rejected, name),
                other => panic!("expected invalid header for {:?}, got {:?}", name, other),
            }
        }
    }
}
