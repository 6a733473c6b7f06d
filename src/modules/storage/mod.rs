//! Storage module for media files
//!
//! Provides the storage-agnostic [`MediaStorage`] contract and its Amazon S3
//! implementation, including the `x-amz-meta-` metadata codec.

mod amazon_media_storage;
mod client;
mod metadata;
mod s3_client;
mod traits;

pub use amazon_media_storage::{AmazonMediaStorage, StoredMedia};
pub use client::{
    is_success, ListPage, ObjectResponse, ObjectStoreClient, ObjectSummary, StoreError,
};
pub use metadata::{decode_metadata, encode_metadata, MediaMetadata, USER_METADATA_HEADER};
pub use s3_client::S3ObjectClient;
pub use traits::MediaStorage;
