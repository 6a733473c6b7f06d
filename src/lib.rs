//! Amazon S3 media storage
//!
//! Stores, fetches and describes binary media objects in a single S3 bucket,
//! carrying caller metadata as `x-amz-meta-` headers, and serves them over a
//! small HTTP API.

pub mod core;
pub mod features;
pub mod modules;
pub mod shared;

pub use crate::core::config::{AmazonConfig, Config};
pub use crate::core::error::{AppError, Result};
pub use crate::modules::storage::{
    AmazonMediaStorage, MediaMetadata, MediaStorage, S3ObjectClient, StoredMedia,
};
