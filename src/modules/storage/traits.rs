use async_trait::async_trait;

use crate::core::error::Result;
use crate::modules::storage::metadata::MediaMetadata;
use crate::modules::storage::StoredMedia;

/// Storage-agnostic contract for media backends.
///
/// Misses are not errors: `get` answers `None` and `exists` answers `false`
/// for objects the backend cannot produce, and `delete` is best-effort.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Open the media stored under `id_or_filename`.
    async fn get(&self, id_or_filename: &str) -> Option<StoredMedia>;

    /// Store `content` under `filename` and return the name it is stored under.
    ///
    /// An existing object with the same name is never overwritten; its name is
    /// returned unchanged.
    async fn put(
        &self,
        content: &[u8],
        filename: &str,
        content_type: &str,
        metadata: Option<&MediaMetadata>,
    ) -> Result<String>;

    async fn delete(&self, id_or_filename: &str);

    async fn exists(&self, id_or_filename: &str) -> bool;
}
