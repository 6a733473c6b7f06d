use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::media::handlers::{
    delete_media, get_media, get_media_metadata, media_exists, media_url, update_media_metadata,
    upload_media,
};
use crate::features::media::services::MediaService;

/// Create routes for the media feature
pub fn routes(media_service: Arc<MediaService>, max_upload_size: usize) -> Router {
    Router::new()
        .route(
            "/api/media",
            // Allow body size up to max_upload_size + buffer for multipart overhead
            post(upload_media).layer(DefaultBodyLimit::max(max_upload_size + 1024 * 1024)),
        )
        .route("/api/media/{id}", get(get_media).delete(delete_media))
        .route("/api/media/{id}/exists", get(media_exists))
        .route("/api/media/{id}/url", get(media_url))
        .route(
            "/api/media/{id}/metadata",
            get(get_media_metadata).patch(update_media_metadata),
        )
        .with_state(media_service)
}
