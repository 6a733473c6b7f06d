use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::AppError;
use crate::features::media::dtos::{
    MediaExistsDto, MediaUrlDto, UploadMediaResponseDto, DEFAULT_CONTENT_TYPE,
};
use crate::features::media::services::MediaService;
use crate::modules::storage::MediaMetadata;
use crate::shared::types::ApiResponse;

/// Download a media object
pub async fn get_media(
    State(service): State<Arc<MediaService>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let media = service.fetch(&id).await?;

    Ok(([(header::CONTENT_TYPE, media.content_type)], media.content).into_response())
}

/// Upload a media object
///
/// Accepts multipart/form-data with:
/// - `file`: The file to upload (required)
/// - `metadata`: JSON object of custom metadata (optional)
pub async fn upload_media(
    State(service): State<Arc<MediaService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<UploadMediaResponseDto>>), AppError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name = String::from("unnamed");
    let mut content_type = DEFAULT_CONTENT_TYPE.to_string();
    let mut metadata: Option<MediaMetadata> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                if let Some(ct) = field.content_type() {
                    content_type = ct.to_string();
                }
                if let Some(fname) = field.file_name() {
                    file_name = fname.to_string();
                }

                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read file bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;
                file_data = Some(data.to_vec());
            }
            "metadata" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read metadata field: {}", e))
                })?;
                if !text.trim().is_empty() {
                    let parsed = serde_json::from_str::<MediaMetadata>(&text).map_err(|e| {
                        AppError::BadRequest(format!("Metadata must be a JSON object: {}", e))
                    })?;
                    metadata = Some(parsed);
                }
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let file_data =
        file_data.ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;

    let response = service
        .upload(&file_data, &file_name, &content_type, metadata.as_ref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(response), None)),
    ))
}

/// Best-effort delete of a media object
pub async fn delete_media(
    State(service): State<Arc<MediaService>>,
    Path(id): Path<String>,
) -> StatusCode {
    service.delete(&id).await;
    StatusCode::NO_CONTENT
}

pub async fn media_exists(
    State(service): State<Arc<MediaService>>,
    Path(id): Path<String>,
) -> Json<ApiResponse<MediaExistsDto>> {
    let exists = service.exists(&id).await;
    Json(ApiResponse::success(Some(MediaExistsDto { exists }), None))
}

pub async fn media_url(
    State(service): State<Arc<MediaService>>,
    Path(id): Path<String>,
) -> Json<ApiResponse<MediaUrlDto>> {
    let url = service.url(&id);
    Json(ApiResponse::success(Some(MediaUrlDto { url }), None))
}

pub async fn get_media_metadata(
    State(service): State<Arc<MediaService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MediaMetadata>>, AppError> {
    let metadata = service.metadata(&id).await?;
    Ok(Json(ApiResponse::success(Some(metadata), None)))
}

/// Replace the custom metadata of a media object
pub async fn update_media_metadata(
    State(service): State<Arc<MediaService>>,
    Path(id): Path<String>,
    Json(metadata): Json<MediaMetadata>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    service.update_metadata(&id, &metadata).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Metadata updated successfully".to_string()),
    )))
}
