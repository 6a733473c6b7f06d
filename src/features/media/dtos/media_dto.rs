use serde::{Deserialize, Serialize};

/// Response DTO for a stored upload
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadMediaResponseDto {
    /// Name the media is stored under
    pub id: String,
    /// Public URL of the media
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MediaExistsDto {
    pub exists: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MediaUrlDto {
    pub url: String,
}

/// Content type used when an upload does not declare one
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Get file extension from content type
pub fn get_extension_from_content_type(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "audio/mpeg" => Some("mp3"),
        "video/mp4" => Some("mp4"),
        "application/pdf" => Some("pdf"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_extension_from_content_type() {
        assert_eq!(get_extension_from_content_type("image/jpeg"), Some("jpg"));
        assert_eq!(get_extension_from_content_type("video/mp4"), Some("mp4"));
        assert_eq!(get_extension_from_content_type("text/x-unknown"), None);
    }
}
