use serde::Deserialize;

use crate::error::StorageError;
use crate::session::UserId;

pub const UPLOAD_PREFIX: &str = "user_uploads";
pub const ACCEPTED_TYPES: [&str; 2] = ["image/png", "image/jpeg"];

pub fn is_accepted_type(mime_type: &str) -> bool {
    ACCEPTED_TYPES.contains(&mime_type)
}

pub fn extension_for(mime_type: &str) -> Option<&'static str> {
    match mime_type {
        "image/png" => Some("png"),
        "image/jpeg" => Some("jpg"),
        _ => None,
    }
}

/// Extension of the picked file name, falling back to the one implied by its type.
pub fn file_extension(file_name: &str, mime_type: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
        .map(str::to_owned)
        .or_else(|| extension_for(mime_type).map(str::to_owned))
        .unwrap_or_else(|| "bin".to_string())
}

/// Object path of an upload: `user_uploads/<user id>/<timestamp ms>.<ext>`.
pub fn storage_path(user_id: &UserId, timestamp_ms: u64, file_name: &str, mime_type: &str) -> String {
    format!(
        "{}/{}/{}.{}",
        UPLOAD_PREFIX,
        user_id,
        timestamp_ms,
        file_extension(file_name, mime_type)
    )
}

pub fn object_url(storage_url: &str, bucket: &str, path: &str) -> String {
    format!("{}/object/{}/{}", storage_url.trim_end_matches('/'), bucket, path)
}

pub fn public_object_url(storage_url: &str, bucket: &str, path: &str) -> String {
    format!("{}/object/public/{}/{}", storage_url.trim_end_matches('/'), bucket, path)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadOptions {
    pub cache_control_secs: u32,
    pub upsert: bool,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            cache_control_secs: 3600,
            upsert: false,
        }
    }
}

impl UploadOptions {
    pub fn cache_control_header(&self) -> String {
        format!("max-age={}", self.cache_control_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
struct StorageErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl StorageError {
    /// Builds the error from a failed upload response, preferring the body's `message`.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: StorageErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = parsed
            .message
            .or(parsed.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("status {}", status));
        StorageError::Rejected(message)
    }
}

/// Object store that receives the picked image before generation.
#[allow(async_fn_in_trait)]
pub trait ObjectStorage {
    type Payload;

    async fn upload(
        &self,
        path: &str,
        payload: &Self::Payload,
        content_type: &str,
        options: &UploadOptions,
    ) -> Result<(), StorageError>;

    fn public_url(&self, path: &str) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_path() {
        let path = storage_path(&UserId::from("u1"), 1_700_000_000_000, "car.png", "image/png");
        assert_eq!(path, "user_uploads/u1/1700000000000.png");
    }

    #[test]
    fn test_extension_preserved_from_name() {
        assert_eq!(file_extension("IMG_0001.JPEG", "image/jpeg"), "JPEG");
        assert_eq!(file_extension("archive.tar.jpg", "image/jpeg"), "jpg");
    }

    #[test]
    fn test_extension_falls_back_to_type() {
        assert_eq!(file_extension("photo", "image/jpeg"), "jpg");
        assert_eq!(file_extension("photo.", "image/png"), "png");
        assert_eq!(file_extension("photo", "image/gif"), "bin");
        assert_eq!(extension_for("image/png"), Some("png"));
        assert_eq!(extension_for("image/gif"), None);
    }

    #[test]
    fn test_accepted_types() {
        assert!(is_accepted_type("image/png"));
        assert!(is_accepted_type("image/jpeg"));
        assert!(!is_accepted_type("image/webp"));
        assert!(!is_accepted_type(""));
    }

    #[test]
    fn test_object_urls() {
        let base = "https://proj.example.co/storage/v1/";
        assert_eq!(
            object_url(base, "uploadsrollers", "user_uploads/u1/1.png"),
            "https://proj.example.co/storage/v1/object/uploadsrollers/user_uploads/u1/1.png"
        );
        assert_eq!(
            public_object_url(base, "uploadsrollers", "user_uploads/u1/1.png"),
            "https://proj.example.co/storage/v1/object/public/uploadsrollers/user_uploads/u1/1.png"
        );
    }

    #[test]
    fn test_error_from_response() {
        let err = StorageError::from_response(
            400,
            r#"{"statusCode":"413","error":"Payload too large","message":"quota exceeded"}"#,
        );
        assert_eq!(err, StorageError::Rejected("quota exceeded".into()));

        let err = StorageError::from_response(409, r#"{"error":"Duplicate"}"#);
        assert_eq!(err, StorageError::Rejected("Duplicate".into()));

        let err = StorageError::from_response(502, "<html>bad gateway</html>");
        assert_eq!(err, StorageError::Rejected("status 502".into()));
    }

    #[test]
    fn test_upload_options() {
        let options = UploadOptions::default();
        assert!(!options.upsert);
        assert_eq!(options.cache_control_header(), "max-age=3600");
    }
}
