use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::params::GenerationParameters;

pub const GENERATE_PATH: &str = "/generate-image/";
pub const DOWNLOAD_FILE_NAME: &str = "rollersai_result.png";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateRequest {
    pub image_url: String,
    #[serde(flatten)]
    pub params: GenerationParameters,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenerateResponse {
    pub image: String,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateErrorBody {
    error: Option<String>,
}

impl GenerationError {
    /// Uses the server's `error` field when present, else a generic status text.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: GenerateErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = parsed
            .error
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Request failed with status code {}", status));
        GenerationError::Server { status, message }
    }
}

/// Remote endpoint that renders the car into the requested scene.
#[allow(async_fn_in_trait)]
pub trait GenerationApi {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, GenerationError>;
}

/// Generated image, kept as a data URL so it can be shown and downloaded directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    data_url: String,
    byte_len: usize,
}

impl GeneratedImage {
    /// Accepts line-wrapped payloads; whitespace is dropped before decoding.
    pub fn from_base64(encoded: &str) -> Result<Self, base64::DecodeError> {
        let encoded: String = encoded.split_ascii_whitespace().collect();
        let bytes = STANDARD.decode(&encoded)?;
        Ok(Self {
            data_url: format!("data:image/png;base64,{}", encoded),
            byte_len: bytes.len(),
        })
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    pub fn byte_len(&self) -> usize {
        self.byte_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::GenerationParameters;

    #[test]
    fn test_request_body_shape() {
        let request = GenerateRequest {
            image_url: "https://store/u1.png".into(),
            params: GenerationParameters::default(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "image_url": "https://store/u1.png",
                "time": "daytime",
                "setting": "city skyline",
                "ambiance": "calm",
                "lighting": "natural lighting"
            })
        );
    }

    #[test]
    fn test_png_data_url() {
        let response: GenerateResponse = serde_json::from_str(r#"{"image":"iVBORw0K"}"#).unwrap();
        let image = GeneratedImage::from_base64(&response.image).unwrap();
        assert_eq!(image.data_url(), "data:image/png;base64,iVBORw0K");
        assert_eq!(image.byte_len(), 6);
    }

    #[test]
    fn test_wrapped_payload_is_accepted() {
        let wrapped = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA\n\
                       60e6kgAAAABJRU5ErkJggg==\n";
        let image = GeneratedImage::from_base64(wrapped).unwrap();
        assert_eq!(
            image.data_url(),
            "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg=="
        );
        assert_eq!(image.byte_len(), 70);
    }

    #[test]
    fn test_rejects_invalid_payload() {
        assert!(GeneratedImage::from_base64("not base64!").is_err());
    }

    #[test]
    fn test_error_from_response() {
        let err = GenerationError::from_response(500, r#"{"error":"GPU out of memory"}"#);
        assert_eq!(err.to_string(), "GPU out of memory");

        let err = GenerationError::from_response(404, "Not Found");
        assert_eq!(err.to_string(), "Request failed with status code 404");
    }
}
