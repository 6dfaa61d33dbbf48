use gloo_net::http::Request;
use shared::{GenerateRequest, GenerateResponse, GenerationApi, GenerationError};

/// Client for the image generation backend.
pub struct GenerationClient {
    endpoint: String,
}

impl GenerationClient {
    pub fn new(endpoint: String) -> Self {
        Self { endpoint }
    }
}

impl GenerationApi for GenerationClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, GenerationError> {
        let response = Request::post(&self.endpoint)
            .json(request)
            .map_err(|e| GenerationError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| {
                log::error!("Generation request failed: {:?}", e);
                GenerationError::Network(e.to_string())
            })?;

        if !response.ok() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("Generation failed with status {}: {}", status, body);
            return Err(GenerationError::from_response(status, &body));
        }

        response
            .json::<GenerateResponse>()
            .await
            .map_err(|e| GenerationError::Parse(e.to_string()))
    }
}
