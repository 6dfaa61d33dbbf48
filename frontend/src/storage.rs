use std::rc::Rc;

use gloo_file::{File as GlooFile, ObjectUrl};
use gloo_net::http::Request;
use shared::storage::{object_url, public_object_url};
use shared::{AppConfig, ObjectStorage, StorageError, UploadOptions};

use crate::auth::AuthService;

/// A picked file together with its local preview. Dropping the last clone
/// revokes the preview URL.
#[derive(Clone)]
pub struct PickedImage {
    pub file: GlooFile,
    pub preview: ObjectUrl,
}

impl PickedImage {
    pub fn new(file: GlooFile) -> Self {
        let preview = ObjectUrl::from(file.clone());
        Self { file, preview }
    }
}

/// Bucket uploads through the provider's storage REST API.
pub struct BucketStorage {
    config: Rc<AppConfig>,
    auth: AuthService,
}

impl BucketStorage {
    pub fn new(config: Rc<AppConfig>, auth: AuthService) -> Self {
        Self { config, auth }
    }
}

impl ObjectStorage for BucketStorage {
    type Payload = PickedImage;

    async fn upload(
        &self,
        path: &str,
        payload: &PickedImage,
        content_type: &str,
        options: &UploadOptions,
    ) -> Result<(), StorageError> {
        let url = object_url(&self.config.storage_url(), &self.config.upload_bucket, path);
        let token = self
            .auth
            .access_token()
            .unwrap_or_else(|| self.config.supabase_anon_key.clone());
        let blob: &web_sys::Blob = payload.file.as_ref();

        log::debug!("Uploading {} bytes to {}", payload.file.size(), path);

        let request = Request::post(&url)
            .header("apikey", &self.config.supabase_anon_key)
            .header("Authorization", &format!("Bearer {}", token))
            .header("cache-control", &options.cache_control_header())
            .header("x-upsert", if options.upsert { "true" } else { "false" })
            .header("content-type", content_type)
            .body(blob.clone())
            .map_err(|e| StorageError::Network(e.to_string()))?;

        let response = request
            .send()
            .await
            .map_err(|e| StorageError::Network(e.to_string()))?;

        if response.ok() {
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("Upload of {} rejected: {} - {}", path, status, body);
            Err(StorageError::from_response(status, &body))
        }
    }

    fn public_url(&self, path: &str) -> String {
        public_object_url(&self.config.storage_url(), &self.config.upload_bucket, path)
    }
}
