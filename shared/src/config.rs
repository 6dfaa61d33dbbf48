use crate::generation::GENERATE_PATH;
use crate::storage::UploadOptions;

pub const BACKEND_URL_KEY: &str = "BACKEND_URL";
pub const SUPABASE_URL_KEY: &str = "SUPABASE_URL";
pub const SUPABASE_ANON_KEY_KEY: &str = "SUPABASE_ANON_KEY";
pub const UPLOAD_BUCKET_KEY: &str = "UPLOAD_BUCKET";
pub const CACHE_CONTROL_KEY: &str = "UPLOAD_CACHE_SECONDS";

const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
const DEFAULT_BUCKET: &str = "uploadsrollers";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub backend_url: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub upload_bucket: String,
    pub upload: UploadOptions,
}

impl AppConfig {
    /// Builds the config from a key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut upload = UploadOptions::default();
        if let Some(raw) = get(CACHE_CONTROL_KEY) {
            match raw.parse() {
                Ok(secs) => upload.cache_control_secs = secs,
                Err(_) => log::warn!("Ignoring invalid {}: {}", CACHE_CONTROL_KEY, raw),
            }
        }

        Self {
            backend_url: get(BACKEND_URL_KEY)
                .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            supabase_url: get(SUPABASE_URL_KEY)
                .unwrap_or_default()
                .trim_end_matches('/')
                .to_string(),
            supabase_anon_key: get(SUPABASE_ANON_KEY_KEY).unwrap_or_default(),
            upload_bucket: get(UPLOAD_BUCKET_KEY).unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            upload,
        }
    }

    pub fn generate_endpoint(&self) -> String {
        format!("{}{}", self.backend_url, GENERATE_PATH)
    }

    pub fn auth_url(&self) -> String {
        format!("{}/auth/v1", self.supabase_url)
    }

    pub fn storage_url(&self) -> String {
        format!("{}/storage/v1", self.supabase_url)
    }

    pub fn is_provider_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_anon_key.is_empty()
    }
}
