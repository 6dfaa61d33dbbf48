use shared::AppConfig;
use shared::config::{
    BACKEND_URL_KEY, CACHE_CONTROL_KEY, SUPABASE_ANON_KEY_KEY, SUPABASE_URL_KEY, UPLOAD_BUCKET_KEY,
};

/// Reads the build-time environment baked in by the bundler.
pub fn load() -> AppConfig {
    let config = AppConfig::from_lookup(|key| {
        let value = match key {
            BACKEND_URL_KEY => option_env!("BACKEND_URL"),
            SUPABASE_URL_KEY => option_env!("SUPABASE_URL"),
            SUPABASE_ANON_KEY_KEY => option_env!("SUPABASE_ANON_KEY"),
            UPLOAD_BUCKET_KEY => option_env!("UPLOAD_BUCKET"),
            CACHE_CONTROL_KEY => option_env!("UPLOAD_CACHE_SECONDS"),
            _ => None,
        };
        value.map(str::to_owned)
    });

    if config.is_provider_configured() {
        log::info!("Auth/storage provider: {}", config.supabase_url);
    } else {
        log::warn!("SUPABASE_URL or SUPABASE_ANON_KEY not set; sign-in and uploads will fail");
    }
    log::info!("Generation endpoint: {}", config.generate_endpoint());

    config
}
