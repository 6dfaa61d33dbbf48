use std::rc::Rc;

use gloo_net::http::Request;
use gloo_storage::{LocalStorage, Storage};
use js_sys::Date;
use shared::session::{authorize_url, fragment_error};
use shared::{AppConfig, AuthError, Identity, ProviderSession, SessionHub, Subscription};
use wasm_bindgen::JsValue;

const SESSION_KEY: &str = "rollers_ai.session";
const OAUTH_PROVIDER: &str = "google";

fn now_secs() -> u64 {
    (Date::now() / 1000.0) as u64
}

/// Session tracker backed by the provider's auth REST API.
///
/// Tokens live in local storage; identity changes are pushed through a
/// [`SessionHub`] so components can follow sign-out without polling.
#[derive(Clone)]
pub struct AuthService {
    config: Rc<AppConfig>,
    hub: SessionHub,
}

impl AuthService {
    pub fn new(config: Rc<AppConfig>) -> Self {
        Self {
            config,
            hub: SessionHub::new(),
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(Option<Identity>) + 'static,
    {
        self.hub.subscribe(listener)
    }

    /// Current session's identity, if any.
    ///
    /// Picks up a sign-in redirect first, then falls back to the stored session.
    /// A session the provider refuses is forgotten and reported as signed out.
    pub async fn get_session(&self) -> Result<Option<Identity>, AuthError> {
        let now = now_secs();

        if let Some(session) = take_redirect_session(now) {
            log::info!("Sign-in redirect received");
            LocalStorage::set(SESSION_KEY, &session).map_err(|e| AuthError::Storage(e.to_string()))?;
        }

        let Some(session) = self.stored_session() else {
            return Ok(None);
        };
        if session.is_expired(now) {
            log::info!("Stored session expired");
            LocalStorage::delete(SESSION_KEY);
            return Ok(None);
        }

        match self.fetch_user(&session).await {
            Ok(identity) => {
                log::info!("Session restored for {}", identity.display_label());
                Ok(Some(identity))
            }
            Err(e) if e.is_unauthorized() => {
                log::warn!("Stored session rejected: {}", e);
                LocalStorage::delete(SESSION_KEY);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.stored_session()
            .filter(|session| !session.is_expired(now_secs()))
            .map(|session| session.access_token)
    }

    /// Leaves the page for the provider's Google sign-in.
    pub fn sign_in_with_oauth(&self) -> Result<(), AuthError> {
        if !self.config.is_provider_configured() {
            return Err(AuthError::MissingConfig("SUPABASE_URL"));
        }
        let window = web_sys::window().ok_or(AuthError::MissingConfig("window"))?;
        let origin = window.location().origin().map_err(js_error)?;
        let url = authorize_url(&self.config.auth_url(), OAUTH_PROVIDER, &origin);

        log::info!("Redirecting to {} sign-in", OAUTH_PROVIDER);
        window.location().set_href(&url).map_err(js_error)
    }

    /// Ends the session with the provider, then announces the sign-out.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let result = match self.stored_session() {
            Some(session) => self.revoke(&session).await,
            None => Ok(()),
        };

        LocalStorage::delete(SESSION_KEY);
        self.hub.publish(None);
        result
    }

    fn stored_session(&self) -> Option<ProviderSession> {
        LocalStorage::get::<ProviderSession>(SESSION_KEY).ok()
    }

    async fn fetch_user(&self, session: &ProviderSession) -> Result<Identity, AuthError> {
        let response = Request::get(&format!("{}/user", self.config.auth_url()))
            .header("apikey", &self.config.supabase_anon_key)
            .header("Authorization", &format!("Bearer {}", session.access_token))
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if !response.ok() {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            return Err(AuthError::Server { status, message });
        }

        response
            .json::<Identity>()
            .await
            .map_err(|e| AuthError::Parse(e.to_string()))
    }

    async fn revoke(&self, session: &ProviderSession) -> Result<(), AuthError> {
        let response = Request::post(&format!("{}/logout", self.config.auth_url()))
            .header("apikey", &self.config.supabase_anon_key)
            .header("Authorization", &format!("Bearer {}", session.access_token))
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if response.ok() {
            Ok(())
        } else {
            let status = response.status();
            let message = response.text().await.unwrap_or_default();
            Err(AuthError::Server { status, message })
        }
    }
}

// Reads and clears the `#access_token=...` fragment left by the provider redirect.
fn take_redirect_session(now: u64) -> Option<ProviderSession> {
    let window = web_sys::window()?;
    let location = window.location();
    let hash = location.hash().ok().filter(|h| h.len() > 1)?;

    let session = ProviderSession::from_fragment(&hash, now);
    if session.is_none() {
        if let Some(error) = fragment_error(&hash) {
            log::error!("Sign-in failed: {}", error);
        } else {
            return None;
        }
    }

    let clean_url = format!(
        "{}{}",
        location.pathname().unwrap_or_default(),
        location.search().unwrap_or_default()
    );
    if let Ok(history) = window.history() {
        let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(&clean_url));
    }

    session
}

fn js_error(value: JsValue) -> AuthError {
    AuthError::Network(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}
