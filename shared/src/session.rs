use std::cell::RefCell;
use std::rc::{Rc, Weak};

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Provider-assigned id of a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// The signed-in actor, as returned by the auth provider's user endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
}

impl Identity {
    pub fn new(id: impl Into<UserId>, email: Option<String>) -> Self {
        Self {
            id: id.into(),
            email,
        }
    }

    pub fn display_label(&self) -> &str {
        self.email.as_deref().unwrap_or(self.id.as_str())
    }
}

/// Tokens handed back by the provider after a federated sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSession {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_type: String,
    /// Unix seconds.
    pub expires_at: Option<u64>,
}

impl ProviderSession {
    /// Parses the implicit-grant response the provider appends to the redirect URL,
    /// e.g. `#access_token=...&expires_in=3600&refresh_token=...&token_type=bearer`.
    pub fn from_fragment(fragment: &str, now_secs: u64) -> Option<Self> {
        let fragment = fragment.trim_start_matches('#');
        let mut access_token = None;
        let mut refresh_token = None;
        let mut token_type = None;
        let mut expires_at = None;
        let mut expires_in = None;

        for (key, value) in form_urlencoded::parse(fragment.as_bytes()) {
            match &*key {
                "access_token" if !value.is_empty() => access_token = Some(value.into_owned()),
                "refresh_token" if !value.is_empty() => refresh_token = Some(value.into_owned()),
                "token_type" => token_type = Some(value.into_owned()),
                "expires_at" => expires_at = value.parse::<u64>().ok(),
                "expires_in" => expires_in = value.parse::<u64>().ok(),
                _ => {}
            }
        }

        Some(Self {
            access_token: access_token?,
            refresh_token,
            token_type: token_type.unwrap_or_else(|| "bearer".to_string()),
            expires_at: expires_at.or_else(|| expires_in.map(|secs| now_secs.saturating_add(secs))),
        })
    }

    pub fn is_expired(&self, now_secs: u64) -> bool {
        self.expires_at.is_some_and(|at| at <= now_secs)
    }
}

/// Error description the provider puts in the redirect fragment when sign-in fails.
pub fn fragment_error(fragment: &str) -> Option<String> {
    let pairs: Vec<_> = form_urlencoded::parse(fragment.trim_start_matches('#').as_bytes()).collect();
    pairs
        .iter()
        .find(|(key, _)| key == "error_description")
        .or_else(|| pairs.iter().find(|(key, _)| key == "error"))
        .map(|(_, value)| value.to_string())
}

/// URL that starts the provider's federated sign-in.
pub fn authorize_url(auth_url: &str, provider: &str, redirect_to: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("provider", provider)
        .append_pair("redirect_to", redirect_to)
        .finish();
    format!("{}/authorize?{}", auth_url.trim_end_matches('/'), query)
}

type Listener = Rc<dyn Fn(Option<Identity>)>;

#[derive(Default)]
struct HubInner {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Push-style auth state channel. Every published change reaches every live
/// subscription in registration order.
#[derive(Clone, Default)]
pub struct SessionHub {
    inner: Rc<RefCell<HubInner>>,
}

impl SessionHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(Option<Identity>) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.listeners.push((id, Rc::new(listener)));
        log::debug!("Auth listener {} registered", id);

        Subscription {
            id,
            hub: Rc::downgrade(&self.inner),
        }
    }

    pub fn publish(&self, identity: Option<Identity>) {
        // Listeners may subscribe or drop subscriptions while being notified.
        let listeners: Vec<Listener> = {
            let inner = self.inner.borrow();
            inner.listeners.iter().map(|(_, l)| Rc::clone(l)).collect()
        };

        for listener in listeners {
            listener(identity.clone());
        }
    }

    #[cfg(test)]
    fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// Live registration on a [`SessionHub`]; unregisters when dropped.
#[must_use = "dropping the subscription unregisters the listener"]
pub struct Subscription {
    id: u64,
    hub: Weak<RefCell<HubInner>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.hub.upgrade() {
            inner.borrow_mut().listeners.retain(|(id, _)| *id != self.id);
            log::debug!("Auth listener {} released", self.id);
        }
    }
}
