// ── Session / identity store ──
//
// Holds the signed-in user for the lifetime of the process. Sign-in runs
// the external identity flow, then reconciles it with the backend user
// record (registering one on first visit). Failures are logged and leave
// the session unset; nothing here panics or propagates to the caller.

use std::sync::Arc;

use async_trait::async_trait;
use eventual_api::{ApiClient, NewUser, User};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use strum::{Display, EnumString};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::CoreError;

/// Description stored on freshly registered users.
const NEW_USER_DESCRIPTION: &str = "New user registered";
/// Avatar used when the identity carries none.
const DEFAULT_PROFILE_PICTURE: &str = "https://example.com/default-profile.jpg";

// ── Identity types ──────────────────────────────────────────────────

/// External identity providers the app accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Google,
    Facebook,
}

/// What the identity provider hands back after a successful sign-in.
#[derive(Debug, Clone)]
pub struct ExternalIdentity {
    /// Provider-side stable user id.
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    /// Short-lived identity token.
    pub id_token: SecretString,
}

/// The external sign-in flow (popup, device code, stored credentials...).
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, provider: AuthProvider) -> Result<ExternalIdentity, CoreError>;

    async fn sign_out(&self) -> Result<(), CoreError>;
}

/// The authenticated user, as the rest of the app sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub external_id: String,
    pub email: String,
    pub backend_user_id: String,
    pub display_name: Option<String>,
    pub auth_method: AuthProvider,
}

// ── SessionStore ────────────────────────────────────────────────────

/// Shared, observable session state.
///
/// Cheaply cloneable; all clones see the same session.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    api: ApiClient,
    identity: Arc<dyn IdentityProvider>,
    state: watch::Sender<Option<Session>>,
}

impl SessionStore {
    /// Start logged out.
    pub fn new(api: ApiClient, identity: Arc<dyn IdentityProvider>) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            inner: Arc::new(SessionInner {
                api,
                identity,
                state,
            }),
        }
    }

    /// Current session, if any.
    pub fn user(&self) -> Option<Session> {
        self.inner.state.borrow().clone()
    }

    pub fn is_logged(&self) -> bool {
        self.inner.state.borrow().is_some()
    }

    /// Subscribe to sign-in / sign-out transitions.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.inner.state.subscribe()
    }

    /// Whether a backend user exists for this external id.
    ///
    /// Lookup failures count as "no".
    pub async fn is_user(&self, external_id: &str) -> bool {
        match self.inner.api.find_users_by_oauth_id(external_id).await {
            Ok(users) => !users.is_empty(),
            Err(e) => {
                warn!(error = %e, "user lookup failed");
                false
            }
        }
    }

    /// Sign in with the named provider and establish the session.
    ///
    /// Unknown provider names, a failed external flow, and backend errors
    /// are all logged; the session then stays unset and `None` is returned.
    pub async fn login(&self, provider: &str) -> Option<Session> {
        match self.try_login(provider).await {
            Ok(session) => {
                info!(email = %session.email, provider = %session.auth_method, "signed in");
                self.inner.state.send_replace(Some(session.clone()));
                Some(session)
            }
            Err(e) => {
                warn!(error = %e, provider, "sign-in failed");
                None
            }
        }
    }

    async fn try_login(&self, provider: &str) -> Result<Session, CoreError> {
        let provider: AuthProvider = provider.parse().map_err(|_| CoreError::UnknownProvider {
            name: provider.to_owned(),
        })?;

        let identity = self.inner.identity.sign_in(provider).await?;
        debug!(uid = %identity.uid, "external sign-in complete");

        let existing = self.inner.api.find_users_by_oauth_id(&identity.uid).await?;
        match existing.into_iter().next() {
            Some(user) => Ok(session_from(&identity, provider, &user)),
            None => self.register(&identity, provider).await,
        }
    }

    /// Create the backend user for an external identity.
    ///
    /// Returns the session built from the created record; callers that
    /// go through [`login`](Self::login) get it stored automatically.
    pub async fn register(
        &self,
        identity: &ExternalIdentity,
        provider: AuthProvider,
    ) -> Result<Session, CoreError> {
        let payload = new_user(identity, provider);
        let envelope = self.inner.api.create_user(&payload).await?;
        let user = envelope.result.ok_or_else(|| {
            CoreError::Internal("user creation answered without a result".into())
        })?;
        info!(id = %user.id, user_name = %payload.user_name, "registered new user");
        Ok(session_from(identity, provider, &user))
    }

    /// Sign out of the provider and clear the session.
    pub async fn logout(&self) {
        if let Err(e) = self.inner.identity.sign_out().await {
            warn!(error = %e, "provider sign-out failed");
        }
        self.inner.state.send_replace(None);
        debug!("session cleared");
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &*self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn new_user(identity: &ExternalIdentity, provider: AuthProvider) -> NewUser {
    let email = identity.email.clone().unwrap_or_default();
    let user_name = email
        .split_once('@')
        .map(|(local, _)| local)
        .filter(|local| !local.is_empty())
        .map_or_else(|| identity.uid.clone(), str::to_owned);

    NewUser {
        email,
        name: identity.display_name.clone().unwrap_or_default(),
        surname: String::new(),
        description: NEW_USER_DESCRIPTION.into(),
        user_name,
        oauth_id: identity.uid.clone(),
        oauth_provider: provider.to_string(),
        oauth_token: identity.id_token.expose_secret().to_owned(),
        profile_picture: identity
            .photo_url
            .clone()
            .unwrap_or_else(|| DEFAULT_PROFILE_PICTURE.into()),
    }
}

fn session_from(identity: &ExternalIdentity, provider: AuthProvider, user: &User) -> Session {
    let email = if user.email.is_empty() {
        identity.email.clone().unwrap_or_default()
    } else {
        user.email.clone()
    };
    let display_name = Some(user.name.clone())
        .filter(|n| !n.is_empty())
        .or_else(|| identity.display_name.clone());

    Session {
        external_id: identity.uid.clone(),
        email,
        backend_user_id: user.id.clone(),
        display_name,
        auth_method: provider,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(email: Option<&str>) -> ExternalIdentity {
        ExternalIdentity {
            uid: "uid-42".into(),
            email: email.map(Into::into),
            display_name: Some("Ana Pérez".into()),
            photo_url: None,
            id_token: SecretString::from("token".to_owned()),
        }
    }

    #[test]
    fn provider_names_parse_lowercase() {
        assert_eq!("google".parse::<AuthProvider>().ok(), Some(AuthProvider::Google));
        assert_eq!("facebook".parse::<AuthProvider>().ok(), Some(AuthProvider::Facebook));
        assert!("github".parse::<AuthProvider>().is_err());
        assert_eq!(AuthProvider::Facebook.to_string(), "facebook");
    }

    #[test]
    fn new_user_uses_email_local_part() {
        let payload = new_user(&identity(Some("ana@example.com")), AuthProvider::Google);
        assert_eq!(payload.user_name, "ana");
        assert_eq!(payload.description, "New user registered");
        assert_eq!(payload.oauth_provider, "google");
        assert_eq!(payload.oauth_token, "token");
        assert_eq!(payload.profile_picture, DEFAULT_PROFILE_PICTURE);
    }

    #[test]
    fn new_user_without_email_falls_back_to_uid() {
        let payload = new_user(&identity(None), AuthProvider::Facebook);
        assert_eq!(payload.user_name, "uid-42");
        assert_eq!(payload.email, "");
    }

    #[test]
    fn session_prefers_backend_record() {
        let user = User {
            id: "u1".into(),
            email: "stored@example.com".into(),
            name: "Stored".into(),
            ..User::default()
        };
        let s = session_from(&identity(Some("ana@example.com")), AuthProvider::Google, &user);
        assert_eq!(s.backend_user_id, "u1");
        assert_eq!(s.email, "stored@example.com");
        assert_eq!(s.display_name.as_deref(), Some("Stored"));
        assert_eq!(s.external_id, "uid-42");
    }
}
