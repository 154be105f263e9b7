//! Profile-backed identity provider.
//!
//! A terminal cannot open a provider popup, so the account a profile signs
//! in as is recorded in its `[profiles.<name>.identity]` table and the
//! identity token is resolved from env, keyring, or the file.

use async_trait::async_trait;
use tracing::debug;

use eventual_config::{ConfigError, IdentityProfile};
use eventual_core::{AuthProvider, CoreError, ExternalIdentity, IdentityProvider};

#[derive(Debug, Clone)]
pub struct ProfileIdentity {
    profile_name: String,
    identity: Option<IdentityProfile>,
}

impl ProfileIdentity {
    pub fn new(profile_name: impl Into<String>, identity: Option<IdentityProfile>) -> Self {
        Self {
            profile_name: profile_name.into(),
            identity,
        }
    }

    pub fn profile_name(&self) -> &str {
        &self.profile_name
    }

    /// The configured account, if any.
    pub fn configured(&self) -> Result<&IdentityProfile, ConfigError> {
        self.identity.as_ref().ok_or_else(|| ConfigError::NoIdentity {
            profile: self.profile_name.clone(),
        })
    }

    /// Provider the profile is recorded against.
    pub fn provider(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.provider.as_str())
    }
}

#[async_trait]
impl IdentityProvider for ProfileIdentity {
    async fn sign_in(&self, provider: AuthProvider) -> Result<ExternalIdentity, CoreError> {
        let identity = self.configured().map_err(|e| CoreError::Identity {
            message: e.to_string(),
        })?;

        if !identity.provider.eq_ignore_ascii_case(&provider.to_string()) {
            return Err(CoreError::Identity {
                message: format!(
                    "profile '{}' signs in with {}, not {provider}",
                    self.profile_name, identity.provider
                ),
            });
        }

        let id_token = eventual_config::resolve_id_token(identity, &self.profile_name).map_err(
            |e| CoreError::Identity {
                message: e.to_string(),
            },
        )?;
        debug!(profile = %self.profile_name, uid = %identity.oauth_id, "identity resolved");

        Ok(ExternalIdentity {
            uid: identity.oauth_id.clone(),
            email: identity.email.clone(),
            display_name: identity.display_name.clone(),
            photo_url: identity.avatar_url.clone(),
            id_token,
        })
    }

    async fn sign_out(&self) -> Result<(), CoreError> {
        debug!(profile = %self.profile_name, "provider sign-out");
        Ok(())
    }
}
