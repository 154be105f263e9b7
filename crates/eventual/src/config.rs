//! CLI configuration: thin wrapper around `eventual_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--api-url, --timeout, etc.).

use std::time::Duration;

use eventual_core::{ClientConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use eventual_config::{
    Config, IdentityProfile, Profile, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// The active profile, or stock settings when none is configured.
///
/// Naming a profile explicitly with `--profile` that does not exist is an
/// error; falling back from the config's default is not.
pub fn active_profile(global: &GlobalOpts, config: &Config) -> Result<(String, Profile), CliError> {
    let name = active_profile_name(global, config);
    match config.profiles.get(&name) {
        Some(profile) => Ok((name, profile.clone())),
        None if global.profile.is_some() => Err(profile_not_found(&name, config)),
        None => Ok((name, Profile::default())),
    }
}

pub fn profile_not_found(name: &str, config: &Config) -> CliError {
    let mut available: Vec<_> = config.profiles.keys().cloned().collect();
    available.sort();
    CliError::ProfileNotFound {
        name: name.into(),
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
    }
}

/// Translate a `Profile` + global flags into a `ClientConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    config: &Config,
    global: &GlobalOpts,
) -> Result<ClientConfig, CliError> {
    let mut client = eventual_config::profile_to_client_config(profile, &config.defaults)?;

    // 1. Backend URL (flag > env > profile)
    if let Some(ref raw) = global.api_url {
        client.api_url = parse_url("api_url", raw)?;
    }

    // 2. Geocoder URL
    if let Some(ref raw) = global.geocoder_url {
        client.geocoder_url = parse_url("geocoder_url", raw)?;
    }

    // 3. TLS verification
    if global.insecure {
        client.tls = TlsVerification::DangerAcceptInvalid;
    }

    // 4. Timeout: the flag always carries a value, so it only wins when
    //    moved off its default or when the profile is silent.
    if global.timeout != config.defaults.timeout || profile.timeout.is_none() {
        client.timeout = Duration::from_secs(global.timeout);
    }

    Ok(client)
}

fn parse_url(field: &str, raw: &str) -> Result<url::Url, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("invalid URL: {raw}"),
    })
}
