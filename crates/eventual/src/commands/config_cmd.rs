//! Config subcommand handlers.

use dialoguer::{Confirm, Input, Select};

use eventual_api::DEFAULT_GEOCODER_URL;
use eventual_core::DEFAULT_API_URL;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, IdentityProfile, Profile};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

const PROVIDERS: &[&str] = &["google", "facebook"];

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of the config safe to print: plaintext tokens are masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if let Some(token) = profile.identity.as_mut().and_then(|i| i.token.as_mut()) {
            *token = "********".into();
        }
    }
    cfg
}

fn prompt_token(profile_name: &str) -> Result<String, CliError> {
    let token = rpassword::prompt_password(format!("Identity token for '{profile_name}': "))
        .map_err(prompt_err)?;
    if token.is_empty() {
        return Err(CliError::Validation {
            field: "token".into(),
            reason: "identity token cannot be empty".into(),
        });
    }
    Ok(token)
}

fn optional(value: String) -> Option<String> {
    Some(value).filter(|v| !v.trim().is_empty())
}

/// Guided entry of the account a profile signs in as.
fn prompt_identity(profile_name: &str) -> Result<IdentityProfile, CliError> {
    let provider = Select::new()
        .with_prompt("Identity provider")
        .items(PROVIDERS)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let oauth_id: String = Input::new()
        .with_prompt("Provider account ID")
        .interact_text()
        .map_err(prompt_err)?;
    let email: String = Input::new()
        .with_prompt("Email")
        .interact_text()
        .map_err(prompt_err)?;
    let display_name: String = Input::new()
        .with_prompt("Display name")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;
    let avatar_url: String = Input::new()
        .with_prompt("Avatar URL (optional)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;

    let token = prompt_token(profile_name)?;
    let store_choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let store_selection = Select::new()
        .with_prompt("Where to store the identity token?")
        .items(store_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let token = if store_selection == 0 {
        eventual_config::store_id_token(profile_name, &token)?;
        eprintln!("   ✓ Identity token stored in system keyring");
        None
    } else {
        Some(token)
    };

    Ok(IdentityProfile {
        provider: PROVIDERS.get(provider).copied().unwrap_or("google").into(),
        oauth_id,
        email: optional(email),
        display_name: optional(display_name),
        avatar_url: optional(avatar_url),
        token,
        token_env: None,
    })
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("✨ Eventual: configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let api_url: String = Input::new()
                .with_prompt("Backend URL")
                .default(DEFAULT_API_URL.into())
                .interact_text()
                .map_err(prompt_err)?;

            let geocoder_url: String = Input::new()
                .with_prompt("Geocoder URL")
                .default(DEFAULT_GEOCODER_URL.into())
                .interact_text()
                .map_err(prompt_err)?;

            let with_identity = Confirm::new()
                .with_prompt("Record an account to sign in as?")
                .default(true)
                .interact()
                .map_err(prompt_err)?;
            let identity = if with_identity {
                Some(prompt_identity(&profile_name)?)
            } else {
                None
            };

            let profile = Profile {
                api_url,
                geocoder_url,
                identity,
                ..Profile::default()
            };

            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());
            config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Try it: eventual events search \"Madrid\"");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(
                &global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|_| format!("{c:#?}")),
                |_| "config".into(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            set_key(profile, &key, value)?;
            config::save_config(&cfg)?;
            eprintln!("✓ Set {key} on profile '{profile_name}'");
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: eventual config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(config::profile_not_found(&name, &cfg));
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        // ── SetToken ────────────────────────────────────────────────
        ConfigCommand::SetToken { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(config::profile_not_found(&profile_name, &cfg));
            }
            let token = prompt_token(&profile_name)?;
            eventual_config::store_id_token(&profile_name, &token)?;
            eprintln!("✓ Identity token stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}

/// Apply one `config set` assignment to a profile.
fn set_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "api_url" | "api-url" => profile.api_url = value,
        "api_version" | "api-version" => profile.api_version = value,
        "geocoder_url" | "geocoder-url" => profile.geocoder_url = value,
        "insecure" => {
            profile.insecure = Some(value.parse().map_err(|_| CliError::Validation {
                field: "insecure".into(),
                reason: "must be 'true' or 'false'".into(),
            })?);
        }
        "timeout" => {
            profile.timeout = Some(value.parse().map_err(|_| CliError::Validation {
                field: "timeout".into(),
                reason: "must be a number (seconds)".into(),
            })?);
        }
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "token_env" | "token-env" => {
            let identity = profile.identity.as_mut().ok_or_else(|| CliError::Validation {
                field: "token_env".into(),
                reason: "the profile has no identity; run `eventual config init` first".into(),
            })?;
            identity.token_env = Some(value);
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: api_url, api_version, \
                     geocoder_url, insecure, timeout, ca_cert, token_env"
                ),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_key_updates_profile_fields() {
        let mut profile = Profile::default();
        assert!(set_key(&mut profile, "timeout", "5".into()).is_ok());
        assert!(set_key(&mut profile, "api-url", "http://localhost:8000".into()).is_ok());
        assert_eq!(profile.timeout, Some(5));
        assert_eq!(profile.api_url, "http://localhost:8000");
    }

    #[test]
    fn set_key_rejects_unknown_and_malformed_values() {
        let mut profile = Profile::default();
        assert!(set_key(&mut profile, "colour", "red".into()).is_err());
        assert!(set_key(&mut profile, "insecure", "maybe".into()).is_err());
        assert!(set_key(&mut profile, "token_env", "TOKEN".into()).is_err());
    }

    #[test]
    fn show_masks_plaintext_tokens() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                identity: Some(IdentityProfile {
                    provider: "google".into(),
                    oauth_id: "uid-1".into(),
                    email: None,
                    display_name: None,
                    avatar_url: None,
                    token: Some("secret".into()),
                    token_env: None,
                }),
                ..Profile::default()
            },
        );
        let shown = redacted(&cfg);
        let token = shown
            .profiles
            .get("default")
            .and_then(|p| p.identity.as_ref())
            .and_then(|i| i.token.clone());
        assert_eq!(token.as_deref(), Some("********"));
    }
}
