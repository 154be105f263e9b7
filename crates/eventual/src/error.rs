//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError`, `ScreenError` and `ConfigError` into user-facing
//! errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use eventual_config::ConfigError;
use eventual_core::{CoreError, ScreenError};

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(eventual::connection_failed),
        help(
            "Check your network and the backend URL.\n\
             URL: {url}\n\
             Override it with --api-url or `eventual config set api_url <url>`."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Identity ─────────────────────────────────────────────────────
    #[error("Sign-in failed for profile '{profile}'")]
    #[diagnostic(
        code(eventual::auth_failed),
        help(
            "Check the identity recorded in the profile and its token.\n\
             Run: eventual config set-token --profile {profile}"
        )
    )]
    AuthFailed { profile: String },

    #[error("No identity configured for profile '{profile}'")]
    #[diagnostic(
        code(eventual::no_identity),
        help("Record the account to sign in as with: eventual config init")
    )]
    NoIdentity { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(eventual::not_found),
        help("Run: eventual {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Screen failures ──────────────────────────────────────────────
    #[error("{0}")]
    #[diagnostic(code(eventual::screen))]
    Screen(ScreenError),

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(code(eventual::api_error))]
    ApiError { code: String, message: String },

    #[error("Operation '{operation}' is not supported")]
    #[diagnostic(code(eventual::unsupported))]
    Unsupported { operation: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(eventual::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(eventual::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: eventual config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(eventual::config))]
    Config(Box<ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(eventual::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out")]
    #[diagnostic(
        code(eventual::timeout),
        help("Increase the timeout with --timeout or try again later.")
    )]
    Timeout,

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoIdentity { profile } => Self::NoIdentity { profile },
            ConfigError::NoToken { profile } => Self::AuthFailed { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(Box::new(other)),
        }
    }
}

impl From<ScreenError> for CliError {
    fn from(err: ScreenError) -> Self {
        Self::Screen(err)
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoIdentity { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::Unsupported { .. } => exit_code::PERMISSION,
            Self::Screen(e) => screen_exit_code(*e),
            Self::ApiError { .. } | Self::Config(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

fn screen_exit_code(err: ScreenError) -> i32 {
    match err {
        ScreenError::AddressNotFound | ScreenError::CountryNotFound => exit_code::NOT_FOUND,
        ScreenError::NoSession => exit_code::AUTH,
        _ => exit_code::GENERAL,
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::Timeout => CliError::Timeout,

            CoreError::NotFound { message } => CliError::NotFound {
                resource_type: "record".into(),
                identifier: message,
                list_command: "events list".into(),
            },

            CoreError::Identity { message: _ } => CliError::AuthFailed {
                profile: "current".into(),
            },

            CoreError::UnknownProvider { name } => CliError::Validation {
                field: "provider".into(),
                reason: format!("expected 'google' or 'facebook', got '{name}'"),
            },

            CoreError::Unsupported { operation } => CliError::Unsupported { operation },

            CoreError::Api { message, status } => CliError::ApiError {
                code: status.map_or_else(|| "unknown".into(), |s| s.to_string()),
                message,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::ApiError {
                code: "internal".into(),
                message,
            },
        }
    }
}
