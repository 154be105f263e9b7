// ── Core error types ──
//
// Errors surfaced by eventual-core. Consumers never see HTTP plumbing
// directly; the `From<eventual_api::Error>` impl folds transport-layer
// failures into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Not found: {message}")]
    NotFound { message: String },

    // ── Identity errors ──────────────────────────────────────────────
    #[error("Sign-in failed: {message}")]
    Identity { message: String },

    #[error("Unknown identity provider: {name}")]
    UnknownProvider { name: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Operation not supported: {operation}")]
    Unsupported { operation: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// HTTP status behind this error, when it came from a server answer.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<eventual_api::Error> for CoreError {
    fn from(err: eventual_api::Error) -> Self {
        match err {
            eventual_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            eventual_api::Error::Status {
                status: 404,
                detail,
                body,
            } => CoreError::NotFound {
                message: detail.unwrap_or(body),
            },
            eventual_api::Error::Status {
                status,
                detail,
                body,
            } => CoreError::Api {
                message: detail.unwrap_or(body),
                status: Some(status),
            },
            eventual_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            eventual_api::Error::CannotBeABase(url) => CoreError::Config {
                message: format!("URL cannot carry a path: {url}"),
            },
            eventual_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            eventual_api::Error::Io(e) => CoreError::Internal(format!("IO error: {e}")),
            eventual_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            eventual_api::Error::Serialization(e) => {
                CoreError::Internal(format!("Serialization error: {e}"))
            }
            eventual_api::Error::UnsupportedOperation(op) => CoreError::Unsupported {
                operation: op.to_string(),
            },
        }
    }
}
