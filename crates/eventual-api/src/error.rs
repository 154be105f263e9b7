use thiserror::Error;

/// Top-level error type for the `eventual-api` crate.
///
/// Every non-2xx answer from the backend or the geocoder lands in
/// [`Error::Status`]; callers never inspect raw status codes to decide
/// whether a call succeeded. `eventual-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The configured base URL cannot carry path segments (e.g. `mailto:`).
    #[error("Base URL cannot be extended with a path: {0}")]
    CannotBeABase(String),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Local file access failed (e.g. reading a CA certificate).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ── Server responses ────────────────────────────────────────────
    /// The server answered outside the 2xx range.
    #[error("HTTP {status}: {}", detail.as_deref().unwrap_or("request failed"))]
    Status {
        status: u16,
        /// The `detail` field of the error body, when the server sent one.
        detail: Option<String>,
        body: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A request body could not be encoded as JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    // ── Contract ────────────────────────────────────────────────────
    /// The resource does not accept this operation.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
}

impl Error {
    /// HTTP status code of a server-side failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// Returns `true` if the server could not be reached at all.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_connect())
    }
}
