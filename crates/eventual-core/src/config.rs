// ── Runtime client configuration ──
//
// Describes *where* the backend and geocoder live and how to reach them.
// Never touches disk: the CLI resolves a profile into a `ClientConfig`
// and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use eventual_api::{TlsMode, TransportConfig};
use url::Url;

/// Hosted backend the app ships against.
pub const DEFAULT_API_URL: &str = "https://parcial3-web-server.vercel.app";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed local backends).
    DangerAcceptInvalid,
}

/// Everything needed to build the backend client and the geocoder.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend root, e.g. `https://parcial3-web-server.vercel.app`.
    pub api_url: Url,
    /// Version segment placed before every entity (`v1`).
    pub api_version: String,
    /// Nominatim-compatible geocoder root.
    pub geocoder_url: Url,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Config for `api_url` with stock version, geocoder, TLS and timeout.
    pub fn new(api_url: Url, geocoder_url: Url) -> Self {
        Self {
            api_url,
            api_version: eventual_api::DEFAULT_VERSION.into(),
            geocoder_url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }
}
