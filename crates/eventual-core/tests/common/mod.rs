// Shared fixtures for eventual-core integration tests.
#![allow(dead_code, clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use eventual_api::{ApiClient, Geocoder};
use eventual_core::{
    AppContext, AuthProvider, CoreError, ExternalIdentity, History, IdentityProvider, Route,
};

/// Identity provider that hands back a fixed identity, or fails.
pub struct FakeIdentity {
    identity: Option<ExternalIdentity>,
    pub sign_ins: AtomicUsize,
    pub sign_outs: AtomicUsize,
}

impl FakeIdentity {
    pub fn signing_in_as(uid: &str, email: &str, name: &str) -> Self {
        Self {
            identity: Some(ExternalIdentity {
                uid: uid.into(),
                email: Some(email.into()),
                display_name: Some(name.into()),
                photo_url: Some(format!("https://img.example.com/{uid}.png")),
                id_token: SecretString::from("id-token".to_owned()),
            }),
            sign_ins: AtomicUsize::new(0),
            sign_outs: AtomicUsize::new(0),
        }
    }

    pub fn refusing() -> Self {
        Self {
            identity: None,
            sign_ins: AtomicUsize::new(0),
            sign_outs: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn sign_in(&self, _provider: AuthProvider) -> Result<ExternalIdentity, CoreError> {
        self.sign_ins.fetch_add(1, Ordering::SeqCst);
        self.identity.clone().ok_or_else(|| CoreError::Identity {
            message: "popup closed by user".into(),
        })
    }

    async fn sign_out(&self) -> Result<(), CoreError> {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct Harness {
    /// Backend and geocoder share one mock server: the backend lives
    /// under `/v1/...`, the geocoder under `/search`.
    pub server: MockServer,
    pub ctx: AppContext,
    pub history: Arc<History>,
    pub identity: Arc<FakeIdentity>,
}

pub async fn harness(identity: FakeIdentity) -> Harness {
    let server = MockServer::start().await;
    let api = ApiClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    let geocoder = Geocoder::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    let history = Arc::new(History::starting_at(Route::Home));
    let identity = Arc::new(identity);
    let ctx = AppContext::from_parts(api, geocoder, identity.clone(), history.clone());
    Harness {
        server,
        ctx,
        history,
        identity,
    }
}

pub async fn mock_geocode(server: &MockServer, matches: Value) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(matches))
        .mount(server)
        .await;
}

pub fn madrid() -> Value {
    json!([{ "lat": "40.4167", "lon": "-3.7033", "display_name": "Madrid" }])
}

pub fn event_json(id: &str, name: &str) -> Value {
    json!({
        "_id": id,
        "nombre": name,
        "timestamp": "2024-12-01T20:30:00",
        "lugar": "Madrid",
        "lat": 40.4167,
        "lon": -3.7033,
        "organizador": "user",
        "imagen": "https://cdn.example.com/poster.png"
    })
}
