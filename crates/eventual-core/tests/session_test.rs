// Session store behavior against a mocked backend.
#![allow(clippy::unwrap_used)]

mod common;

use std::sync::atomic::Ordering;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use common::{FakeIdentity, harness};
use eventual_core::AuthProvider;

#[tokio::test]
async fn test_login_registers_unknown_identity_once() {
    let h = harness(FakeIdentity::signing_in_as("uid-1", "ana@example.com", "Ana")).await;

    Mock::given(method("GET"))
        .and(path("/v1/users/oauth/uid-1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "no" })))
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/users"))
        .and(body_partial_json(json!({
            "email": "ana@example.com",
            "name": "Ana",
            "userName": "ana",
            "oauthId": "uid-1",
            "oauthProvider": "google",
            "profilePicture": "https://img.example.com/uid-1.png"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "detail": "El usuario se ha creado correctamente",
            "result": { "_id": "created-7", "email": "ana@example.com", "name": "Ana" }
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let session = h.ctx.session.login("google").await.unwrap();

    assert_eq!(session.backend_user_id, "created-7");
    assert_eq!(session.external_id, "uid-1");
    assert_eq!(session.auth_method, AuthProvider::Google);
    assert!(h.ctx.session.is_logged());
    assert_eq!(h.ctx.session.user(), Some(session));
}

#[tokio::test]
async fn test_login_adopts_existing_record_without_create() {
    let h = harness(FakeIdentity::signing_in_as("uid-2", "bea@example.com", "Bea")).await;

    Mock::given(method("GET"))
        .and(path("/v1/users/oauth/uid-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "existing-3", "email": "bea@example.com", "name": "Beatriz" }
        ])))
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/users"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&h.server)
        .await;

    let session = h.ctx.session.login("google").await.unwrap();

    assert_eq!(session.backend_user_id, "existing-3");
    assert_eq!(session.display_name.as_deref(), Some("Beatriz"));
}

#[tokio::test]
async fn test_failed_external_flow_leaves_logged_out() {
    let h = harness(FakeIdentity::refusing()).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&h.server)
        .await;

    assert!(h.ctx.session.login("google").await.is_none());
    assert!(!h.ctx.session.is_logged());
    assert_eq!(h.identity.sign_ins.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unknown_provider_never_reaches_identity_flow() {
    let h = harness(FakeIdentity::signing_in_as("uid-1", "ana@example.com", "Ana")).await;

    assert!(h.ctx.session.login("myspace").await.is_none());
    assert!(!h.ctx.session.is_logged());
    assert_eq!(h.identity.sign_ins.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_backend_error_during_register_leaves_logged_out() {
    let h = harness(FakeIdentity::signing_in_as("uid-1", "ana@example.com", "Ana")).await;

    Mock::given(method("GET"))
        .and(path("/v1/users/oauth/uid-1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/users"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "detail": "El nombre de usuario ya existe" })),
        )
        .mount(&h.server)
        .await;

    assert!(h.ctx.session.login("google").await.is_none());
    assert!(h.ctx.session.user().is_none());
}

#[tokio::test]
async fn test_is_user_and_logout() {
    let h = harness(FakeIdentity::signing_in_as("uid-2", "bea@example.com", "Bea")).await;

    Mock::given(method("GET"))
        .and(path("/v1/users/oauth/uid-2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "_id": "existing-3" }])),
        )
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/users/oauth/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&h.server)
        .await;

    assert!(h.ctx.session.is_user("uid-2").await);
    assert!(!h.ctx.session.is_user("broken").await);

    let mut rx = h.ctx.session.subscribe();
    h.ctx.session.login("facebook").await.unwrap();
    assert!(rx.borrow_and_update().is_some());

    h.ctx.session.logout().await;
    assert!(!h.ctx.session.is_logged());
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().is_none());
    assert_eq!(h.identity.sign_outs.load(Ordering::SeqCst), 1);
}
