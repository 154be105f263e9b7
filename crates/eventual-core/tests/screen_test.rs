// Page-screen flows against a mocked backend and geocoder.
#![allow(clippy::unwrap_used)]

mod common;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use common::{FakeIdentity, event_json, harness, madrid, mock_geocode};
use eventual_core::map::CircleKind;
use eventual_core::screen::countries::{CountriesHomeScreen, CountriesViewScreen, CountryCreateScreen};
use eventual_core::screen::event_create::EventCreateScreen;
use eventual_core::screen::event_edit::EventEditScreen;
use eventual_core::screen::event_view::{EventViewScreen, ViewState};
use eventual_core::screen::events_main::EventsMainScreen;
use eventual_core::screen::login::{LoginScreen, LogoutScreen};
use eventual_core::{Event, FormState, ImageFile, Route, ScreenError, SelectedEntity};

fn nobody() -> FakeIdentity {
    FakeIdentity::signing_in_as("uid-1", "ana@example.com", "Ana")
}

// ── Event create ────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_with_unknown_address_never_calls_backend() {
    let h = harness(nobody()).await;
    mock_geocode(&h.server, json!([])).await;

    Mock::given(method("POST"))
        .and(path("/v1/eventos"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&h.server)
        .await;

    let mut screen = EventCreateScreen::new(h.ctx.clone());
    screen.form.name = "Concierto".into();
    screen.form.location = "Atlantis".into();
    screen.form.timestamp = "01/12/2024 20:30".into();

    assert_eq!(screen.submit().await, Err(ScreenError::AddressNotFound));
    assert_eq!(screen.state(), FormState::Failed(ScreenError::AddressNotFound));
    assert_eq!(
        screen.state().error().map(|e| e.message()).as_deref(),
        Some("Address not found")
    );
    assert_eq!(h.history.count(), 0);
}

#[tokio::test]
async fn test_create_success_navigates_home_exactly_once() {
    let h = harness(nobody()).await;
    mock_geocode(&h.server, madrid()).await;

    Mock::given(method("POST"))
        .and(path("/v1/media"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "detail": "ok",
            "result": { "name": "poster.png", "url": "https://cdn.example.com/poster.png" }
        })))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/eventos"))
        .and(body_partial_json(json!({
            "nombre": "Concierto",
            "lugar": "Madrid",
            "lat": 40.4167,
            "lon": -3.7033,
            "organizador": "user",
            "imagen": "https://cdn.example.com/poster.png"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(event_json("e1", "Concierto")))
        .expect(1)
        .mount(&h.server)
        .await;

    let mut screen = EventCreateScreen::new(h.ctx.clone());
    screen
        .attach_image(ImageFile::new("poster.png", vec![1, 2, 3]))
        .await
        .unwrap();
    screen.form.name = "Concierto".into();
    screen.form.location = "Madrid".into();
    screen.form.timestamp = "01/12/2024 20:30".into();

    let created = screen.submit().await.unwrap();

    assert_eq!(created.id, "e1");
    assert_eq!(screen.state(), FormState::Idle);
    assert_eq!(h.history.requests(), vec![Route::Home]);
    assert_eq!(h.ctx.loading().count(), 0);
}

#[tokio::test]
async fn test_create_backend_failure_is_resubmittable() {
    let h = harness(nobody()).await;
    mock_geocode(&h.server, madrid()).await;

    Mock::given(method("POST"))
        .and(path("/v1/eventos"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "detail": "boom" })))
        .mount(&h.server)
        .await;

    let mut screen = EventCreateScreen::new(h.ctx.clone());
    screen.form.location = "Madrid".into();

    assert_eq!(screen.submit().await, Err(ScreenError::CreateEvent));
    assert_eq!(screen.submit().await, Err(ScreenError::CreateEvent));
    assert_eq!(h.history.count(), 0);
}

#[tokio::test]
async fn test_image_upload_failure_keeps_form() {
    let h = harness(nobody()).await;

    Mock::given(method("POST"))
        .and(path("/v1/media"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&h.server)
        .await;

    let mut screen = EventCreateScreen::new(h.ctx.clone());
    let result = screen
        .attach_image(ImageFile::new("poster.png", vec![0]))
        .await;

    assert_eq!(result, Err(ScreenError::ImageUpload));
    assert_eq!(screen.form.image_url, "");
    assert_eq!(
        ScreenError::ImageUpload.message(),
        "Error uploading the image"
    );
}

// ── Event edit ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_edit_uses_cached_event_without_fetch() {
    let h = harness(nobody()).await;

    Mock::given(method("GET"))
        .and(path("/v1/eventos/e1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_json("e1", "Remote")))
        .expect(0)
        .mount(&h.server)
        .await;

    let cached: Event = serde_json::from_value(event_json("e1", "Cached")).unwrap();
    h.ctx.selection.set(SelectedEntity::Event(cached));

    let screen = EventEditScreen::open(h.ctx.clone()).unwrap();
    assert_eq!(screen.form.name, "Cached");
    assert_eq!(screen.form.timestamp, "01/12/2024 20:30");
    assert_eq!(screen.form.location, "Madrid");
    assert_eq!(screen.form.image_url, "https://cdn.example.com/poster.png");
    assert_eq!(h.history.count(), 0);
}

#[tokio::test]
async fn test_edit_with_empty_cache_redirects_home() {
    let h = harness(nobody()).await;

    let cached: Event = serde_json::from_value(event_json("e1", "Cached")).unwrap();
    h.ctx.selection.set(SelectedEntity::Event(cached));
    h.ctx.selection.clear();

    assert!(EventEditScreen::open(h.ctx.clone()).is_none());
    assert_eq!(h.history.requests(), vec![Route::Home]);
}

#[tokio::test]
async fn test_edit_submit_updates_cache_and_navigates() {
    let h = harness(nobody()).await;
    mock_geocode(&h.server, madrid()).await;

    Mock::given(method("PUT"))
        .and(path("/v1/eventos/e1"))
        .and(body_partial_json(json!({ "nombre": "Renamed", "timestamp": "01/12/2024 20:30" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "detail": "Evento actualizado",
            "result": event_json("e1", "Renamed")
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let cached: Event = serde_json::from_value(event_json("e1", "Cached")).unwrap();
    h.ctx.selection.set(SelectedEntity::Event(cached));

    let mut screen = EventEditScreen::open(h.ctx.clone()).unwrap();
    screen.form.name = "Renamed".into();
    let updated = screen.submit().await.unwrap();

    assert_eq!(updated.name, "Renamed");
    assert_eq!(h.ctx.selection.event().map(|e| e.name), Some("Renamed".to_owned()));
    assert_eq!(h.history.requests(), vec![Route::Home]);
}

#[tokio::test]
async fn test_edit_with_unknown_address_skips_update() {
    let h = harness(nobody()).await;
    mock_geocode(&h.server, json!([])).await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;

    let cached: Event = serde_json::from_value(event_json("e1", "Cached")).unwrap();
    h.ctx.selection.set(SelectedEntity::Event(cached));

    let mut screen = EventEditScreen::open(h.ctx.clone()).unwrap();
    screen.form.location = "Atlantis".into();
    assert_eq!(screen.submit().await, Err(ScreenError::AddressNotFound));
    assert_eq!(h.history.count(), 0);
}

// ── Event view ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_view_fetches_and_caches_when_slot_differs() {
    let h = harness(nobody()).await;

    Mock::given(method("GET"))
        .and(path("/v1/eventos/e2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_json("e2", "Fetched")))
        .expect(1)
        .mount(&h.server)
        .await;

    let other: Event = serde_json::from_value(event_json("e1", "Other")).unwrap();
    h.ctx.selection.set(SelectedEntity::Event(other));

    let mut screen = EventViewScreen::new(h.ctx.clone(), "e2");
    screen.load().await;

    assert_eq!(screen.event().map(|e| e.name.as_str()), Some("Fetched"));
    assert_eq!(h.ctx.selection.event().map(|e| e.id), Some("e2".to_owned()));
    assert_eq!(screen.map().map(|m| m.markers.len()), Some(1));
}

#[tokio::test]
async fn test_view_fetch_failure_message() {
    let h = harness(nobody()).await;

    Mock::given(method("GET"))
        .and(path("/v1/eventos/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&h.server)
        .await;

    let mut screen = EventViewScreen::new(h.ctx.clone(), "gone");
    assert_eq!(
        screen.load().await,
        &ViewState::Failed(ScreenError::FetchEvent)
    );
}

#[tokio::test]
async fn test_delete_requires_confirmation() {
    let h = harness(nobody()).await;

    Mock::given(method("DELETE"))
        .and(path("/v1/eventos/e1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "details": "eliminado" })),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    let cached: Event = serde_json::from_value(event_json("e1", "Cached")).unwrap();
    h.ctx.selection.set(SelectedEntity::Event(cached));

    let mut screen = EventViewScreen::new(h.ctx.clone(), "e1");
    screen.load().await;

    // Not confirmed: nothing sent.
    screen.confirm_delete().await.unwrap();
    assert_eq!(h.history.count(), 0);

    // Requested then cancelled: still nothing.
    assert!(screen.request_delete());
    screen.cancel_delete();
    screen.confirm_delete().await.unwrap();
    assert_eq!(h.history.count(), 0);

    assert!(screen.request_delete());
    screen.confirm_delete().await.unwrap();
    assert_eq!(h.history.requests(), vec![Route::Home]);
    assert!(h.ctx.selection.get().is_none());
}

#[tokio::test]
async fn test_delete_failure_message() {
    let h = harness(nobody()).await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&h.server)
        .await;

    let cached: Event = serde_json::from_value(event_json("e1", "Cached")).unwrap();
    h.ctx.selection.set(SelectedEntity::Event(cached));

    let mut screen = EventViewScreen::new(h.ctx.clone(), "e1");
    screen.load().await;
    screen.request_delete();

    assert_eq!(screen.confirm_delete().await, Err(ScreenError::DeleteEvent));
    assert_eq!(h.history.count(), 0);

    // The event stays on screen with the message, ready for another try.
    assert_eq!(screen.error(), Some(ScreenError::DeleteEvent));
    assert_eq!(screen.event().map(|e| e.id.as_str()), Some("e1"));
    assert!(screen.request_delete());
    assert_eq!(screen.error(), None);
    assert_eq!(screen.confirm_delete().await, Err(ScreenError::DeleteEvent));
    assert!(screen.event().is_some());
}

#[tokio::test]
async fn test_view_edit_and_back_routes() {
    let h = harness(nobody()).await;
    let screen = EventViewScreen::new(h.ctx.clone(), "e9");
    screen.edit();
    screen.back();
    assert_eq!(
        h.history.requests(),
        vec![Route::EventEdit("e9".into()), Route::Back]
    );
}

// ── Events main ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_search_lists_nearby_sorted_by_timestamp() {
    let h = harness(nobody()).await;
    mock_geocode(&h.server, madrid()).await;

    Mock::given(method("GET"))
        .and(path("/v1/eventos/nearby"))
        .and(query_param("lat", "40.4167"))
        .and(query_param("lon", "-3.7033"))
        .and(query_param("sort", "timestamp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            event_json("e1", "Uno"),
            event_json("e2", "Dos")
        ])))
        .expect(1)
        .mount(&h.server)
        .await;

    let mut screen = EventsMainScreen::new(h.ctx.clone());
    screen.address = "Madrid".into();
    let names: Vec<String> = screen
        .search()
        .await
        .unwrap()
        .iter()
        .map(|e| e.name.clone())
        .collect();

    assert_eq!(names, vec!["Uno", "Dos"]);
    assert_eq!(screen.map().markers.len(), 2);
    assert!(screen.map().circles.iter().any(|c| c.kind == CircleKind::SearchArea));

    let selected = screen.select(1).map(|e| e.id.clone());
    assert_eq!(selected.as_deref(), Some("e2"));
    assert_eq!(h.ctx.selection.event().map(|e| e.id), Some("e2".to_owned()));
    assert_eq!(h.history.requests(), vec![Route::EventView("e2".into())]);
}

#[tokio::test]
async fn test_empty_address_is_a_no_op() {
    let h = harness(nobody()).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&h.server)
        .await;

    let mut screen = EventsMainScreen::new(h.ctx.clone());
    screen.address = "   ".into();
    assert!(screen.search().await.unwrap().is_empty());
    assert_eq!(screen.state(), FormState::Idle);
}

#[tokio::test]
async fn test_search_errors() {
    let h = harness(nobody()).await;
    mock_geocode(&h.server, madrid()).await;

    Mock::given(method("GET"))
        .and(path("/v1/eventos/nearby"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&h.server)
        .await;

    let mut screen = EventsMainScreen::new(h.ctx.clone());
    screen.address = "Madrid".into();
    assert_eq!(screen.search().await.err(), Some(ScreenError::FetchEvents));
    assert!(screen.found().is_some());

    screen.create();
    assert_eq!(h.history.requests(), vec![Route::EventCreate]);
}

// ── Countries ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_countries_view_requires_session() {
    let h = harness(nobody()).await;
    let mut screen = CountriesViewScreen::new(h.ctx.clone());
    assert_eq!(screen.load().await.err(), Some(ScreenError::NoSession));
    assert_eq!(
        ScreenError::NoSession.message(),
        "User information not found. Please sign in again."
    );
}

#[tokio::test]
async fn test_countries_flow_for_signed_in_user() {
    let h = harness(nobody()).await;
    mock_geocode(&h.server, json!([{ "lat": "39.5", "lon": "-8.0" }])).await;

    Mock::given(method("GET"))
        .and(path("/v1/users/oauth/uid-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "_id": "u1", "email": "ana@example.com" }])),
        )
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/paises/email/ana@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "_id": "p1", "nombre": "Portugal", "lat": 39.5, "lon": -8.0,
              "email": "ana@example.com", "imagen": "https://img/pt.png" }
        ])))
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/paises"))
        .and(body_partial_json(json!({ "nombre": "Portugal", "email": "ana@example.com" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "_id": "p2", "nombre": "Portugal", "lat": 39.5, "lon": -8.0,
            "email": "ana@example.com", "imagen": ""
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let home = CountriesHomeScreen::open(h.ctx.clone());
    assert_eq!(h.history.count(), 0);
    assert!(home.login().await);
    assert_eq!(h.history.current(), Route::CountriesView);

    let mut view = CountriesViewScreen::new(h.ctx.clone());
    assert_eq!(view.load().await.unwrap().len(), 1);
    assert_eq!(view.map().center.latitude, 39.5);
    assert_eq!(view.marker_click(0), Some("https://img/pt.png"));
    assert_eq!(view.marker_click(5), None);

    let mut create = CountryCreateScreen::new(h.ctx.clone());
    create.name = "Portugal".into();
    assert_eq!(create.submit().await.unwrap().id, "p2");
    assert_eq!(h.history.current(), Route::CountriesView);
}

#[tokio::test]
async fn test_country_create_unknown_name() {
    let h = harness(nobody()).await;
    mock_geocode(&h.server, json!([])).await;

    Mock::given(method("POST"))
        .and(path("/v1/paises"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&h.server)
        .await;

    let mut create = CountryCreateScreen::new(h.ctx.clone());
    create.name = "Narnia".into();
    assert_eq!(create.submit().await, Err(ScreenError::CountryNotFound));
}

#[tokio::test]
async fn test_country_create_without_session_uses_placeholder_owner() {
    let h = harness(nobody()).await;
    mock_geocode(&h.server, json!([{ "lat": "46.2", "lon": "2.2" }])).await;

    Mock::given(method("POST"))
        .and(path("/v1/paises"))
        .and(body_partial_json(json!({ "email": "user" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "_id": "p3" })))
        .expect(1)
        .mount(&h.server)
        .await;

    let mut create = CountryCreateScreen::new(h.ctx.clone());
    create.name = "Francia".into();
    assert_eq!(create.submit().await.unwrap().id, "p3");
}

// ── Login / logout ──────────────────────────────────────────────────

#[tokio::test]
async fn test_login_screen_goes_back_and_logout_goes_home() {
    let h = harness(FakeIdentity::refusing()).await;

    let login = LoginScreen::new(h.ctx.clone());
    assert!(login.login("google").await.is_none());
    LogoutScreen::run(&h.ctx).await;

    assert_eq!(h.history.requests(), vec![Route::Back, Route::Home]);
    assert!(login.session().is_none());
}
