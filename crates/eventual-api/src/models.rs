// Wire models for the Eventual backend
//
// Field names follow the backend contract (`_id`, `nombre`, `lugar`, ...).
// Everything the backend might omit carries `#[serde(default)]` so a
// sparse document still deserializes.

use serde::{Deserialize, Deserializer, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

// ── Events ──────────────────────────────────────────────────────────

/// An event as stored by the backend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(rename = "nombre", default)]
    pub name: String,
    /// ISO-8601 on reads; the backend parses `dd/mm/YYYY HH:MM` on writes.
    #[serde(default)]
    pub timestamp: String,
    #[serde(rename = "lugar", default)]
    pub location: String,
    #[serde(rename = "lat", default)]
    pub latitude: f64,
    #[serde(rename = "lon", default)]
    pub longitude: f64,
    #[serde(rename = "organizador", default)]
    pub organizer: String,
    #[serde(rename = "imagen", default, deserialize_with = "null_as_empty")]
    pub image_url: String,
}

impl Event {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Create/update payload for an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventDraft {
    #[serde(rename = "nombre")]
    pub name: String,
    pub timestamp: String,
    #[serde(rename = "lugar")]
    pub location: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    #[serde(rename = "organizador")]
    pub organizer: String,
    #[serde(rename = "imagen")]
    pub image_url: String,
}

impl From<&Event> for EventDraft {
    fn from(e: &Event) -> Self {
        Self {
            name: e.name.clone(),
            timestamp: e.timestamp.clone(),
            location: e.location.clone(),
            latitude: e.latitude,
            longitude: e.longitude,
            organizer: e.organizer.clone(),
            image_url: e.image_url.clone(),
        }
    }
}

// ── Countries ───────────────────────────────────────────────────────

/// A visited country, owned by the user whose email it carries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Country {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "lat", default)]
    pub latitude: f64,
    #[serde(rename = "lon", default)]
    pub longitude: f64,
    #[serde(rename = "email", default)]
    pub owner_email: String,
    #[serde(rename = "imagen", default, deserialize_with = "null_as_empty")]
    pub image_url: String,
}

impl Country {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryDraft {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    #[serde(rename = "email")]
    pub owner_email: String,
    #[serde(rename = "imagen")]
    pub image_url: String,
}

// ── Users ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub oauth_id: Option<String>,
    #[serde(default)]
    pub oauth_provider: Option<String>,
    /// Identity token recorded at registration.
    #[serde(default)]
    pub oauth_token: Option<String>,
    #[serde(default)]
    pub profile_picture: String,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// Registration payload built from an external identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub surname: String,
    pub description: String,
    pub user_name: String,
    pub oauth_id: String,
    pub oauth_provider: String,
    pub oauth_token: String,
    pub profile_picture: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Backend id of the reviewing user.
    pub user: String,
    /// 1 to 5.
    pub rating: u8,
}

/// Aggregate returned after rating a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    #[serde(default)]
    pub total_rates: u32,
    #[serde(default)]
    pub rating_average: f64,
}

/// A user record enriched with its review aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    #[serde(flatten)]
    pub rating: RatingSummary,
}

// ── Media ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    #[serde(default)]
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub owner_id: Option<u64>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

// ── Envelopes ───────────────────────────────────────────────────────

/// `{ "detail": "...", "result": {...} }` wrapper used by user/media
/// creation and by every update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub detail: Option<String>,
    pub result: Option<T>,
}

/// Acknowledgement body of a delete or an update whose result is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Acknowledgement {
    #[serde(default, alias = "details")]
    pub detail: Option<String>,
}

// ── Query parameters ────────────────────────────────────────────────

/// Projection, ordering, and paging accepted by every list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Comma-separated fields to return.
    pub fields: Option<String>,
    /// Comma-separated sort keys.
    pub sort: Option<String>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

impl ListQuery {
    pub fn sorted_by(key: &str) -> Self {
        Self {
            sort: Some(key.to_owned()),
            ..Self::default()
        }
    }

    pub(crate) fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(ref fields) = self.fields {
            pairs.push(("fields", fields.clone()));
        }
        if let Some(ref sort) = self.sort {
            pairs.push(("sort", sort.clone()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
