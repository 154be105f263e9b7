// Address lookup against a Nominatim-compatible search endpoint
//
// Plain GETs outside the backend: no API version, no loading counter.

use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};
use url::Url;

use crate::client::parse_response;
use crate::error::Error;
use crate::models::Coordinates;
use crate::transport::TransportConfig;

/// Public OpenStreetMap geocoder.
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";

/// One geocoding hit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeocodeMatch {
    #[serde(rename = "lat", deserialize_with = "flexible_f64")]
    pub latitude: f64,
    #[serde(rename = "lon", deserialize_with = "flexible_f64")]
    pub longitude: f64,
    #[serde(default)]
    pub display_name: String,
}

impl GeocodeMatch {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Client for `{base}/search?format=json&q={query}`.
#[derive(Debug, Clone)]
pub struct Geocoder {
    http: reqwest::Client,
    base_url: Url,
}

impl Geocoder {
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// All matches for a free-form query, best first.
    pub async fn search(&self, query: &str) -> Result<Vec<GeocodeMatch>, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::CannotBeABase(self.base_url.to_string()))?
            .pop_if_empty()
            .push("search");
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("q", query);

        debug!("GET: {url}");
        let resp = self.http.get(url).send().await.map_err(|e| {
            warn!(error = %e, "geocoder unreachable");
            Error::Transport(e)
        })?;
        let matches: Vec<GeocodeMatch> = parse_response(resp).await?.data;
        debug!(query, matches = matches.len(), "geocoded");
        Ok(matches)
    }

    /// Coordinates of the best match, or `None` when nothing matched.
    pub async fn first(&self, query: &str) -> Result<Option<Coordinates>, Error> {
        Ok(self
            .search(query)
            .await?
            .first()
            .map(GeocodeMatch::coordinates))
    }
}

/// Nominatim encodes coordinates as strings; accept numbers too.
fn flexible_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn match_accepts_string_and_number_coordinates() {
        let raw = json!([
            { "lat": "40.4167", "lon": "-3.7033", "display_name": "Madrid, España" },
            { "lat": 41.38, "lon": 2.17 }
        ]);
        let matches: Vec<GeocodeMatch> =
            serde_json::from_value(raw).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(matches[0].coordinates(), Coordinates::new(40.4167, -3.7033));
        assert_eq!(matches[0].display_name, "Madrid, España");
        assert!((matches[1].longitude - 2.17).abs() < f64::EPSILON);
    }

    #[test]
    fn garbage_coordinates_fail() {
        let raw = json!({ "lat": "north", "lon": "0" });
        assert!(serde_json::from_value::<GeocodeMatch>(raw).is_err());
    }
}
