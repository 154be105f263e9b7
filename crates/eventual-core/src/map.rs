// ── Map view model ──
//
// What a map widget would draw: a center, a zoom level, pins and circles.
// Rendering is left to the consumer; the CLI prints it as a table plus an
// OpenStreetMap permalink.

use eventual_api::Coordinates;
use serde::Serialize;

/// Where the map opens before any search.
pub const DEFAULT_CENTER: Coordinates = Coordinates::new(51.505, -0.09);
pub const DEFAULT_ZOOM: u8 = 13;
/// Zoom for the visited-countries map.
pub const COUNTRIES_ZOOM: u8 = 5;
/// Approximate meters per degree of latitude/longitude.
pub const METERS_PER_DEGREE: f64 = 111_000.0;
/// Half-width, in degrees, of the box the backend searches around a point.
pub const SEARCH_RADIUS_DEGREES: f64 = 0.2;
/// Radius of the circle marking the geocoded address itself.
pub const FOUND_LOCATION_RADIUS_METERS: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircleKind {
    /// The area the nearby search covered.
    SearchArea,
    /// The geocoded address.
    FoundLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub position: Coordinates,
    pub label: String,
    /// Id of the entity this pin stands for.
    pub entity_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Circle {
    pub center: Coordinates,
    pub radius_meters: f64,
    pub kind: CircleKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
    pub markers: Vec<Marker>,
    pub circles: Vec<Circle>,
}

impl Default for MapView {
    fn default() -> Self {
        Self::centered(DEFAULT_CENTER, DEFAULT_ZOOM)
    }
}

impl MapView {
    pub fn centered(center: Coordinates, zoom: u8) -> Self {
        Self {
            center,
            zoom,
            markers: Vec::new(),
            circles: Vec::new(),
        }
    }

    /// Map after a nearby search: centered on the match, with the search
    /// box drawn as a circle and a small circle on the match itself.
    pub fn search_result(found: Coordinates) -> Self {
        let mut view = Self::centered(found, DEFAULT_ZOOM);
        view.circles = vec![
            Circle {
                center: found,
                radius_meters: METERS_PER_DEGREE * SEARCH_RADIUS_DEGREES,
                kind: CircleKind::SearchArea,
            },
            Circle {
                center: found,
                radius_meters: FOUND_LOCATION_RADIUS_METERS,
                kind: CircleKind::FoundLocation,
            },
        ];
        view
    }

    pub fn with_marker(mut self, position: Coordinates, label: &str, entity_id: &str) -> Self {
        self.markers.push(Marker {
            position,
            label: label.to_owned(),
            entity_id: entity_id.to_owned(),
        });
        self
    }

    /// OpenStreetMap permalink for this view.
    pub fn osm_url(&self) -> String {
        format!(
            "https://www.openstreetmap.org/#map={}/{:.5}/{:.5}",
            self.zoom, self.center.latitude, self.center.longitude
        )
    }
}
