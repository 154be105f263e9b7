// eventual-api: Async Rust client for the Eventual REST backend and geocoder

pub mod client;
mod countries;
pub mod error;
mod events;
pub mod geocode;
pub mod loading;
mod media;
pub mod models;
pub mod transport;
mod users;

pub use client::{ApiClient, ApiResponse, Body, DEFAULT_VERSION, Endpoint, Resource};
pub use error::Error;
pub use geocode::{DEFAULT_GEOCODER_URL, GeocodeMatch, Geocoder};
pub use loading::{LoadingCounter, LoadingGuard};
pub use models::{
    Acknowledgement, Coordinates, Country, CountryDraft, Envelope, Event, EventDraft, ListQuery,
    Media, NewUser, RatingSummary, Review, User, UserProfile,
};
pub use transport::{TlsMode, TransportConfig};
