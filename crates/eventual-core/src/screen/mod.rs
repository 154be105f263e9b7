// ── Page screens ──
//
// One state machine per page. Screens borrow the shared `AppContext`,
// talk to the backend and the geocoder, and report where to go next
// through the navigator. Failures never escape as transport errors: each
// screen reduces them to a fixed user-facing message.

pub mod countries;
pub mod event_create;
pub mod event_edit;
pub mod event_view;
pub mod events_main;
pub mod login;

use eventual_api::Coordinates;
use thiserror::Error;
use tracing::warn;

use crate::context::AppContext;

/// Failure shown inline on a screen. Every variant leaves the screen
/// re-submittable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScreenError {
    #[error("Error uploading the image")]
    ImageUpload,
    #[error("Address not found")]
    AddressNotFound,
    #[error("Country not found")]
    CountryNotFound,
    #[error("Error creating the event")]
    CreateEvent,
    #[error("Error updating the event")]
    UpdateEvent,
    #[error("Error fetching the event")]
    FetchEvent,
    #[error("Error deleting the event")]
    DeleteEvent,
    #[error("Error fetching the events")]
    FetchEvents,
    #[error("Error creating the country")]
    CreateCountry,
    #[error("Error fetching the visited countries")]
    FetchCountries,
    #[error("User information not found. Please sign in again.")]
    NoSession,
}

impl ScreenError {
    pub fn message(self) -> String {
        self.to_string()
    }
}

/// Submit lifecycle shared by every form.
///
/// `Idle | Failed -> Submitting -> Idle (and navigate) | Failed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormState {
    #[default]
    Idle,
    Submitting,
    Failed(ScreenError),
}

impl FormState {
    pub fn is_submitting(self) -> bool {
        self == Self::Submitting
    }

    pub fn error(self) -> Option<ScreenError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// An image picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Upload an image and return its public URL.
pub(crate) async fn upload_image(ctx: &AppContext, image: ImageFile) -> Result<String, ScreenError> {
    match ctx.api.upload_media(&image.name, image.bytes).await {
        Ok(media) => Ok(media.url),
        Err(e) => {
            warn!(error = %e, file = %image.name, "image upload failed");
            Err(ScreenError::ImageUpload)
        }
    }
}

/// Geocode `query`, taking the first match.
///
/// Zero matches yield `not_found`; a geocoder failure yields `on_error`.
pub(crate) async fn locate(
    ctx: &AppContext,
    query: &str,
    not_found: ScreenError,
    on_error: ScreenError,
) -> Result<Coordinates, ScreenError> {
    match ctx.geocoder.first(query).await {
        Ok(Some(coords)) => Ok(coords),
        Ok(None) => Err(not_found),
        Err(e) => {
            warn!(error = %e, query, "geocoding failed");
            Err(on_error)
        }
    }
}
