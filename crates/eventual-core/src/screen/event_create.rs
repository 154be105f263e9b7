// Event creation form.

use eventual_api::{Event, EventDraft};
use tracing::{info, warn};

use super::{FormState, ImageFile, ScreenError, locate, upload_image};
use crate::context::AppContext;
use crate::route::Route;

/// Organizer recorded on events created from this client.
pub const DEFAULT_ORGANIZER: &str = "user";

/// Editable fields of an event form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventForm {
    pub name: String,
    /// `dd/mm/YYYY HH:MM`.
    pub timestamp: String,
    /// Free-text address, geocoded on submit.
    pub location: String,
    /// URL of an already uploaded image; empty for none.
    pub image_url: String,
}

pub struct EventCreateScreen {
    ctx: AppContext,
    pub form: EventForm,
    state: FormState,
}

impl EventCreateScreen {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            form: EventForm::default(),
            state: FormState::Idle,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// Upload an image now and remember its URL for the submit.
    pub async fn attach_image(&mut self, image: ImageFile) -> Result<(), ScreenError> {
        match upload_image(&self.ctx, image).await {
            Ok(url) => {
                self.form.image_url = url;
                Ok(())
            }
            Err(e) => {
                self.state = FormState::Failed(e);
                Err(e)
            }
        }
    }

    /// Geocode the location, create the event, and go home.
    ///
    /// Zero geocoding matches stop before any backend call.
    pub async fn submit(&mut self) -> Result<Event, ScreenError> {
        self.state = FormState::Submitting;
        match self.try_submit().await {
            Ok(event) => {
                self.state = FormState::Idle;
                info!(id = %event.id, name = %event.name, "event created");
                self.ctx.navigate(Route::Home);
                Ok(event)
            }
            Err(e) => {
                self.state = FormState::Failed(e);
                Err(e)
            }
        }
    }

    async fn try_submit(&self) -> Result<Event, ScreenError> {
        let coords = locate(
            &self.ctx,
            &self.form.location,
            ScreenError::AddressNotFound,
            ScreenError::CreateEvent,
        )
        .await?;

        let draft = EventDraft {
            name: self.form.name.clone(),
            timestamp: self.form.timestamp.clone(),
            location: self.form.location.clone(),
            latitude: coords.latitude,
            longitude: coords.longitude,
            organizer: DEFAULT_ORGANIZER.into(),
            image_url: self.form.image_url.clone(),
        };

        self.ctx.api.create_event(&draft).await.map_err(|e| {
            warn!(error = %e, "event creation failed");
            ScreenError::CreateEvent
        })
    }
}
