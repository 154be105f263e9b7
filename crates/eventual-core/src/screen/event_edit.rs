// Event edit form, seeded from the selection cache.

use eventual_api::{Event, EventDraft};
use tracing::{debug, info, warn};

use super::event_create::EventForm;
use super::{FormState, ImageFile, ScreenError, locate, upload_image};
use crate::context::AppContext;
use crate::route::Route;
use crate::selection::SelectedEntity;
use crate::time::to_input_format;

pub struct EventEditScreen {
    ctx: AppContext,
    original: Event,
    pub form: EventForm,
    state: FormState,
}

impl EventEditScreen {
    /// Open the editor on the cached event.
    ///
    /// With nothing cached (or a country cached) the screen refuses to
    /// open and sends the user home; it never fetches by id.
    pub fn open(ctx: AppContext) -> Option<Self> {
        let Some(event) = ctx.selection.event() else {
            debug!("no selected event; leaving edit screen");
            ctx.navigate(Route::Home);
            return None;
        };

        let form = EventForm {
            name: event.name.clone(),
            timestamp: to_input_format(&event.timestamp),
            location: event.location.clone(),
            image_url: event.image_url.clone(),
        };
        Some(Self {
            ctx,
            original: event,
            form,
            state: FormState::Idle,
        })
    }

    /// The event as it was when the editor opened.
    pub fn original(&self) -> &Event {
        &self.original
    }

    pub fn state(&self) -> FormState {
        self.state
    }

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

    /// Geocode, update, cache the result, and go home.
    pub async fn submit(&mut self) -> Result<Event, ScreenError> {
        self.state = FormState::Submitting;
        match self.try_submit().await {
            Ok(event) => {
                self.state = FormState::Idle;
                info!(id = %event.id, "event updated");
                self.ctx.selection.set(SelectedEntity::Event(event.clone()));
                self.original = event.clone();
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
            ScreenError::UpdateEvent,
        )
        .await?;

        let updated = Event {
            name: self.form.name.clone(),
            timestamp: self.form.timestamp.clone(),
            location: self.form.location.clone(),
            latitude: coords.latitude,
            longitude: coords.longitude,
            image_url: self.form.image_url.clone(),
            ..self.original.clone()
        };

        let envelope = self
            .ctx
            .api
            .update_event(&updated.id, &EventDraft::from(&updated))
            .await
            .map_err(|e| {
                warn!(error = %e, id = %updated.id, "event update failed");
                ScreenError::UpdateEvent
            })?;

        // Prefer the stored record; fall back to what was sent.
        Ok(envelope
            .result
            .filter(|stored| !stored.id.is_empty())
            .unwrap_or(updated))
    }
}
