// Event detail screen with confirm-before-delete.

use eventual_api::Event;
use tracing::{debug, info, warn};

use super::ScreenError;
use crate::context::AppContext;
use crate::map::{DEFAULT_ZOOM, MapView};
use crate::route::Route;
use crate::selection::SelectedEntity;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Loading,
    Ready(Event),
    /// Waiting for the user to confirm deletion.
    ConfirmDelete(Event),
    Failed(ScreenError),
}

pub struct EventViewScreen {
    ctx: AppContext,
    id: String,
    state: ViewState,
    /// Inline message from the last failed action; the event stays shown.
    error: Option<ScreenError>,
}

impl EventViewScreen {
    pub fn new(ctx: AppContext, id: impl Into<String>) -> Self {
        Self {
            ctx,
            id: id.into(),
            state: ViewState::Loading,
            error: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn error(&self) -> Option<ScreenError> {
        self.error
    }

    pub fn event(&self) -> Option<&Event> {
        match &self.state {
            ViewState::Ready(e) | ViewState::ConfirmDelete(e) => Some(e),
            _ => None,
        }
    }

    /// Show the cached event if it is this one, otherwise fetch and cache it.
    pub async fn load(&mut self) -> &ViewState {
        self.error = None;
        if let Some(cached) = self.ctx.selection.event().filter(|e| e.id == self.id) {
            debug!(id = %self.id, "event served from selection");
            self.state = ViewState::Ready(cached);
            return &self.state;
        }

        self.state = ViewState::Loading;
        self.state = match self.ctx.api.get_event(&self.id).await {
            Ok(event) => {
                self.ctx.selection.set(SelectedEntity::Event(event.clone()));
                ViewState::Ready(event)
            }
            Err(e) => {
                warn!(error = %e, id = %self.id, "event fetch failed");
                ViewState::Failed(ScreenError::FetchEvent)
            }
        };
        &self.state
    }

    /// Single pin on the event.
    pub fn map(&self) -> Option<MapView> {
        self.event().map(|e| {
            MapView::centered(e.coordinates(), DEFAULT_ZOOM).with_marker(
                e.coordinates(),
                &e.name,
                &e.id,
            )
        })
    }

    /// Ask for delete confirmation. Only meaningful once loaded.
    pub fn request_delete(&mut self) -> bool {
        if let ViewState::Ready(event) = &self.state {
            self.error = None;
            self.state = ViewState::ConfirmDelete(event.clone());
            true
        } else {
            false
        }
    }

    pub fn cancel_delete(&mut self) {
        if let ViewState::ConfirmDelete(event) = &self.state {
            self.state = ViewState::Ready(event.clone());
        }
    }

    /// Delete after confirmation and go home.
    ///
    /// Without a pending confirmation nothing is sent. On failure the event
    /// stays loaded so the delete can be requested again.
    pub async fn confirm_delete(&mut self) -> Result<(), ScreenError> {
        let ViewState::ConfirmDelete(event) = &self.state else {
            debug!("delete not confirmed; ignoring");
            return Ok(());
        };
        let event = event.clone();

        match self.ctx.api.delete_event(&self.id).await {
            Ok(_) => {
                info!(id = %self.id, "event deleted");
                if self.ctx.selection.event().is_some_and(|e| e.id == self.id) {
                    self.ctx.selection.clear();
                }
                self.state = ViewState::Ready(event);
                self.ctx.navigate(Route::Home);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, id = %self.id, "event delete failed");
                self.state = ViewState::Ready(event);
                self.error = Some(ScreenError::DeleteEvent);
                Err(ScreenError::DeleteEvent)
            }
        }
    }

    pub fn edit(&self) {
        self.ctx.navigate(Route::EventEdit(self.id.clone()));
    }

    pub fn back(&self) {
        self.ctx.navigate(Route::Back);
    }
}
