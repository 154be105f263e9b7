// Event list and nearby search.

use eventual_api::{Coordinates, Event};
use tracing::{debug, warn};

use super::{FormState, ScreenError, locate};
use crate::context::AppContext;
use crate::map::{MapView, Marker};
use crate::route::Route;
use crate::selection::SelectedEntity;

/// Sort key the nearby search asks for.
const SORT_KEY: &str = "timestamp";

pub struct EventsMainScreen {
    ctx: AppContext,
    pub address: String,
    state: FormState,
    found: Option<Coordinates>,
    events: Vec<Event>,
    map: MapView,
}

impl EventsMainScreen {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            address: String::new(),
            state: FormState::Idle,
            found: None,
            events: Vec::new(),
            map: MapView::default(),
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Coordinates the last search resolved to.
    pub fn found(&self) -> Option<Coordinates> {
        self.found
    }

    pub fn map(&self) -> &MapView {
        &self.map
    }

    /// Geocode the address and list events around it, oldest first.
    ///
    /// An empty address does nothing.
    pub async fn search(&mut self) -> Result<&[Event], ScreenError> {
        let address = self.address.trim().to_owned();
        if address.is_empty() {
            debug!("empty address; search skipped");
            return Ok(&self.events);
        }

        self.state = FormState::Submitting;
        self.found = None;

        let coords = match locate(
            &self.ctx,
            &address,
            ScreenError::AddressNotFound,
            ScreenError::FetchEvents,
        )
        .await
        {
            Ok(c) => c,
            Err(e) => {
                self.state = FormState::Failed(e);
                return Err(e);
            }
        };
        self.found = Some(coords);
        self.map = MapView::search_result(coords);

        match self
            .ctx
            .api
            .nearby_events(coords.latitude, coords.longitude, Some(SORT_KEY))
            .await
        {
            Ok(resp) => {
                debug!(count = resp.data.len(), total = ?resp.total_count, "nearby events");
                self.events = resp.data;
                self.map.markers.extend(self.events.iter().map(marker_for));
                self.state = FormState::Idle;
                Ok(&self.events)
            }
            Err(e) => {
                warn!(error = %e, "nearby search failed");
                self.state = FormState::Failed(ScreenError::FetchEvents);
                Err(ScreenError::FetchEvents)
            }
        }
    }

    /// Open one result: cache it and go to its detail page.
    pub fn select(&self, index: usize) -> Option<&Event> {
        let event = self.events.get(index)?;
        self.ctx.selection.set(SelectedEntity::Event(event.clone()));
        self.ctx.navigate(Route::EventView(event.id.clone()));
        Some(event)
    }

    pub fn create(&self) {
        self.ctx.navigate(Route::EventCreate);
    }
}

fn marker_for(event: &Event) -> Marker {
    Marker {
        position: event.coordinates(),
        label: event.name.clone(),
        entity_id: event.id.clone(),
    }
}
