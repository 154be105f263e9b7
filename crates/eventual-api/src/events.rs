// Event endpoints
//
// CRUD over `/{version}/eventos` plus the bounding-box `nearby` search.

use tracing::debug;

use crate::client::{ApiClient, ApiResponse, Resource};
use crate::error::Error;
use crate::models::{Acknowledgement, Envelope, Event, EventDraft, ListQuery};

impl ApiClient {
    /// List events.
    ///
    /// `GET /{version}/eventos`
    pub async fn list_events(&self, query: &ListQuery) -> Result<ApiResponse<Vec<Event>>, Error> {
        debug!(?query, "listing events");
        self.endpoint(Resource::EVENTS).get_all(query).await
    }

    /// Events inside the server's search box around a point.
    ///
    /// `GET /{version}/eventos/nearby?lat={lat}&lon={lon}[&sort={sort}]`
    pub async fn nearby_events(
        &self,
        latitude: f64,
        longitude: f64,
        sort: Option<&str>,
    ) -> Result<ApiResponse<Vec<Event>>, Error> {
        debug!(latitude, longitude, ?sort, "searching nearby events");
        let mut query = vec![("lat", latitude.to_string()), ("lon", longitude.to_string())];
        if let Some(sort) = sort {
            query.push(("sort", sort.to_owned()));
        }
        self.endpoint(Resource::EVENTS)
            .get_sub(None, "nearby", &query)
            .await
    }

    /// `GET /{version}/eventos/{id}`
    pub async fn get_event(&self, id: &str) -> Result<Event, Error> {
        debug!(id, "fetching event");
        self.endpoint(Resource::EVENTS)
            .get_by_id(id, &ListQuery::default())
            .await
            .map(ApiResponse::into_data)
    }

    /// Create an event. The backend answers 201 with the stored record.
    ///
    /// `POST /{version}/eventos`
    pub async fn create_event(&self, draft: &EventDraft) -> Result<Event, Error> {
        debug!(name = %draft.name, "creating event");
        self.endpoint(Resource::EVENTS)
            .create(draft)
            .await
            .map(ApiResponse::into_data)
    }

    /// Replace an event's fields.
    ///
    /// `PUT /{version}/eventos/{id}`; the answer wraps the stored record.
    pub async fn update_event(&self, id: &str, draft: &EventDraft) -> Result<Envelope<Event>, Error> {
        debug!(id, "updating event");
        self.endpoint(Resource::EVENTS)
            .update(id, draft)
            .await
            .map(ApiResponse::into_data)
    }

    /// `DELETE /{version}/eventos/{id}`
    pub async fn delete_event(&self, id: &str) -> Result<Acknowledgement, Error> {
        debug!(id, "deleting event");
        self.endpoint(Resource::EVENTS)
            .delete(id)
            .await
            .map(ApiResponse::into_data)
    }
}
