// Visited-country endpoints

use tracing::debug;

use crate::client::{ApiClient, ApiResponse, Resource};
use crate::error::Error;
use crate::models::{Acknowledgement, Country, CountryDraft, ListQuery};

impl ApiClient {
    /// `GET /{version}/paises`
    pub async fn list_countries(&self, query: &ListQuery) -> Result<ApiResponse<Vec<Country>>, Error> {
        debug!(?query, "listing countries");
        self.endpoint(Resource::COUNTRIES).get_all(query).await
    }

    /// Countries recorded by one user.
    ///
    /// `GET /{version}/paises/email/{email}`
    pub async fn countries_by_email(&self, email: &str) -> Result<Vec<Country>, Error> {
        debug!(email, "listing countries by owner");
        let suffix = format!("email/{email}");
        self.endpoint(Resource::COUNTRIES)
            .get_sub(None, &suffix, &[])
            .await
            .map(ApiResponse::into_data)
    }

    /// `POST /{version}/paises`
    pub async fn create_country(&self, draft: &CountryDraft) -> Result<Country, Error> {
        debug!(name = %draft.name, "creating country");
        self.endpoint(Resource::COUNTRIES)
            .create(draft)
            .await
            .map(ApiResponse::into_data)
    }

    /// `DELETE /{version}/paises/{id}`
    pub async fn delete_country(&self, id: &str) -> Result<Acknowledgement, Error> {
        debug!(id, "deleting country");
        self.endpoint(Resource::COUNTRIES)
            .delete(id)
            .await
            .map(ApiResponse::into_data)
    }
}
