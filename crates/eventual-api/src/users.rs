// User endpoints
//
// Registration, lookup by external identity, profile with rating
// aggregate, and peer reviews.

use tracing::debug;

use crate::client::{ApiClient, ApiResponse, Resource};
use crate::error::Error;
use crate::models::{Envelope, ListQuery, NewUser, RatingSummary, Review, User, UserProfile};

impl ApiClient {
    /// Users registered under an external identity id.
    ///
    /// `GET /{version}/users/oauth/{oauth_id}`. The backend answers 404
    /// when nobody matches; that case comes back as an empty list.
    pub async fn find_users_by_oauth_id(&self, oauth_id: &str) -> Result<Vec<User>, Error> {
        debug!(oauth_id, "looking up user by external id");
        let suffix = format!("oauth/{oauth_id}");
        match self
            .endpoint(Resource::USERS)
            .get_sub::<Vec<User>>(None, &suffix, &[])
            .await
        {
            Ok(resp) => Ok(resp.data),
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Register a user. Answers 201 with `{detail, result}`.
    ///
    /// `POST /{version}/users`
    pub async fn create_user(&self, user: &NewUser) -> Result<Envelope<User>, Error> {
        debug!(email = %user.email, provider = %user.oauth_provider, "registering user");
        self.endpoint(Resource::USERS)
            .create(user)
            .await
            .map(ApiResponse::into_data)
    }

    /// `GET /{version}/users/{id}`
    pub async fn get_user(&self, id: &str) -> Result<User, Error> {
        debug!(id, "fetching user");
        self.endpoint(Resource::USERS)
            .get_by_id(id, &ListQuery::default())
            .await
            .map(ApiResponse::into_data)
    }

    /// User record plus `ratingAverage` and `totalRates`.
    ///
    /// `GET /{version}/users/{id}/profile`
    pub async fn user_profile(&self, id: &str) -> Result<UserProfile, Error> {
        debug!(id, "fetching user profile");
        self.endpoint(Resource::USERS)
            .get_sub(Some(id), "profile", &[])
            .await
            .map(ApiResponse::into_data)
    }

    /// Rate a user from 1 to 5 on behalf of `review.user`.
    ///
    /// `POST /{version}/users/{id}/review`
    pub async fn rate_user(&self, id: &str, review: &Review) -> Result<RatingSummary, Error> {
        debug!(id, reviewer = %review.user, rating = review.rating, "rating user");
        self.endpoint(Resource::USERS)
            .post_sub(Some(id), "review", review)
            .await
            .map(ApiResponse::into_data)
    }
}
