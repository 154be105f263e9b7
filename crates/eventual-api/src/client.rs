// Backend HTTP client
//
// Wraps `reqwest::Client` with versioned URL construction, request/response
// logging, the shared loading counter, and uniform 2xx-or-error handling.
// Resource-specific calls (events, users, ...) live in sibling modules as
// inherent methods so this file stays focused on transport mechanics.

use reqwest::Method;
use reqwest::multipart::Form;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::Error;
use crate::loading::LoadingCounter;
use crate::models::{Acknowledgement, ListQuery};
use crate::transport::TransportConfig;

/// API version used when a call does not name one.
pub const DEFAULT_VERSION: &str = "v1";

/// Header carrying the unpaged size of a list response.
const TOTAL_COUNT_HEADER: &str = "x-total-count";

// ── Resources ───────────────────────────────────────────────────────

/// A backend entity type and the operations it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    /// Path segment under the version, e.g. `eventos`.
    pub name: &'static str,
    /// Whether update and delete are available.
    pub mutable: bool,
}

impl Resource {
    pub const EVENTS: Self = Self {
        name: "eventos",
        mutable: true,
    };
    pub const COUNTRIES: Self = Self {
        name: "paises",
        mutable: true,
    };
    pub const USERS: Self = Self {
        name: "users",
        mutable: true,
    };
    /// Uploaded images are write-once.
    pub const MEDIA: Self = Self {
        name: "media",
        mutable: false,
    };
}

// ── Responses ───────────────────────────────────────────────────────

/// A successful (2xx) backend response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub status: u16,
    /// Value of `X-Total-Count`, when the server sent one.
    pub total_count: Option<u64>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn into_data(self) -> T {
        self.data
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            status: self.status,
            total_count: self.total_count,
            data: f(self.data),
        }
    }
}

/// Request payload variants.
#[derive(Debug)]
pub enum Body {
    Empty,
    Json(serde_json::Value),
    Multipart(Form),
}

impl Body {
    /// Encode any serializable value as a JSON body.
    pub fn json(value: &(impl Serialize + ?Sized)) -> Result<Self, Error> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(Error::Serialization)
    }
}

// ── Client ──────────────────────────────────────────────────────────

/// HTTP client for the Eventual REST backend.
///
/// URLs take the shape `{base}/{version}/{entity}[/{id}][/{suffix}]`.
/// Every call is counted on the shared [`LoadingCounter`] while in flight.
/// Non-2xx answers come back as [`Error::Status`]; nothing is retried.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    version: String,
    loading: LoadingCounter,
}

impl ApiClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root, which may itself carry a path prefix
    /// (e.g. `http://localhost:8000/api`).
    pub fn new(
        base_url: Url,
        version: impl Into<String>,
        transport: &TransportConfig,
        loading: LoadingCounter,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, version, loading))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        version: impl Into<String>,
        loading: LoadingCounter,
    ) -> Self {
        Self {
            http,
            base_url,
            version: version.into(),
            loading,
        }
    }

    /// Convenience constructor for tests and scripts: parse `base_url`,
    /// use the default version, and start a fresh loading counter.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)?;
        Ok(Self::with_client(
            http,
            base_url,
            DEFAULT_VERSION,
            LoadingCounter::new(),
        ))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// The shared in-flight request counter.
    pub fn loading(&self) -> &LoadingCounter {
        &self.loading
    }

    /// Handle for one resource at the client's default version.
    pub fn endpoint(&self, resource: Resource) -> Endpoint<'_> {
        Endpoint {
            client: self,
            resource,
            version: self.version.clone(),
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/{version}/{entity}[/{id}][/{suffix}]` at the default version.
    ///
    /// `suffix` may hold several `/`-separated segments; each segment is
    /// percent-encoded on its own.
    pub fn url_for(&self, entity: &str, id: Option<&str>, suffix: Option<&str>) -> Result<Url, Error> {
        self.versioned_url(&self.version, entity, id, suffix)
    }

    pub(crate) fn versioned_url(
        &self,
        version: &str,
        entity: &str,
        id: Option<&str>,
        suffix: Option<&str>,
    ) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| Error::CannotBeABase(self.base_url.to_string()))?;
            segments.pop_if_empty().push(version).push(entity);
            if let Some(id) = id {
                segments.push(id);
            }
            if let Some(suffix) = suffix {
                segments.extend(suffix.split('/').filter(|s| !s.is_empty()));
            }
        }
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Perform one call against the backend.
    ///
    /// Logs the method and URL, counts the call on the loading counter for
    /// its whole duration, and decodes a 2xx body into `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Body,
    ) -> Result<ApiResponse<T>, Error> {
        debug!("{method}: {url}");

        let mut req = self.http.request(method, url);
        match body {
            Body::Empty => {}
            Body::Json(value) => {
                trace!(body = %value, "request body");
                req = req.json(&value);
            }
            Body::Multipart(form) => {
                trace!("multipart request body");
                req = req.multipart(form);
            }
        }

        let _loading = self.loading.begin();
        let resp = req.send().await.map_err(|e| {
            warn!(error = %e, "request failed before a response arrived");
            Error::Transport(e)
        })?;
        parse_response(resp).await
    }

    /// Entity-level shorthand for [`request`](Self::request):
    /// build the URL at the default version, then call.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        entity: &str,
        id: Option<&str>,
        suffix: Option<&str>,
        body: Body,
    ) -> Result<ApiResponse<T>, Error> {
        let url = self.url_for(entity, id, suffix)?;
        self.request(method, url, body).await
    }
}

/// Turn a raw response into an `ApiResponse` or an `Error::Status`.
pub(crate) async fn parse_response<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<ApiResponse<T>, Error> {
    let status = resp.status();
    let total_count = resp
        .headers()
        .get(TOTAL_COUNT_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok());

    let body = resp.text().await.map_err(Error::Transport)?;

    if !status.is_success() {
        let detail = error_detail(&body);
        warn!(status = status.as_u16(), detail = ?detail, "request rejected");
        return Err(Error::Status {
            status: status.as_u16(),
            detail,
            body,
        });
    }

    debug!(status = status.as_u16(), "response received");
    trace!(body = %body, "response body");

    // Deletes may answer with an empty body.
    let raw = if body.trim().is_empty() { "null" } else { body.as_str() };
    let data = serde_json::from_str(raw).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: body.clone(),
    })?;

    Ok(ApiResponse {
        status: status.as_u16(),
        total_count,
        data,
    })
}

/// Pull a human-readable message out of an error body.
///
/// The backend answers `{"detail": "..."}`; validation failures carry a
/// list under the same key.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ── Endpoint handle ─────────────────────────────────────────────────

/// CRUD handle for one resource, optionally pinned to another API version.
#[derive(Debug, Clone)]
pub struct Endpoint<'a> {
    client: &'a ApiClient,
    resource: Resource,
    version: String,
}

impl Endpoint<'_> {
    /// Pin this handle to a specific API version.
    pub fn version(mut self, version: &str) -> Self {
        version.clone_into(&mut self.version);
        self
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    /// URL for this resource, with an optional id and suffix.
    pub fn url(&self, id: Option<&str>, suffix: Option<&str>) -> Result<Url, Error> {
        self.client
            .versioned_url(&self.version, self.resource.name, id, suffix)
    }

    /// `GET /{version}/{entity}`
    pub async fn get_all<T: DeserializeOwned>(
        &self,
        query: &ListQuery,
    ) -> Result<ApiResponse<Vec<T>>, Error> {
        let mut url = self.url(None, None)?;
        append_query(&mut url, &query.pairs());
        self.client.request(Method::GET, url, Body::Empty).await
    }

    /// `GET /{version}/{entity}/{id}`
    pub async fn get_by_id<T: DeserializeOwned>(
        &self,
        id: &str,
        query: &ListQuery,
    ) -> Result<ApiResponse<T>, Error> {
        let mut url = self.url(Some(id), None)?;
        append_query(&mut url, &query.pairs());
        self.client.request(Method::GET, url, Body::Empty).await
    }

    /// `GET /{version}/{entity}/{suffix...}` with query pairs.
    pub async fn get_sub<T: DeserializeOwned>(
        &self,
        id: Option<&str>,
        suffix: &str,
        query: &[(&str, String)],
    ) -> Result<ApiResponse<T>, Error> {
        let mut url = self.url(id, Some(suffix))?;
        append_query(&mut url, query);
        self.client.request(Method::GET, url, Body::Empty).await
    }

    /// `POST /{version}/{entity}`
    pub async fn create<T: DeserializeOwned>(
        &self,
        body: &(impl Serialize + ?Sized),
    ) -> Result<ApiResponse<T>, Error> {
        let url = self.url(None, None)?;
        self.client
            .request(Method::POST, url, Body::json(body)?)
            .await
    }

    /// `PUT /{version}/{entity}/{id}`
    pub async fn update<T: DeserializeOwned>(
        &self,
        id: &str,
        body: &(impl Serialize + ?Sized),
    ) -> Result<ApiResponse<T>, Error> {
        if !self.resource.mutable {
            return Err(Error::UnsupportedOperation("update"));
        }
        let url = self.url(Some(id), None)?;
        self.client.request(Method::PUT, url, Body::json(body)?).await
    }

    /// `DELETE /{version}/{entity}/{id}`
    pub async fn delete(&self, id: &str) -> Result<ApiResponse<Acknowledgement>, Error> {
        if !self.resource.mutable {
            return Err(Error::UnsupportedOperation("delete"));
        }
        let url = self.url(Some(id), None)?;
        let resp: ApiResponse<Option<Acknowledgement>> =
            self.client.request(Method::DELETE, url, Body::Empty).await?;
        Ok(resp.map(Option::unwrap_or_default))
    }

    /// `POST /{version}/{entity}[/{id}]/{suffix}` with a JSON body.
    pub async fn post_sub<T: DeserializeOwned>(
        &self,
        id: Option<&str>,
        suffix: &str,
        body: &(impl Serialize + ?Sized),
    ) -> Result<ApiResponse<T>, Error> {
        let url = self.url(id, Some(suffix))?;
        self.client
            .request(Method::POST, url, Body::json(body)?)
            .await
    }

    /// `POST /{version}/{entity}` with a multipart form.
    pub async fn upload<T: DeserializeOwned>(&self, form: Form) -> Result<ApiResponse<T>, Error> {
        let url = self.url(None, None)?;
        self.client
            .request(Method::POST, url, Body::Multipart(form))
            .await
    }
}

fn append_query(url: &mut Url, pairs: &[(&str, String)]) {
    if pairs.is_empty() {
        return;
    }
    let mut query = url.query_pairs_mut();
    for (key, value) in pairs {
        query.append_pair(key, value);
    }
}
