// ── Application context ──
//
// The process-wide state every screen shares: the backend client (with
// its loading counter), the geocoder, the session store, the selection
// slot, and the navigator. Built once at startup, logged out and empty.

use std::fmt;
use std::sync::Arc;

use eventual_api::{ApiClient, Geocoder, LoadingCounter};

use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::route::{Navigator, Route};
use crate::selection::SelectionCache;
use crate::session::{IdentityProvider, SessionStore};

/// Cheaply cloneable bundle of shared services.
#[derive(Clone)]
pub struct AppContext {
    pub api: ApiClient,
    pub geocoder: Geocoder,
    pub session: SessionStore,
    pub selection: SelectionCache,
    navigator: Arc<dyn Navigator>,
}

impl AppContext {
    /// Build clients from `config`.
    pub fn new(
        config: &ClientConfig,
        identity: Arc<dyn IdentityProvider>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, CoreError> {
        let transport = config.transport();
        let api = ApiClient::new(
            config.api_url.clone(),
            config.api_version.clone(),
            &transport,
            LoadingCounter::new(),
        )?;
        let geocoder = Geocoder::new(config.geocoder_url.clone(), &transport)?;
        Ok(Self::from_parts(api, geocoder, identity, navigator))
    }

    /// Assemble from pre-built clients.
    pub fn from_parts(
        api: ApiClient,
        geocoder: Geocoder,
        identity: Arc<dyn IdentityProvider>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let session = SessionStore::new(api.clone(), identity);
        Self {
            api,
            geocoder,
            session,
            selection: SelectionCache::new(),
            navigator,
        }
    }

    pub fn loading(&self) -> &LoadingCounter {
        self.api.loading()
    }

    pub fn navigate(&self, route: Route) {
        self.navigator.navigate(route);
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("api", &self.api.base_url().as_str())
            .field("geocoder", &self.geocoder.base_url().as_str())
            .field("session", &self.session)
            .field("selection", &self.selection)
            .finish_non_exhaustive()
    }
}
