// Visited-countries screens: login gate, map of the user's countries,
// and the add-a-country form.

use eventual_api::{Country, CountryDraft};
use tracing::{debug, info, warn};

use super::{FormState, ImageFile, ScreenError, locate, upload_image};
use crate::context::AppContext;
use crate::map::{COUNTRIES_ZOOM, DEFAULT_CENTER, MapView, Marker};
use crate::route::Route;
use crate::selection::SelectedEntity;

/// Owner recorded when nobody is signed in.
pub const ANONYMOUS_OWNER: &str = "user";
/// Provider the login gate signs in with.
pub const GATE_PROVIDER: &str = "google";

// ── Home ────────────────────────────────────────────────────────────

/// Landing page: forwards signed-in users to their map.
pub struct CountriesHomeScreen {
    ctx: AppContext,
}

impl CountriesHomeScreen {
    /// Open the gate; a signed-in user goes straight to the map.
    pub fn open(ctx: AppContext) -> Self {
        if ctx.session.is_logged() {
            ctx.navigate(Route::CountriesView);
        }
        Self { ctx }
    }

    /// Sign in, then go to the map if that worked.
    pub async fn login(&self) -> bool {
        self.ctx.session.login(GATE_PROVIDER).await;
        let logged = self.ctx.session.is_logged();
        if logged {
            self.ctx.navigate(Route::CountriesView);
        }
        logged
    }
}

// ── View ────────────────────────────────────────────────────────────

pub struct CountriesViewScreen {
    ctx: AppContext,
    state: FormState,
    countries: Vec<Country>,
    selected_image: Option<String>,
}

impl CountriesViewScreen {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            state: FormState::Idle,
            countries: Vec::new(),
            selected_image: None,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    /// Load the signed-in user's countries.
    pub async fn load(&mut self) -> Result<&[Country], ScreenError> {
        let Some(email) = self
            .ctx
            .session
            .user()
            .map(|s| s.email)
            .filter(|e| !e.is_empty())
        else {
            self.state = FormState::Failed(ScreenError::NoSession);
            return Err(ScreenError::NoSession);
        };

        self.state = FormState::Submitting;
        match self.ctx.api.countries_by_email(&email).await {
            Ok(countries) => {
                debug!(count = countries.len(), "visited countries loaded");
                self.countries = countries;
                self.state = FormState::Idle;
                Ok(&self.countries)
            }
            Err(e) => {
                warn!(error = %e, "visited countries fetch failed");
                self.state = FormState::Failed(ScreenError::FetchCountries);
                Err(ScreenError::FetchCountries)
            }
        }
    }

    /// Centered on the first country, one pin per country.
    pub fn map(&self) -> MapView {
        let center = self
            .countries
            .first()
            .map_or(DEFAULT_CENTER, Country::coordinates);
        let mut view = MapView::centered(center, COUNTRIES_ZOOM);
        view.markers = self
            .countries
            .iter()
            .map(|c| Marker {
                position: c.coordinates(),
                label: c.name.clone(),
                entity_id: c.id.clone(),
            })
            .collect();
        view
    }

    /// Surface a country's image, as a pin click would.
    pub fn marker_click(&mut self, index: usize) -> Option<&str> {
        let country = self.countries.get(index)?;
        self.ctx.selection.set(SelectedEntity::Country(country.clone()));
        self.selected_image = Some(country.image_url.clone());
        self.selected_image.as_deref()
    }

    pub fn selected_image(&self) -> Option<&str> {
        self.selected_image.as_deref()
    }

    pub fn create(&self) {
        self.ctx.navigate(Route::CountriesCreate);
    }
}

// ── Create ──────────────────────────────────────────────────────────

pub struct CountryCreateScreen {
    ctx: AppContext,
    pub name: String,
    pub image_url: String,
    state: FormState,
}

impl CountryCreateScreen {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            name: String::new(),
            image_url: String::new(),
            state: FormState::Idle,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub async fn attach_image(&mut self, image: ImageFile) -> Result<(), ScreenError> {
        match upload_image(&self.ctx, image).await {
            Ok(url) => {
                self.image_url = url;
                Ok(())
            }
            Err(e) => {
                self.state = FormState::Failed(e);
                Err(e)
            }
        }
    }

    /// Geocode the country name, record it for the signed-in user, and
    /// return to the map.
    pub async fn submit(&mut self) -> Result<Country, ScreenError> {
        self.state = FormState::Submitting;
        match self.try_submit().await {
            Ok(country) => {
                info!(id = %country.id, name = %country.name, "country recorded");
                self.state = FormState::Idle;
                self.ctx.navigate(Route::CountriesView);
                Ok(country)
            }
            Err(e) => {
                self.state = FormState::Failed(e);
                Err(e)
            }
        }
    }

    async fn try_submit(&self) -> Result<Country, ScreenError> {
        let coords = locate(
            &self.ctx,
            &self.name,
            ScreenError::CountryNotFound,
            ScreenError::CreateCountry,
        )
        .await?;

        let owner_email = self
            .ctx
            .session
            .user()
            .map_or_else(|| ANONYMOUS_OWNER.to_owned(), |s| s.email);

        let draft = CountryDraft {
            name: self.name.clone(),
            latitude: coords.latitude,
            longitude: coords.longitude,
            owner_email,
            image_url: self.image_url.clone(),
        };

        self.ctx.api.create_country(&draft).await.map_err(|e| {
            warn!(error = %e, "country creation failed");
            ScreenError::CreateCountry
        })
    }
}
