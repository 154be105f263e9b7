// ── Client-side routes and navigation ──
//
// Screens never jump to each other directly: they emit a `Route` through a
// `Navigator`, and whatever drives them (the interactive browser, a test
// recorder) decides what to show next.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

/// Every place a screen can send the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// Event list and nearby search.
    Home,
    EventCreate,
    EventView(String),
    EventEdit(String),
    Login,
    Logout,
    /// Return to the previous route.
    Back,
    CountriesHome,
    CountriesView,
    CountriesCreate,
}

impl Route {
    /// URL path this route corresponds to. `Back` has none.
    pub fn path(&self) -> Option<String> {
        let path = match self {
            Self::Home => "/".to_owned(),
            Self::EventCreate => "/events/create".to_owned(),
            Self::EventView(id) => format!("/events/{id}"),
            Self::EventEdit(id) => format!("/events/{id}/edit"),
            Self::Login => "/login".to_owned(),
            Self::Logout => "/logout".to_owned(),
            Self::Back => return None,
            Self::CountriesHome => "/paises".to_owned(),
            Self::CountriesView => "/paises/view".to_owned(),
            Self::CountriesCreate => "/paises/create".to_owned(),
        };
        Some(path)
    }

    /// Parse a URL path back into a route.
    pub fn from_path(path: &str) -> Option<Self> {
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        let route = match segments.as_slice() {
            [""] => Self::Home,
            ["events", "create"] => Self::EventCreate,
            ["events", id] => Self::EventView((*id).to_owned()),
            ["events", id, "edit"] => Self::EventEdit((*id).to_owned()),
            ["login"] => Self::Login,
            ["logout"] => Self::Logout,
            ["paises"] => Self::CountriesHome,
            ["paises", "view"] => Self::CountriesView,
            ["paises", "create"] => Self::CountriesCreate,
            _ => return None,
        };
        Some(route)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.path() {
            Some(path) => f.write_str(&path),
            None => f.write_str("<back>"),
        }
    }
}

/// Receives navigation requests from screens.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

// ── History ─────────────────────────────────────────────────────────

/// In-memory navigator with a back stack.
///
/// Keeps every request in order (including `Back`) so callers can tell
/// how many times and where a screen navigated.
#[derive(Debug, Default)]
pub struct History {
    inner: Mutex<HistoryInner>,
}

#[derive(Debug, Default)]
struct HistoryInner {
    stack: Vec<Route>,
    requests: Vec<Route>,
}

impl History {
    /// Start at `initial`.
    pub fn starting_at(initial: Route) -> Self {
        Self {
            inner: Mutex::new(HistoryInner {
                stack: vec![initial],
                requests: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HistoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Where the user is now. An empty history is `Home`.
    pub fn current(&self) -> Route {
        self.lock().stack.last().cloned().unwrap_or(Route::Home)
    }

    /// Every navigation request received, in order.
    pub fn requests(&self) -> Vec<Route> {
        self.lock().requests.clone()
    }

    /// Number of navigation requests received.
    pub fn count(&self) -> usize {
        self.lock().requests.len()
    }
}

impl Navigator for History {
    fn navigate(&self, route: Route) {
        debug!(%route, "navigate");
        let mut inner = self.lock();
        inner.requests.push(route.clone());
        if route == Route::Back {
            inner.stack.pop();
        } else {
            inner.stack.push(route);
        }
    }
}
