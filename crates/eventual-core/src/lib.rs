// eventual-core: Session, selection, routing and page screens shared by Eventual clients.

pub mod config;
pub mod context;
pub mod error;
pub mod map;
pub mod route;
pub mod screen;
pub mod selection;
pub mod session;
pub mod time;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ClientConfig, DEFAULT_API_URL, TlsVerification};
pub use context::AppContext;
pub use error::CoreError;
pub use map::MapView;
pub use route::{History, Navigator, Route};
pub use screen::{FormState, ImageFile, ScreenError};
pub use selection::{SelectedEntity, SelectionCache};
pub use session::{AuthProvider, ExternalIdentity, IdentityProvider, Session, SessionStore};

// Wire types callers need alongside the screens.
pub use eventual_api::{Coordinates, Country, Event, LoadingCounter};
