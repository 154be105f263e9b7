// Sign-in and sign-out pages.

use crate::context::AppContext;
use crate::route::Route;
use crate::session::Session;

pub struct LoginScreen {
    ctx: AppContext,
}

impl LoginScreen {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// The current session, shown as "welcome back" when present.
    pub fn session(&self) -> Option<Session> {
        self.ctx.session.user()
    }

    /// Sign in and return to wherever the user came from, whether or
    /// not the sign-in worked.
    pub async fn login(&self, provider: &str) -> Option<Session> {
        let session = self.ctx.session.login(provider).await;
        self.ctx.navigate(Route::Back);
        session
    }

    pub fn back(&self) {
        self.ctx.navigate(Route::Back);
    }
}

/// Signs out as soon as it is shown, then goes home.
pub struct LogoutScreen;

impl LogoutScreen {
    pub async fn run(ctx: &AppContext) {
        ctx.session.logout().await;
        ctx.navigate(Route::Home);
    }
}
