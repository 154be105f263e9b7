//! Command dispatch: bridges CLI args -> core screens -> output formatting.

pub mod browse;
pub mod config_cmd;
pub mod countries;
pub mod events;
pub mod session;
pub mod users;
pub mod util;

use std::sync::Arc;

use eventual_core::{AppContext, ClientConfig, History, Route};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::identity::ProfileIdentity;

/// Everything a backend-bound command runs against.
pub struct Runtime {
    pub ctx: AppContext,
    /// Where screens send the user; `browse` follows it.
    pub history: Arc<History>,
    pub identity: Arc<ProfileIdentity>,
}

impl Runtime {
    pub fn new(config: &ClientConfig, identity: ProfileIdentity) -> Result<Self, CliError> {
        let history = Arc::new(History::starting_at(Route::Home));
        let identity = Arc::new(identity);
        let ctx = AppContext::new(config, identity.clone(), history.clone())?;
        Ok(Self {
            ctx,
            history,
            identity,
        })
    }
}

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, rt: &Runtime, global: &GlobalOpts) -> Result<(), CliError> {
    let _spinner = util::LoadingIndicator::attach(rt.ctx.loading(), global.quiet);
    match cmd {
        Command::Events(args) => events::handle(rt, args, global).await,
        Command::Countries(args) => countries::handle(rt, args, global).await,
        Command::Users(args) => users::handle(rt, args, global).await,
        Command::Session(args) => session::handle(rt, args, global).await,
        Command::Browse(args) => browse::handle(rt, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
