//! Session command handlers.

use serde::Serialize;

use eventual_core::screen::login::{LoginScreen, LogoutScreen};

use crate::cli::{GlobalOpts, SessionArgs, SessionCommand};
use crate::error::CliError;
use crate::output;

use super::{Runtime, util};

/// What `whoami` shows: the recorded account, never its token.
#[derive(Debug, Serialize)]
struct Whoami {
    profile: String,
    provider: String,
    oauth_id: String,
    email: Option<String>,
    display_name: Option<String>,
}

pub async fn handle(rt: &Runtime, args: SessionArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        SessionCommand::Login { provider } => {
            let configured = rt.identity.configured()?;
            let provider = provider.unwrap_or_else(|| configured.provider.clone());
            let session = LoginScreen::new(rt.ctx.clone())
                .login(&provider)
                .await
                .ok_or_else(|| CliError::AuthFailed {
                    profile: rt.identity.profile_name().to_owned(),
                })?;
            let out = output::render_single(
                &global.output,
                &session,
                |s| {
                    format!(
                        "Signed in as {} ({})\nUser ID     {}\nProvider    {}",
                        s.display_name.as_deref().unwrap_or("-"),
                        s.email,
                        s.backend_user_id,
                        s.auth_method
                    )
                },
                |s| s.backend_user_id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SessionCommand::Whoami => {
            let configured = rt.identity.configured()?;
            let who = Whoami {
                profile: rt.identity.profile_name().to_owned(),
                provider: configured.provider.clone(),
                oauth_id: configured.oauth_id.clone(),
                email: configured.email.clone(),
                display_name: configured.display_name.clone(),
            };
            let out = output::render_single(
                &global.output,
                &who,
                |w| {
                    format!(
                        "Profile     {}\nProvider    {}\nAccount     {}\nEmail       {}",
                        w.profile,
                        w.provider,
                        w.oauth_id,
                        w.email.as_deref().unwrap_or("-")
                    )
                },
                |w| w.oauth_id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SessionCommand::Logout => {
            if !util::confirm(
                &format!(
                    "Sign out of profile '{}' and forget its stored token?",
                    rt.identity.profile_name()
                ),
                global.yes,
            )? {
                return Ok(());
            }
            LogoutScreen::run(&rt.ctx).await;
            eventual_config::delete_id_token(rt.identity.profile_name())?;
            if !global.quiet {
                eprintln!("Signed out");
            }
            Ok(())
        }
    }
}
