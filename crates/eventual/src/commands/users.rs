//! User profile and rating handlers.

use eventual_api::{RatingSummary, Review, UserProfile};
use eventual_core::CoreError;

use crate::cli::{GlobalOpts, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::{Runtime, util};

pub async fn handle(rt: &Runtime, args: UsersArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        UsersCommand::Profile { id } => {
            let id = match id {
                Some(id) => id,
                None => {
                    util::sign_in(&rt.ctx, &rt.identity, None)
                        .await?
                        .backend_user_id
                }
            };
            let profile = rt
                .ctx
                .api
                .user_profile(&id)
                .await
                .map_err(|e| not_found_or(e, &id))?;
            let out = output::render_single(&global.output, &profile, profile_card, |p| {
                p.user.id.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Rate { id, rating } => {
            let session = util::sign_in(&rt.ctx, &rt.identity, None).await?;
            let review = Review {
                user: session.backend_user_id,
                rating,
            };
            let summary = rt
                .ctx
                .api
                .rate_user(&id, &review)
                .await
                .map_err(|e| not_found_or(e, &id))?;
            let out = output::render_single(&global.output, &summary, summary_line, |s| {
                format!("{:.2}", s.rating_average)
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

fn not_found_or(err: eventual_api::Error, id: &str) -> CliError {
    if err.is_not_found() {
        CliError::NotFound {
            resource_type: "user".into(),
            identifier: id.into(),
            list_command: "session whoami".into(),
        }
    } else {
        CoreError::from(err).into()
    }
}

/// Profile card shown in the profile dropdown and by `users profile`.
pub fn profile_card(p: &UserProfile) -> String {
    let u = &p.user;
    let mut lines = vec![
        format!("User        {} {}", u.name, u.surname).trim_end().to_owned(),
        format!("Username    {}", u.user_name),
        format!("Email       {}", u.email),
    ];
    if !u.description.is_empty() {
        lines.push(format!("About       {}", u.description));
    }
    if !u.profile_picture.is_empty() {
        lines.push(format!("Picture     {}", u.profile_picture));
    }
    lines.push(summary_line(&p.rating));
    lines.join("\n")
}

fn summary_line(s: &RatingSummary) -> String {
    format!(
        "Rating      {:.2} from {} review(s)",
        s.rating_average, s.total_rates
    )
}
