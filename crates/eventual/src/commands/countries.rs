//! Visited-country command handlers.

use tabled::Tabled;
use tracing::{debug, warn};

use eventual_core::Country;
use eventual_core::screen::countries::{CountriesViewScreen, CountryCreateScreen};

use crate::cli::{CountriesArgs, CountriesCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::{Runtime, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CountryRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Lat")]
    latitude: String,
    #[tabled(rename = "Lon")]
    longitude: String,
    #[tabled(rename = "Picture")]
    picture: String,
}

impl CountryRow {
    fn new(position: usize, c: &Country) -> Self {
        Self {
            position,
            name: c.name.clone(),
            latitude: format!("{:.4}", c.latitude),
            longitude: format!("{:.4}", c.longitude),
            picture: if c.image_url.is_empty() { "-" } else { "yes" }.into(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    rt: &Runtime,
    args: CountriesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CountriesCommand::List { map } => {
            let screen = open_view(rt).await?;
            let out = output::render_list(
                &global.output,
                screen.countries(),
                CountryRow::new,
                |c| c.id.clone(),
            );
            output::print_output(&out, global.quiet);
            if map && matches!(global.output, OutputFormat::Table) {
                output::print_output(&output::map_summary(&screen.map()), global.quiet);
            }
            Ok(())
        }

        CountriesCommand::Show { position } => {
            let mut screen = open_view(rt).await?;
            let count = screen.countries().len();
            let clicked = match position.checked_sub(1) {
                Some(index) => screen.marker_click(index).map(ToOwned::to_owned),
                None => None,
            };
            let image = clicked.ok_or_else(|| CliError::Validation {
                field: "position".into(),
                reason: format!("expected 1..={count}, got {position}"),
            })?;
            if image.is_empty() {
                eprintln!("No picture for this country");
            } else {
                output::print_output(&image, global.quiet);
            }
            Ok(())
        }

        CountriesCommand::Add { name, image } => {
            // Signing in is optional here: without an identity the country
            // is recorded for the anonymous owner.
            if rt.identity.configured().is_ok() {
                util::sign_in(&rt.ctx, &rt.identity, None).await?;
            } else {
                debug!("no identity configured; adding anonymously");
            }

            let mut screen = CountryCreateScreen::new(rt.ctx.clone());
            screen.name = name;
            if let Some(ref path) = image {
                let file = util::read_image(path)?;
                if let Err(e) = screen.attach_image(file).await {
                    warn!(path = %path.display(), "continuing without picture");
                    eprintln!("{e}; the country is recorded without it");
                }
            }
            let country = screen.submit().await?;
            if !global.quiet {
                eprintln!("Country recorded");
            }
            let out = output::render_single(
                &global.output,
                &country,
                |c| {
                    format!(
                        "Country     {}\nCoordinates {:.4}, {:.4}\nOwner       {}",
                        c.name, c.latitude, c.longitude, c.owner_email
                    )
                },
                |c| c.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

/// Sign in and load the signed-in user's countries.
async fn open_view(rt: &Runtime) -> Result<CountriesViewScreen, CliError> {
    util::sign_in(&rt.ctx, &rt.identity, None).await?;
    let mut screen = CountriesViewScreen::new(rt.ctx.clone());
    screen.load().await?;
    Ok(screen)
}
