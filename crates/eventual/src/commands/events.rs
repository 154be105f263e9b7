//! Event command handlers.

use tracing::warn;

use eventual_api::ListQuery;
use eventual_core::screen::event_create::{EventCreateScreen, EventForm};
use eventual_core::screen::event_edit::EventEditScreen;
use eventual_core::screen::event_view::{EventViewScreen, ViewState};
use eventual_core::map::DEFAULT_ZOOM;
use eventual_core::screen::events_main::EventsMainScreen;
use eventual_core::{CoreError, Event, MapView, time};

use crate::cli::{EventChangeArgs, EventsArgs, EventsCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::{Runtime, util};

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(rt: &Runtime, args: EventsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        EventsCommand::Search { address, map } => {
            let mut screen = EventsMainScreen::new(rt.ctx.clone());
            screen.address = address;
            let events = screen.search().await?;
            print_events(events, global);
            if map && matches!(global.output, OutputFormat::Table) {
                output::print_output(&output::map_summary(screen.map()), global.quiet);
            }
            Ok(())
        }

        EventsCommand::List(list) => {
            let query = ListQuery {
                fields: None,
                sort: Some(list.sort),
                offset: list.offset,
                limit: list.limit,
            };
            let resp = rt
                .ctx
                .api
                .list_events(&query)
                .await
                .map_err(CoreError::from)?;
            print_events(&resp.data, global);
            let show_total = !global.quiet && matches!(global.output, OutputFormat::Table);
            if let Some(total) = resp.total_count.filter(|_| show_total) {
                eprintln!("Showing {} of {total}", resp.data.len());
            }
            Ok(())
        }

        EventsCommand::Get { id } => {
            let event = load(rt, &id).await?;
            print_event(&event, global);
            Ok(())
        }

        EventsCommand::Create(form) => {
            ensure_timestamp(&form.timestamp)?;
            let mut screen = EventCreateScreen::new(rt.ctx.clone());
            screen.form = EventForm {
                name: form.name,
                timestamp: form.timestamp,
                location: form.location,
                image_url: String::new(),
            };
            if let Some(ref path) = form.image {
                let image = util::read_image(path)?;
                if let Err(e) = screen.attach_image(image).await {
                    warn!(path = %path.display(), "continuing without image");
                    eprintln!("{e}; the event is published without it");
                }
            }
            let event = screen.submit().await?;
            if !global.quiet {
                eprintln!("Event created");
            }
            print_event(&event, global);
            Ok(())
        }

        EventsCommand::Edit { id, changes } => {
            // The editor only opens on the selected event, so select it first.
            load(rt, &id).await?;
            let mut screen =
                EventEditScreen::open(rt.ctx.clone()).ok_or_else(|| not_found(&id))?;
            apply_changes(&mut screen.form, &changes)?;
            if let Some(ref path) = changes.image {
                let image = util::read_image(path)?;
                if let Err(e) = screen.attach_image(image).await {
                    warn!(path = %path.display(), "keeping the previous image");
                    eprintln!("{e}; the previous image is kept");
                }
            }
            let event = screen.submit().await?;
            if !global.quiet {
                eprintln!("Event updated");
            }
            print_event(&event, global);
            Ok(())
        }

        EventsCommand::Delete { id } => {
            let mut screen = EventViewScreen::new(rt.ctx.clone(), id.as_str());
            if let ViewState::Failed(e) = screen.load().await {
                return Err((*e).into());
            }
            let name = screen.event().map(|e| e.name.clone()).unwrap_or_default();
            screen.request_delete();
            if !util::confirm(&format!("Delete event '{name}'?"), global.yes)? {
                screen.cancel_delete();
                return Ok(());
            }
            screen.confirm_delete().await?;
            if !global.quiet {
                eprintln!("Event deleted");
            }
            Ok(())
        }
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Load an event through its detail screen, which also selects it.
async fn load(rt: &Runtime, id: &str) -> Result<Event, CliError> {
    let mut screen = EventViewScreen::new(rt.ctx.clone(), id);
    match screen.load().await {
        ViewState::Ready(event) | ViewState::ConfirmDelete(event) => Ok(event.clone()),
        ViewState::Failed(e) => Err((*e).into()),
        ViewState::Loading => Err(not_found(id)),
    }
}

fn not_found(id: &str) -> CliError {
    CliError::NotFound {
        resource_type: "event".into(),
        identifier: id.into(),
        list_command: "events list".into(),
    }
}

fn ensure_timestamp(raw: &str) -> Result<(), CliError> {
    if time::is_input_format(raw) {
        Ok(())
    } else {
        Err(CliError::Validation {
            field: "at".into(),
            reason: format!("expected dd/mm/YYYY HH:MM, got '{raw}'"),
        })
    }
}

fn apply_changes(form: &mut EventForm, changes: &EventChangeArgs) -> Result<(), CliError> {
    if let Some(ref name) = changes.name {
        form.name.clone_from(name);
    }
    if let Some(ref timestamp) = changes.timestamp {
        ensure_timestamp(timestamp)?;
        form.timestamp.clone_from(timestamp);
    }
    if let Some(ref location) = changes.location {
        form.location.clone_from(location);
    }
    Ok(())
}

fn print_events(events: &[Event], global: &GlobalOpts) {
    let out = output::render_list(
        &global.output,
        events,
        output::EventRow::new,
        |e| e.id.clone(),
    );
    output::print_output(&out, global.quiet);
}

fn print_event(event: &Event, global: &GlobalOpts) {
    let out = output::render_single(
        &global.output,
        event,
        |e| {
            let view = MapView::centered(e.coordinates(), DEFAULT_ZOOM).with_marker(
                e.coordinates(),
                &e.name,
                &e.id,
            );
            format!("{}\n\n{}", output::event_card(e), output::map_summary(&view))
        },
        |e| e.id.clone(),
    );
    output::print_output(&out, global.quiet);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_must_be_in_input_form() {
        assert!(ensure_timestamp("01/12/2024 20:30").is_ok());
        assert!(ensure_timestamp("2024-12-01T20:30").is_err());
    }

    #[test]
    fn changes_only_touch_given_fields() {
        let mut form = EventForm {
            name: "Old".into(),
            timestamp: "01/12/2024 20:30".into(),
            location: "Madrid".into(),
            image_url: "https://cdn.example.com/a.png".into(),
        };
        let changes = EventChangeArgs {
            name: Some("New".into()),
            timestamp: None,
            location: None,
            image: None,
        };
        assert!(apply_changes(&mut form, &changes).is_ok());
        assert_eq!(form.name, "New");
        assert_eq!(form.location, "Madrid");
    }
}
