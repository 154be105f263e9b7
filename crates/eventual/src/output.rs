//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.
//! Also hosts the small presentational pieces shared by commands and the
//! interactive browser: event cards, the map summary, header and footer.

use std::io::{self, IsTerminal, Write};

use chrono::Datelike;
use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use eventual_core::{Event, MapView, Session};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Small palette applied only when color is on.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    color: bool,
}

impl Painter {
    pub fn new(mode: &ColorMode) -> Self {
        Self {
            color: should_color(mode),
        }
    }

    pub fn title(self, text: &str) -> String {
        if self.color {
            text.bold().cyan().to_string()
        } else {
            text.to_owned()
        }
    }

    pub fn muted(self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_owned()
        }
    }

    pub fn ok(self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_owned()
        }
    }

    pub fn error(self, text: &str) -> String {
        if self.color {
            text.red().bold().to_string()
        } else {
            text.to_owned()
        }
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table; `to_row`
///   gets each item's 1-based position
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(usize, &T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data
                .iter()
                .enumerate()
                .map(|(i, item)| to_row(i + 1, item))
                .collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted
/// string, since single-item detail views don't use `Tabled` derive.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

pub(crate) fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_else(|e| format!("{{\"error\": \"serialization failed: {e}\"}}"))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("error: serialization failed: {e}"))
}

// ── Events ───────────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct EventRow {
    #[tabled(rename = "#")]
    pub position: usize,
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "When")]
    pub when: String,
    #[tabled(rename = "Where")]
    pub location: String,
}

impl EventRow {
    /// Row for the event shown at `position` (1-based, as `browse` asks).
    pub fn new(position: usize, e: &Event) -> Self {
        Self {
            position,
            id: e.id.clone(),
            name: e.name.clone(),
            when: eventual_core::time::to_input_format(&e.timestamp),
            location: e.location.clone(),
        }
    }
}

pub fn event_rows(events: &[Event]) -> Vec<EventRow> {
    events
        .iter()
        .enumerate()
        .map(|(i, e)| EventRow::new(i + 1, e))
        .collect()
}

/// Event card: the detail view of one event.
pub fn event_card(event: &Event) -> String {
    let mut lines = vec![
        format!("Event       {}", event.name),
        format!("ID          {}", event.id),
        format!(
            "When        {}",
            eventual_core::time::to_input_format(&event.timestamp)
        ),
        format!("Where       {}", event.location),
        format!("Coordinates {:.5}, {:.5}", event.latitude, event.longitude),
        format!("Organizer   {}", event.organizer),
    ];
    if !event.image_url.is_empty() {
        lines.push(format!("Image       {}", event.image_url));
    }
    lines.join("\n")
}

// ── Map ──────────────────────────────────────────────────────────────

#[derive(Tabled)]
struct MarkerRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Lat")]
    latitude: String,
    #[tabled(rename = "Lon")]
    longitude: String,
}

/// Map summary: center, zoom, circles, pins, and a permalink.
pub fn map_summary(view: &MapView) -> String {
    let mut out = format!(
        "Map centered on {:.5}, {:.5} (zoom {})\n{}",
        view.center.latitude,
        view.center.longitude,
        view.zoom,
        view.osm_url()
    );
    for circle in &view.circles {
        out.push_str(&format!(
            "\nCircle {:?}: {:.0} m around {:.5}, {:.5}",
            circle.kind, circle.radius_meters, circle.center.latitude, circle.center.longitude
        ));
    }
    if !view.markers.is_empty() {
        let rows: Vec<MarkerRow> = view
            .markers
            .iter()
            .enumerate()
            .map(|(i, m)| MarkerRow {
                position: i + 1,
                label: m.label.clone(),
                latitude: format!("{:.5}", m.position.latitude),
                longitude: format!("{:.5}", m.position.longitude),
            })
            .collect();
        out.push('\n');
        out.push_str(&render_table(&rows));
    }
    out
}

// ── Chrome ───────────────────────────────────────────────────────────

/// Top bar: brand on the left, session state on the right.
pub fn header(painter: Painter, session: Option<&Session>) -> String {
    let who = match session {
        Some(s) => format!(
            "Signed in as {}",
            s.display_name.as_deref().unwrap_or(&s.email)
        ),
        None => "Not signed in".to_owned(),
    };
    format!("{}  {}", painter.title("Eventual"), painter.muted(&who))
}

pub fn footer(painter: Painter) -> String {
    let year = chrono::Local::now().year();
    painter.muted(&format!(
        "© {year} Eventual. All rights reserved. Map data © OpenStreetMap contributors."
    ))
}
