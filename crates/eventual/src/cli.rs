//! Clap derive structures for the `eventual` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// eventual -- geolocated events from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "eventual",
    version,
    about = "Find, publish and track geolocated events",
    long_about = "Search events near an address, publish and edit your own,\n\
        and keep a map of the countries you have visited.\n\n\
        Run `eventual browse` for an interactive session.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "EVENTUAL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, env = "EVENTUAL_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Geocoder URL (overrides profile)
    #[arg(long, env = "EVENTUAL_GEOCODER_URL", global = true)]
    pub geocoder_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "EVENTUAL_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "EVENTUAL_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "EVENTUAL_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search, publish and manage events
    #[command(alias = "ev", alias = "e")]
    Events(EventsArgs),

    /// Your map of visited countries
    #[command(alias = "paises")]
    Countries(CountriesArgs),

    /// User profiles and ratings
    Users(UsersArgs),

    /// Sign in and out with the profile's identity
    Session(SessionArgs),

    /// Interactive session that walks the app's pages
    Browse(BrowseArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Events ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct EventsArgs {
    #[command(subcommand)]
    pub command: EventsCommand,
}

#[derive(Debug, Subcommand)]
pub enum EventsCommand {
    /// Events around an address, oldest first
    #[command(alias = "near")]
    Search {
        /// Free-text address to geocode
        address: String,

        /// Also print the map summary
        #[arg(long, short = 'm')]
        map: bool,
    },

    /// List every event
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one event
    Get {
        /// Event ID
        id: String,
    },

    /// Publish a new event
    Create(EventFormArgs),

    /// Edit an existing event
    Edit {
        /// Event ID
        id: String,

        #[command(flatten)]
        changes: EventChangeArgs,
    },

    /// Delete an event
    #[command(alias = "rm")]
    Delete {
        /// Event ID
        id: String,
    },
}

/// Shared paging and ordering arguments for list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Max results
    #[arg(long, short = 'l')]
    pub limit: Option<u32>,

    /// Skip this many results
    #[arg(long)]
    pub offset: Option<u32>,

    /// Comma-separated sort keys
    #[arg(long, short = 's', default_value = "timestamp")]
    pub sort: String,
}

#[derive(Debug, Args)]
pub struct EventFormArgs {
    /// Event name
    #[arg(long, short = 'n')]
    pub name: String,

    /// Date and time, `dd/mm/YYYY HH:MM`
    #[arg(long = "at", short = 't')]
    pub timestamp: String,

    /// Address, geocoded to coordinates
    #[arg(long, short = 'l')]
    pub location: String,

    /// Poster image to upload
    #[arg(long, short = 'i')]
    pub image: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct EventChangeArgs {
    /// New name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// New date and time, `dd/mm/YYYY HH:MM`
    #[arg(long = "at", short = 't')]
    pub timestamp: Option<String>,

    /// New address
    #[arg(long, short = 'l')]
    pub location: Option<String>,

    /// Replacement poster image
    #[arg(long, short = 'i')]
    pub image: Option<PathBuf>,
}

// ── Countries ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CountriesArgs {
    #[command(subcommand)]
    pub command: CountriesCommand,
}

#[derive(Debug, Subcommand)]
pub enum CountriesCommand {
    /// Countries you have visited
    #[command(alias = "ls")]
    List {
        /// Also print the map summary
        #[arg(long, short = 'm')]
        map: bool,
    },

    /// Show a visited country's picture by its position in the list
    Show {
        /// 1-based position, as printed by `countries list`
        position: usize,
    },

    /// Record a visited country
    Add {
        /// Country name, geocoded to coordinates
        name: String,

        /// Picture to upload
        #[arg(long, short = 'i')]
        image: Option<PathBuf>,
    },
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// A user's profile with rating summary
    Profile {
        /// User ID (defaults to the signed-in user)
        id: Option<String>,
    },

    /// Rate a user from 1 to 5
    Rate {
        /// User ID to rate
        id: String,

        /// Rating
        #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,
    },
}

// ── Session ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Sign in, registering the backend user on first use
    Login {
        /// Identity provider (defaults to the profile's)
        #[arg(long)]
        provider: Option<String>,
    },

    /// Show who the profile signs in as
    Whoami,

    /// Sign out and forget the stored identity token
    Logout,
}

// ── Browse ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct BrowseArgs {
    /// Page to open, as a path (`/`, `/events/<id>`, `/paises`, ...)
    #[arg(default_value = "/")]
    pub path: String,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// Set a configuration value on the active profile
    Set {
        /// Config key (api_url, geocoder_url, timeout, ...)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store an identity token in the system keyring
    SetToken {
        /// Profile to store the token for (defaults to active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
