mod cli;
mod commands;
mod config;
mod error;
mod identity;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::commands::Runtime;
use crate::error::CliError;
use crate::identity::ProfileIdentity;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands never touch the backend
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "eventual", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let cfg = config::load_config_or_default();
            let (profile_name, profile) = config::active_profile(&cli.global, &cfg)?;
            let client_config = config::resolve_profile(&profile, &cfg, &cli.global)?;
            let identity = ProfileIdentity::new(profile_name, profile.identity.clone());
            let runtime = Runtime::new(&client_config, identity)?;

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &runtime, &cli.global).await
        }
    }
}
