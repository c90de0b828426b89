use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wl_cli::commands::{log, meetings};
use wl_cli::{Cli, Commands, Config};

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so the summary on stdout stays clean
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match &cli.command {
        Some(Commands::Log(args)) => {
            let config = load_config(cli.config.as_deref())?;
            let mut input = io::stdin().lock();
            let mut output = io::stdout().lock();
            log::run(&mut input, &mut output, args, &config)?;
        }
        Some(Commands::Meetings { when }) => {
            let config = load_config(cli.config.as_deref())?;
            meetings::run(&mut io::stdout().lock(), when.as_deref(), &config)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
