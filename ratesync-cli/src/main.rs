//! Ratesync CLI - daily central bank rates into the CRM currency registry

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{exit, rates, sync};

/// Ratesync - sync daily exchange rates into the CRM currency registry
#[derive(Parser)]
#[command(name = "ratesync", version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (defaults to $RATESYNC_DIR/settings.json or ~/.ratesync/settings.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch today's rates and write them to the registry
    Sync {
        /// Rates date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Create currencies missing from the registry
        #[arg(long, conflicts_with = "no_create")]
        allow_create: bool,
        /// Skip currencies missing from the registry
        #[arg(long)]
        no_create: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch and print rates without touching the registry
    Rates {
        /// Rates date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Comma-separated currency codes (defaults to the configured list)
        #[arg(long)]
        currencies: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            output::error(&format!("{:#}", e));
            exit::for_error(&e)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_target(false)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Sync { date, allow_create, no_create, json } => {
            let create_override = match (allow_create, no_create) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            sync::run(config, date, create_override, json)
        }
        Commands::Rates { date, currencies, json } => rates::run(config, date, currencies.as_deref(), json),
    }
}
