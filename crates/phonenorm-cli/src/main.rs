mod commands;
mod error;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{backup, demo, normalize, phones, Context};
use crate::error::{exit_code_for, report_error};
use phonenorm_config as config;
use phonenorm_store::{paths, Store};

#[derive(Debug, Parser)]
#[command(name = "phonenorm", version, about = "phone number normalizer")]
struct Cli {
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Drop and recreate the phone number table
    Reset,
    /// Insert raw values, or the fixture set when none are given
    Seed(phones::SeedArgs),
    Add(phones::AddArgs),
    List,
    /// Normalize every stored number and delete duplicates
    Normalize(normalize::NormalizeArgs),
    /// Snapshot the database to a separate SQLite file
    Backup(backup::BackupArgs),
    /// Reset, seed the fixtures, normalize and list
    Demo,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        db_path,
        config: config_path,
        json,
        verbose,
        command,
    } = cli;

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    if verbose {
        match config::resolve_config_path(config_path) {
            Ok(path) => {
                if path.exists() {
                    debug!(path = %path.display(), "config resolved");
                } else {
                    debug!(path = %path.display(), "config missing, using defaults");
                }
            }
            Err(err) => {
                debug!(error = %err, "config unavailable");
            }
        }
    }

    let db_path = paths::resolve_db_path(db_path.or_else(|| app_config.db_path.clone()))
        .with_context(|| "resolve database path")?;
    debug!(path = %db_path.display(), "database path resolved");

    let store =
        Store::open(&db_path).with_context(|| format!("open database {}", db_path.display()))?;
    store.migrate().with_context(|| "run migrations")?;

    let ctx = Context {
        store: &store,
        db_path: &db_path,
        json,
        config: &app_config,
    };

    match command {
        Command::Reset => phones::reset(&ctx),
        Command::Seed(args) => phones::seed(&ctx, args),
        Command::Add(args) => phones::add(&ctx, args),
        Command::List => phones::list(&ctx),
        Command::Normalize(args) => normalize::normalize(&ctx, args),
        Command::Backup(args) => backup::backup(&ctx, args),
        Command::Demo => demo::demo(&ctx),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
