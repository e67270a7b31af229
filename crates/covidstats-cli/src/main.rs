//! covidstats - fetch global COVID-19 statistics and keep an editable list of them.
//!
//! Each subcommand stands in for one action of the old list view: `refresh`
//! is the view appearing, `add`/`remove`/`commit` are the edit buttons.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use covidstats_core::app::FetchOutcome;
use covidstats_core::utils::age_display;
use covidstats_core::{App, Config, RowKind, StatsClient};
use owo_colors::OwoColorize;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable naming a directory for log files
const LOG_DIR_ENV: &str = "COVIDSTATS_LOG_DIR";

/// Log file name prefix inside the log directory
const LOG_FILE_PREFIX: &str = "covidstats.log";

#[derive(Parser)]
#[command(name = "covidstats")]
#[command(about = "Global COVID-19 statistics as an editable list", long_about = None)]
#[command(version)]
struct Cli {
    /// Preferences file (defaults to the user config directory)
    #[arg(long, global = true)]
    prefs: Option<PathBuf>,

    /// Stats endpoint to fetch from
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the latest stats and replace the list
    Refresh,

    /// Show the current list
    List,

    /// Add an entry to the list
    Add {
        /// Entry text
        entry: String,
    },

    /// Remove entries from the list
    Remove {
        /// Entries to remove (exact text)
        #[arg(required = true)]
        entries: Vec<String>,
    },

    /// Replace the list with the given values, dropping blank ones
    Commit {
        /// Values as currently edited
        values: Vec<String>,
    },

    /// Fetch the stats and print the raw records as JSON, leaving the list alone
    Fetch,
}

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr unless `COVIDSTATS_LOG_DIR` names a directory, in which
/// case they are written to a daily log file there. The returned guard
/// flushes the file writer on drop.
fn init_tracing() -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match std::env::var(LOG_DIR_ENV) {
        Ok(dir) if !dir.is_empty() => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Some(guard)
        }
        _ => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = init_tracing();

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(prefs) = cli.prefs {
        config.preferences_path = Some(prefs);
    }
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = Some(endpoint);
    }

    match cli.command {
        Commands::Refresh => refresh(&mut open_app(&config)?).await?,
        Commands::List => print_rows(&open_app(&config)?),
        Commands::Add { entry } => {
            let mut app = open_app(&config)?;
            if app.store_mut().add(entry.as_str())? {
                println!("Added {}", entry);
            } else if entry.trim().is_empty() {
                println!("{}", "Ignored blank entry".yellow());
            } else {
                println!("Already present: {}", entry);
            }
        }
        Commands::Remove { entries } => {
            let mut app = open_app(&config)?;
            let removed = app.store_mut().remove(&entries)?;
            println!("Removed {} of {} entries", removed, entries.len());
        }
        Commands::Commit { values } => {
            let mut app = open_app(&config)?;
            app.store_mut().commit_edits(values)?;
            print_rows(&app);
        }
        Commands::Fetch => dump_stats(&config).await?,
    }

    Ok(())
}

fn open_app(config: &Config) -> Result<App> {
    let app = App::new(config)?;
    info!(rows = app.row_count(), "Scheme list opened");
    Ok(app)
}

/// Simulate the view appearing: fetch, apply, show the result.
///
/// The list is printed either way; a failed fetch is returned as the error
/// and reported once by `main`.
async fn refresh(app: &mut App) -> Result<()> {
    eprintln!("Fetching global stats...");
    app.on_view_appear();

    let outcome = app.wait_for_fetch().await;
    print_rows(app);
    if let Some(rows) = check_outcome(outcome)? {
        eprintln!("{}", format!("Updated {} rows", rows).green());
    }
    Ok(())
}

/// Turn a fetch outcome into the updated row count, or the fetch error.
fn check_outcome(outcome: Option<FetchOutcome>) -> Result<Option<usize>> {
    match outcome {
        Some(FetchOutcome::Applied { rows }) => Ok(Some(rows)),
        Some(FetchOutcome::Failed(e)) => {
            Err(anyhow::Error::new(e).context("Failed to refresh global stats, keeping previous list"))
        }
        None => Ok(None),
    }
}

/// Fetch and print the decoded records as JSON.
async fn dump_stats(config: &Config) -> Result<()> {
    let client = StatsClient::with_url(config.endpoint())?;
    let stats = client
        .fetch()
        .await
        .with_context(|| format!("Failed to fetch stats from {}", client.url()))?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn print_rows(app: &App) {
    let rows = app.rows();
    if rows.is_empty() {
        println!("{}", "(empty)".dimmed());
    }
    for (row, kind) in &rows {
        println!("{}", paint(row, *kind));
    }

    let updated = match app.store().last_refresh() {
        Some(at) => format!("Updated {}", age_display(at)),
        None => "Never refreshed".to_string(),
    };
    println!("{}", updated.dimmed());
}

fn paint(row: &str, kind: RowKind) -> String {
    match kind {
        RowKind::Deaths => row.red().to_string(),
        RowKind::Recovered => row.green().to_string(),
        RowKind::Unresolved => row.bright_black().to_string(),
        RowKind::Default => row.blue().to_string(),
    }
}
