mod cache;
mod db;
mod error;
mod fetcher;
mod parser;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;

use parser::Event;
use settings::Settings;

#[derive(Parser)]
#[command(name = "econ_calendar", about = "Economic calendar scraper, prints events as JSON")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the live calendar page and print its events
    Fetch {
        /// Calendar URL (default: CALENDAR_URL or the built-in one)
        #[arg(long)]
        url: Option<String>,
        /// On failure, answer from the latest stored snapshot if there is one
        #[arg(long)]
        fallback: bool,
        /// Don't store the result as a snapshot
        #[arg(long)]
        no_store: bool,
    },
    /// Parse a saved calendar page from disk
    Parse {
        /// Path to an HTML file
        path: PathBuf,
    },
    /// Print the latest stored snapshot
    Cached,
}

#[tokio::main]
async fn main() -> ExitCode {
    // stdout is reserved for the JSON result
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(events) => match serde_json::to_string(&events) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => report(&e.into()),
        },
        Err(e) => report(&e),
    }
}

fn report(err: &anyhow::Error) -> ExitCode {
    println!("{}", serde_json::json!({ "error": format!("{err:#}") }));
    ExitCode::FAILURE
}

async fn run(command: Commands) -> Result<Vec<Event>> {
    let settings = Settings::load()?;

    match command {
        Commands::Fetch { url, fallback, no_store } => {
            let url = url.unwrap_or_else(|| settings.url.clone());
            fetch(&settings, &url, fallback, no_store).await
        }
        Commands::Parse { path } => {
            let html = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let events = parser::parse_calendar(&html)?;
            info!("Parsed {} events from {}", events.len(), path.display());
            Ok(events)
        }
        Commands::Cached => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let snap = db::latest_snapshot(&conn)?
                .context("No stored snapshot. Run 'fetch' first.")?;
            info!(snapshot = snap.id, fetched_at = %snap.fetched_at, "loaded snapshot");
            Ok(snap.events)
        }
    }
}

async fn fetch(settings: &Settings, url: &str, fallback: bool, no_store: bool) -> Result<Vec<Event>> {
    let policy = cache::Policy {
        ttl_secs: settings.cache_ttl_secs,
        fallback,
        store: !no_store,
    };
    let mut store = cache::Store::lazy(&settings.db_path);

    let live = async {
        let client = fetcher::build_client(settings)?;
        let html = fetcher::fetch_page(&client, url).await?;
        let events = parser::parse_calendar(&html)?;
        info!("Parsed {} events", events.len());
        Ok::<_, anyhow::Error>(events)
    };
    cache::fetch_with_store(&mut store, url, policy, Utc::now(), live).await
}
