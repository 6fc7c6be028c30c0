use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use anuncio::api::{HttpListingApi, ListingApi};
use anuncio::app::App;
use anuncio::config::Config;
use anuncio::draft::{DraftStore, FileStorage, MemoryStorage, ServiceType, SessionStorage};
use anuncio::logging;
use anuncio::ui;

#[derive(Parser)]
#[command(name = "anuncio")]
#[command(about = "Draft and publish marketplace service listings from the terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Keep the draft in memory only; nothing is written to the state directory
    #[arg(long)]
    ephemeral: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or clear the saved listing draft
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },

    /// List service types with their options and thumbnails
    Types {
        /// Do not contact the backend for thumbnail URLs
        #[arg(long)]
        offline: bool,
    },
}

#[derive(Subcommand)]
enum DraftAction {
    /// Print the saved draft as JSON
    Show,
    /// Delete the saved draft
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    let is_tui_mode = cli.command.is_none();
    let logging_handle = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    let storage = open_storage(&config, cli.ephemeral);

    match cli.command {
        Some(Commands::Draft { action }) => cmd_draft(&config, storage, action)?,
        Some(Commands::Types { offline }) => cmd_types(&config, offline).await?,
        None => run_tui(config, storage, logging_handle.log_file_path).await?,
    }

    Ok(())
}

fn open_storage(config: &Config, ephemeral: bool) -> Arc<dyn SessionStorage> {
    if ephemeral {
        tracing::debug!("Using in-memory session storage");
        Arc::new(MemoryStorage::new())
    } else {
        let storage = FileStorage::new(config.session_path());
        tracing::debug!(path = %storage.path().display(), "Using file session storage");
        Arc::new(storage)
    }
}

async fn run_tui(
    config: Config,
    storage: Arc<dyn SessionStorage>,
    log_file_path: Option<PathBuf>,
) -> Result<()> {
    let api: Arc<dyn ListingApi> = Arc::new(
        HttpListingApi::from_config(&config.api).context("Failed to set up marketplace client")?,
    );

    ui::install_panic_hook();
    let mut app = App::new(config, storage, api);
    let result = app.run().await;

    // Print log file path on exit if logs were written
    if let Some(log_path) = log_file_path {
        if let Ok(metadata) = log_path.metadata() {
            if metadata.len() > 0 {
                eprintln!("Session log: {}", log_path.display());
            }
        }
    }

    result
}

fn cmd_draft(config: &Config, storage: Arc<dyn SessionStorage>, action: DraftAction) -> Result<()> {
    let store = DraftStore::new(storage).with_photo_limit(config.photos.max_bytes);

    match action {
        DraftAction::Show => match store.load_persisted() {
            Some(persisted) => {
                let json = serde_json::to_string_pretty(&persisted)
                    .context("Failed to serialize draft")?;
                println!("{}", json);
            }
            None => println!("No saved draft"),
        },
        DraftAction::Clear => {
            store.clear();
            println!("Draft cleared");
        }
    }

    Ok(())
}

async fn cmd_types(config: &Config, offline: bool) -> Result<()> {
    let thumbnails = if offline {
        Default::default()
    } else {
        let api = HttpListingApi::from_config(&config.api)?;
        match api.fetch_thumbnails().await {
            Ok(thumbnails) => thumbnails,
            Err(e) => {
                eprintln!("Thumbnails unavailable: {}", e);
                Default::default()
            }
        }
    };

    println!("Service types");
    println!("{}", "─".repeat(60));

    for service_type in ServiceType::all() {
        println!("{} ({})", service_type.label(), service_type.id());
        for option in service_type.options() {
            println!("  - {} ({})", option.label, option.id);
        }
        if let Some(url) = thumbnails.get(service_type) {
            println!("  thumbnail: {}", url);
        }
    }

    Ok(())
}
