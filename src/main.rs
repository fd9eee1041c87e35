use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::sync::mpsc;

use cinelist::api::{AuthClient, Gateway, RequestPolicy};
use cinelist::app::{App, AppEvent};
use cinelist::config::{Config, API_URL_ENV};
use cinelist::session::TokenStore;
use cinelist::storage::{Database, DatabaseError};
use cinelist::ui;
use cinelist::util::parse_service_url;

/// Get the config directory path (~/.config/cinelist/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let config_dir = PathBuf::from(home).join(".config").join("cinelist");
    Ok(config_dir)
}

#[derive(Parser, Debug)]
#[command(
    name = "cinelist",
    about = "Terminal client for movie recommendations and a priority-ordered watchlist"
)]
struct Args {
    /// Base URL of the recommendation service (overrides config and CINELIST_API_URL)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Path to the config file (defaults to ~/.config/cinelist/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// End the stored session and exit
    #[arg(long)]
    logout: bool,
}

/// The TUI owns stdout, so logs go to a file in the config directory.
fn init_tracing(config_dir: &std::path::Path) -> Result<()> {
    let log_path = config_dir.join("cinelist.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file '{}'", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up config directory
    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    }

    // SEC-007: Set directory permissions on Unix (user-only access)
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o700);
        if let Err(e) = std::fs::set_permissions(&config_dir, perms) {
            eprintln!(
                "Warning: failed to restrict '{}' to 0700: {}",
                config_dir.display(),
                e
            );
        }
    }

    init_tracing(&config_dir)?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from '{}'", config_path.display()))?
        .with_overrides(std::env::var(API_URL_ENV).ok(), args.api_url.clone());

    let base_url = parse_service_url(&config.api_base_url)
        .with_context(|| format!("Unusable service URL '{}'", config.api_base_url))?;

    // Open state database
    let db_path = config_dir.join("state.db");
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = match Database::open(db_path_str).await {
        Ok(db) => db,
        Err(DatabaseError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of cinelist appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => {
            return Err(anyhow::anyhow!("Failed to open database: {}", e));
        }
    };

    let tokens = TokenStore::load(db)
        .await
        .context("Failed to restore session")?;

    let policy = RequestPolicy {
        timeout: config.request_timeout(),
        retry_transport_once: config.retry_on_transport_error,
    };
    let gateway = Gateway::new(base_url, tokens, policy).context("Failed to build HTTP client")?;

    tracing::info!(
        api_base_url = %gateway.base_url(),
        logged_in = gateway.tokens().is_present(),
        "Starting cinelist"
    );

    // Handle --logout flag
    if args.logout {
        if !gateway.tokens().is_present() {
            println!("No active session.");
            return Ok(());
        }
        AuthClient::new(gateway)
            .logout()
            .await
            .context("Failed to clear session")?;
        println!("Logged out.");
        return Ok(());
    }

    let mut app = App::new(config, gateway);

    // Create event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    // Run the TUI
    ui::run(&mut app, event_tx, event_rx).await?;

    println!("Goodbye!");
    Ok(())
}
