//! Notes service: CLI server
//!
//! ```sh
//! # Run with default config (~/.config/notes-service/config.toml)
//! notes-service
//!
//! # Custom config path and port
//! notes-service --config /etc/notes-service/config.toml --port 9000
//!
//! # Validate config without starting
//! notes-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use notes_api::config::{default_config_path, AppConfig};
use notes_api::server::{init_tracing, ServerHandle, ServerOptions};

/// Notes service: REST backend for a notes-taking app.
#[derive(Parser, Debug)]
#[command(
    name = "notes-service",
    version,
    about = "REST API for a notes-taking application",
    long_about = "JSON REST API for users and notes with JWT session auth.\n\n\
                  Default config: ~/.config/notes-service/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "NOTES_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env is normal outside development.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(default_config_path);

    let loaded = AppConfig::load(&config_path);
    let mut config = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => AppConfig::default(),
    };
    config.apply_env();

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    init_tracing(&config);

    match loaded {
        Ok(_) => info!("Configuration loaded from {}", config_path.display()),
        Err(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }
    if let Ok(path) = dotenv {
        info!("Environment loaded from {}", path.display());
    }

    if let Err(e) = config.validate() {
        error!("{}", e);
        return Err(e.into());
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Address     : {}", config.server.address());
        println!("   Database    : {}", config.database.url);
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("Press Ctrl+C to shutdown gracefully.");

    // Wait for shutdown signal, then clean up
    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
