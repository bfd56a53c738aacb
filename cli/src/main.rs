//! Seatlock CLI server
//!
//! Headless seat booking service suitable for deployment as a systemd
//! service, Docker container, or standalone process.
//!
//! ```sh
//! # Run with default config (~/.config/seatlock/config.toml)
//! seatlock-service
//!
//! # Custom config path
//! seatlock-service --config /etc/seatlock/config.toml
//!
//! # Validate config without starting
//! seatlock-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use seatlock::config::AppConfig;
use seatlock::server::{init_tracing, ServerHandle, ServerOptions};

/// Seatlock: seat holds and paid booking commits for cinema showtimes.
#[derive(Parser, Debug)]
#[command(
    name = "seatlock-service",
    version,
    about = "Seat hold and booking commit service",
    long_about = "REST API server that holds cinema seats under short-lived \
                  session locks and commits paid bookings atomically.\n\n\
                  Default config: ~/.config/seatlock/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "SEATLOCK_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the seat lock duration in seconds.
    #[arg(long)]
    lock_duration: Option<i64>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(seatlock::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config from {}: {}", config_path.display(), e);
            if cli.check {
                return Err(e.into());
            }
            error!("Using default configuration.");
            AppConfig::default()
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.api_port {
        info!("CLI override: api_port = {}", port);
        config.server.api_port = port;
    }
    if let Some(secs) = cli.lock_duration {
        info!("CLI override: lock_duration_secs = {}", secs);
        config.booking.lock_duration_secs = secs;
    }
    if let Some(ref level) = cli.log_level {
        info!("CLI override: log_level = {}", level);
        config.logging.level = level.clone();
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        config.validate()?;
        println!("✅ Configuration is valid");
        println!("   Config file   : {}", config_path.display());
        println!("   API address   : {}:{}", config.server.api_host, config.server.api_port);
        println!("   Database      : {}", config.database.connection_url());
        println!("   Lock duration : {}s", config.booking.lock_duration_secs);
        println!("   Auto cleanup  : {}", config.cleanup.enable_auto_cleanup);
        println!("   Log level     : {}", config.logging.level);
        return Ok(());
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    handle.install_signal_handler();

    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
