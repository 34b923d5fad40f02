//! Hawaii Climate Query Service - Main
//!
//! Loads the climate dataset once at startup and serves read-only queries
//! over HTTP:
//! 1. Reads surfsup.toml (anchor date, window length, port, workers)
//! 2. Loads the measurement and station tables from SQLite or PostgreSQL
//! 3. Installs the dataset in the process-wide store
//! 4. Serves the precipitation, station, tobs and temperature-range endpoints
//!
//! Usage:
//!   cargo run --release                           # Serve on the configured port
//!   cargo run --release -- --port 8080            # Override the port
//!   cargo run --release -- --config other.toml    # Use another config file
//!
//! Environment:
//!   DATABASE_URL - sqlite:///Resources/hawaii.sqlite or a postgresql:// URL
//!   RUST_LOG     - log filter (default: info)

use std::env;
use std::sync::Arc;
use surfsup_service::config::{self, DEFAULT_CONFIG_PATH};
use surfsup_service::db::{self, DataSource};
use surfsup_service::endpoint;
use surfsup_service::query::QueryEngine;
use surfsup_service::store::Store;
use surfsup_service::window;

struct Args {
    config_path: String,
    port: Option<u16>,
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = env::args().collect();
    let mut parsed = Args {
        config_path: DEFAULT_CONFIG_PATH.to_string(),
        port: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" => {
                let value = args.get(i + 1).ok_or("--port requires a port number")?;
                parsed.port = Some(
                    value
                        .parse()
                        .map_err(|_| format!("Invalid port number: {}", value))?,
                );
                i += 2;
            }
            "--config" => {
                let value = args.get(i + 1).ok_or("--config requires a file path")?;
                parsed.config_path = value.clone();
                i += 2;
            }
            other => {
                return Err(format!(
                    "Unknown argument: {}\nUsage: {} [--port PORT] [--config PATH]",
                    other, args[0]
                ));
            }
        }
    }

    Ok(parsed)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("🌺 Hawaii Climate Query Service");

    let args = parse_args().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let config = config::load_config_from(&args.config_path).unwrap_or_else(|e| {
        log::error!("❌ Configuration error: {}", e);
        std::process::exit(1);
    });

    // Load the dataset once
    let source = DataSource::from_env_or(config.database.url.as_deref()).unwrap_or_else(|e| {
        log::error!("❌ {}", e);
        std::process::exit(1);
    });
    log::info!("📊 Loading dataset from {}", source.describe());

    let dataset = db::load_dataset(&source).unwrap_or_else(|e| {
        log::error!("❌ Failed to load dataset: {}", e);
        std::process::exit(1);
    });

    let settings = config.query_settings();
    let anchor = window::format_date(settings.anchor_date);
    match dataset.latest_date() {
        Some(latest) if latest != anchor => log::warn!(
            "Configured anchor date {} differs from latest measurement {}; \
             rolling windows end at the anchor",
            anchor,
            latest
        ),
        None => log::warn!("Dataset contains no measurements"),
        _ => {}
    }

    let store = Arc::new(Store::new());
    if let Err(e) = store.initialize(dataset) {
        log::error!("❌ {}", e);
        std::process::exit(1);
    }

    log::info!(
        "✓ Window: {} to {} ({} days)",
        window::format_date(settings.window_start()),
        anchor,
        settings.window_days
    );

    let engine = QueryEngine::new(store, settings);
    let port = args.port.unwrap_or(config.endpoint.port);

    if let Err(e) = endpoint::start_endpoint_server(port, config.endpoint.workers, engine) {
        log::error!("❌ {}", e);
        std::process::exit(1);
    }
}
