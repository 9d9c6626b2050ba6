//! PK5001Z Modem Monitor
//!
//! This application logs in to a PK5001Z DSL modem's web interface, polls its
//! WAN/DSL status page, and serves the parsed values as JSON sensors for a
//! home-automation host.

mod api;
mod core;
mod models;

use crate::api::endpoints::{AppState, create_router};
use crate::core::client::ModemClient;
use crate::core::config::Config;
use crate::core::logging::init_logging;
use crate::core::poller::Poller;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Check for --help flag
    if std::env::args().any(|arg| arg == "--help") {
        print_help();
        return;
    }

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            eprintln!("Configuration Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.log_level);

    print_startup_banner(&config);

    let client = match ModemClient::new(
        config.modem_base_url(),
        config.username.clone(),
        config.password.clone(),
        config.request_timeout,
    ) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create modem client: {}", e);
            std::process::exit(1);
        }
    };

    let poller = Arc::new(
        Poller::start(Arc::new(client), Duration::from_secs(config.min_interval)).await,
    );

    // Background polling
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poll_task = tokio::spawn(
        poller
            .clone()
            .run(Duration::from_secs(config.scan_interval), shutdown_rx),
    );

    let app = create_router(AppState {
        config: config.clone(),
        poller,
    });

    // Bind to address
    let addr = format!("{}:{}", config.host, config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Server listening on http://{}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    let _ = shutdown_tx.send(true);
    if let Err(e) = poll_task.await {
        error!("Poller task failed: {}", e);
    }

    if let Err(e) = served {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Resolve on Ctrl-C, or SIGTERM on unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("Shutdown requested");
}

/// Print startup banner with configuration
fn print_startup_banner(config: &Config) {
    let sensors: Vec<&str> = config.sensors.iter().map(|k| k.key()).collect();

    println!("PK5001Z Modem Monitor v{}", env!("CARGO_PKG_VERSION"));
    println!("Configuration loaded successfully");
    println!("   Modem: {}", config.modem_base_url());
    println!("   User: {}", config.username);
    println!("   Sensors: {}", sensors.join(", "));
    println!("   Scan Interval: {}s", config.scan_interval);
    println!("   Min Refresh Interval: {}s", config.min_interval);
    println!("   Request Timeout: {}s", config.request_timeout);
    println!("   Server: {}:{}", config.host, config.port);
    println!();
}

/// Print help message
fn print_help() {
    println!("PK5001Z Modem Monitor v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: pk5001z-monitor [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --help    Display this help message");
    println!();
    println!("Environment variables:");
    println!("  CONFIG_PATH - Path to the TOML configuration (default: config.toml)");
    println!("  RUST_LOG    - Overrides server.log_level when set");
    println!();
    println!("[modem]");
    println!("  host            - Modem address (required)");
    println!("  port            - Modem HTTP port (default: 80)");
    println!("  username        - Administrator user (required)");
    println!("  password        - Administrator password (required)");
    println!("  resources       - Sensors to expose (default: all)");
    println!();
    println!("[polling]");
    println!("  scan_interval   - Seconds between refreshes (default: 30)");
    println!("  min_interval    - Minimum seconds between refresh attempts (default: 10)");
    println!("  request_timeout - Modem request timeout in seconds (default: 15)");
    println!();
    println!("[server]");
    println!("  host            - Listen address (default: 0.0.0.0)");
    println!("  port            - Listen port (default: 8083)");
    println!("  log_level       - debug, info, warning, error (default: info)");
    println!();
    println!("Sensors:");
    for kind in crate::models::sensor::SensorKind::ALL {
        println!("  {:<17} {}", kind.key(), kind.name());
    }
}
