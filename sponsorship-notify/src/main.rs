//! sponsorship-notify web server.
//!
//! Listens for GitHub `sponsorship` webhooks and posts a thank-you with an
//! image to X whenever a new sponsorship is created.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sponsorship_notify::{router, AppState, Config, MediaAsset, XClient};

/// Post a thank-you to X for every new GitHub sponsor.
#[derive(Debug, Parser)]
#[command(name = "sponsorship-notify", about, disable_version_flag = true)]
struct Cli {
    /// Show version
    #[arg(long)]
    version: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // `--version` prints the bare version and exits before any configuration
    // is required.
    let cli = Cli::parse();
    if cli.version {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "web_server_starting");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    let asset = match &config.image_path {
        Some(path) => MediaAsset::from_path(path).context("Failed to load image")?,
        None => MediaAsset::bundled(),
    };

    info!(
        port = config.port,
        upload_url = %config.upload_url,
        post_url = %config.post_url,
        image_override = config.image_path.is_some(),
        image_bytes = asset.len(),
        request_timeout_ms = config.request_timeout.map(|d| d.as_millis() as u64),
        publish_timeout_ms = config.publish_timeout.map(|d| d.as_millis() as u64),
        "config_loaded"
    );

    let platform = XClient::new(&config).context("Failed to build HTTP client")?;

    // Create application state
    let state = AppState::new(&config, Arc::new(platform), asset);

    // Build the router
    let app = router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "ctrl_c_handler_failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "sigterm_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}
