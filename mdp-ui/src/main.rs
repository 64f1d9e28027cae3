//! mdp-ui - Multiple disease prediction web service
//!
//! Loads the six model artifacts, then serves the diabetes, heart disease
//! and Parkinson's forms. Nothing is served unless every artifact loaded.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mdp_common::config::{Overrides, Settings};
use mdp_common::ModelRegistry;
use mdp_ui::{build_router, AppState};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for mdp-ui
///
/// Each option falls back to its MDP_* environment variable, then the
/// config file, then the compiled default.
#[derive(Parser, Debug)]
#[command(name = "mdp-ui")]
#[command(about = "Diabetes, heart disease and Parkinson's risk prediction forms")]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the diabetes/, heart/ and parkinsons/ artifacts
    #[arg(short, long)]
    models_dir: Option<PathBuf>,

    /// Address to bind
    #[arg(short, long)]
    bind: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is resolved before tracing so the file can set the log level
    let settings = Settings::resolve(&Overrides {
        config: args.config,
        models_dir: args.models_dir,
        bind: args.bind,
        port: args.port,
    })
    .context("Failed to load configuration")?;

    let default_filter = format!(
        "mdp_ui={0},mdp_common={0},tower_http={0}",
        settings.log_level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting MDP prediction service (mdp-ui) v{}", env!("CARGO_PKG_VERSION"));
    for warning in &settings.warnings {
        warn!("{}", warning);
    }
    match &settings.config_file {
        Some(path) => info!("Config file: {}", path.display()),
        None => info!("No config file, using defaults"),
    }

    // Any missing or malformed artifact stops startup here
    let registry = match ModelRegistry::load(&settings.models_dir) {
        Ok(registry) => registry,
        Err(e) => {
            error!("Failed to load model artifacts: {}", e);
            return Err(e).context("Model artifacts unavailable");
        }
    };

    let app = build_router(AppState::new(registry));

    let addr = settings.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("mdp-ui listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
