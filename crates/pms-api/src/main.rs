//! # pms-api: Binary Entry Point
//!
//! Starts the Axum HTTP server. Configuration comes from the environment;
//! see [`AppConfig::from_env`].

use pms_api::state::{AppConfig, AppState, LogFormat};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env();

    // Initialize structured tracing.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    if !config.patients_file.exists() {
        tracing::warn!(
            path = %config.patients_file.display(),
            "patients file not found; browse endpoints will return 500 until it exists"
        );
    }

    let port = config.port;
    let app = pms_api::app(AppState::with_config(config));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Patient Management System API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
