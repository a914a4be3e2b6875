pub mod api;
pub mod booking;
pub mod config;
pub mod db;
pub mod models;
pub mod schedule;

use std::net::{Ipv4Addr, SocketAddr};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

/// Process entry point: configure, connect, serve until Ctrl-C.
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} backend starting v{}", config::APP_NAME, config::APP_VERSION);

    let settings = config::Settings::from_env().context("Invalid configuration")?;

    let store = db::connect(&settings.database)
        .await
        .context("Failed to connect to database")?;

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, settings.port));
    api::serve(store, addr)
        .await
        .with_context(|| format!("Server failed on {addr}"))
}
