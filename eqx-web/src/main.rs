//! eqx-web - Equinox banking dashboard service
//!
//! Serves the sign-in, home and verification workflow pages with their JSON
//! API on a single port.

use anyhow::Result;
use clap::Parser;
use eqx_common::config::{AppConfig, CliOverrides};
use eqx_web::{build_router, AppState};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "eqx-web", about = "Equinox banking dashboard service")]
struct Cli {
    /// HTTP port (overrides EQX_PORT and the config file)
    #[arg(long)]
    port: Option<u16>,

    /// SQLite database path (overrides EQX_DATABASE and the config file)
    #[arg(long)]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Equinox dashboard (eqx-web) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let cli = Cli::parse();
    let config = AppConfig::resolve(&CliOverrides {
        port: cli.port,
        database_path: cli.database,
    })?;
    info!("Database path: {}", config.database_path.display());

    let pool = eqx_common::db::init_database(&config.database_path).await?;
    info!("✓ Connected to database");

    let bind_addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(pool, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("eqx-web listening on http://{}", bind_addr);
    info!("Health check: http://{}/health", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
