//! MDA HTTP Server Binary
//!
//! This is the main entry point for the MDA REST API server.
//! It loads the analysis configuration, creates the data provider, sets up
//! the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Run with the local (in-memory) provider (default)
//! cargo run --bin mda-server --features "local-provider,http-server"
//!
//! # Run against the remote AIS and classification services
//! MDA_PROVIDER=remote \
//!   cargo run --bin mda-server --features "remote-providers,http-server"
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `MDA_PROVIDER`: Provider backend, "local" or "remote"
//! - `MDA_AIS_BASE_URL`: AIS API base URL (selects the remote backend)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use mda_rust::config::AnalysisConfig;
use mda_rust::http::{create_router, AppState};
use mda_rust::providers::{ProviderFactory, ProviderKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting MDA HTTP Server");

    // Load analysis configuration (thresholds, forced-dark list, provider)
    let mut config = AnalysisConfig::from_default_locations()?;
    if let Ok(base_url) = env::var("MDA_AIS_BASE_URL") {
        config.provider.ais_base_url = base_url;
    }

    // The environment wins over the config file for backend selection
    let kind = match env::var("MDA_PROVIDER") {
        Ok(val) => ProviderKind::from_str(&val).unwrap_or(ProviderKind::Local),
        Err(_) => ProviderKind::from_str(&config.provider.kind).unwrap_or(ProviderKind::Local),
    };
    let provider = ProviderFactory::create(kind, &config.provider)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    info!("Provider initialized successfully ({:?})", kind);

    // Create application state
    let state = AppState::new(provider, config);

    // Create router with all endpoints
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);
    info!("API documentation: http://{}/health", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
