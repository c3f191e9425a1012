use anyhow::Result;
use std::sync::Arc;

mod config;
mod error;
mod logging;
mod routes;
mod services;
mod theme;
pub mod models;

use services::dashboard::Dashboard;
use services::fetch::HttpFetcher;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    logging::init_logging()?;

    // Load configuration
    let config = config::load_config()?;
    let addr = config.bind_addr;

    // Build our application state
    let state = Arc::new(AppState::new(config)?);

    let app = routes::router(state);

    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// Application state
pub struct AppState {
    config: config::Config,
    dashboard: Dashboard<HttpFetcher>,
}

impl AppState {
    fn new(config: config::Config) -> Result<Self, error::AppError> {
        let fetcher = Arc::new(HttpFetcher::new()?);
        let dashboard = Dashboard::new(&config, fetcher);
        Ok(Self { config, dashboard })
    }
}
