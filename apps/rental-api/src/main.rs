//! Rental Server - HTTP API for the car rental catalog
//!
//! Provides REST endpoints for:
//! - Catalog listing and lookup
//! - Preference-based recommendations (TF-IDF + brand diversity)
//! - Booking logging and booking-history suggestions
//! - Catalog reload without restart

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use rental_core::EngineConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

mod error;
mod handlers;
mod state;
#[cfg(test)]
mod tests;

use state::AppState;

/// Command-line arguments for the rental server
#[derive(Parser, Debug)]
#[command(name = "rental-api")]
#[command(about = "Car rental catalog and recommendation server")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Catalog file (.csv or .json), overrides CATALOG_PATH
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    // CORS configuration for web clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Catalog endpoints
        .route("/api/cars", get(handlers::list_cars))
        .route("/api/cars/:id", get(handlers::get_car))
        .route("/api/catalog/reload", post(handlers::reload_catalog))
        // Recommendation endpoints
        .route("/api/recommend", post(handlers::recommend))
        .route("/api/recommend/history", post(handlers::recommend_history))
        // Booking endpoints
        .route("/api/book", post(handlers::book))
        .route("/api/bookings/:user_id", get(handlers::list_bookings))
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let default_level = if args.verbose { "rental_api=debug" } else { "rental_api=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_level.parse()?)
                .add_directive("rental_core=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    // Load configuration
    let mut config = EngineConfig::from_env()?;
    if let Some(path) = args.catalog {
        config = config.with_catalog_path(path);
    }

    // Initialize application state
    info!("Initializing application state...");
    let state = Arc::new(AppState::new(config)?);

    let app = router(state);

    // Parse bind address
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("Starting server on http://{}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
