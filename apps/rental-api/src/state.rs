//! Application state for the rental API
//!
//! Holds the recommendation service (and through it the shared catalog
//! index) plus the booking log.

use anyhow::Result;
use rental_core::{BookingLog, Catalog, CatalogIndex, EngineConfig, RecommendationService};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Shared application state
pub struct AppState {
    /// Content-based recommender over the current catalog snapshot
    pub recommender: RecommendationService,
    /// Booking interactions
    pub bookings: RwLock<BookingLog>,
}

impl AppState {
    /// Load the configured catalog and fit the engine
    ///
    /// A catalog that cannot be loaded aborts startup.
    pub fn new(config: EngineConfig) -> Result<Self> {
        info!("Loading catalog from {:?}", config.catalog);
        let catalog = config.catalog.load()?;
        Ok(Self::with_catalog(config, catalog))
    }

    /// Build state around an already loaded catalog
    pub fn with_catalog(config: EngineConfig, catalog: Catalog) -> Self {
        let index = Arc::new(CatalogIndex::new(catalog));
        Self {
            recommender: RecommendationService::new(index, config),
            bookings: RwLock::new(BookingLog::new()),
        }
    }

    /// The shared catalog index
    pub fn index(&self) -> &Arc<CatalogIndex> {
        self.recommender.index()
    }
}
