//! Rental Core - Car catalog and preference-based recommendations
//!
//! This crate provides:
//! - Catalog loading and normalization (CSV, JSON, builtin fleet)
//! - TF-IDF vectorization and cosine similarity scoring
//! - Brand-diverse top-N selection with numeric filters
//! - Atomically swappable fitted catalog snapshots
//! - Booking log with history-based suggestions
//! - Configuration management

pub mod bookings;
pub mod catalog;
pub mod config;
pub mod error;
pub mod index;
pub mod preferences;
pub mod recommender;
pub mod search;

// Re-export commonly used types
pub use bookings::{recommend_from_history, Booking, BookingLog};
pub use catalog::{CarRecord, Catalog, RawCarRow};
pub use config::{CatalogSource, EngineConfig};
pub use error::{BookingError, CatalogError, PreferenceError};
pub use index::{CatalogIndex, FittedCatalog};
pub use recommender::RecommendationService;
pub use search::{NumericBounds, PreferenceRequest, RecommendationResult, ScoredCar};
