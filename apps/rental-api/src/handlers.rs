//! HTTP request handlers for the rental API
//!
//! Provides handlers for:
//! - Health checks
//! - Catalog listing and lookup
//! - Content-based and booking-history recommendations
//! - Booking logging
//! - Catalog reload

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use rental_core::{recommend_from_history, Booking, CarRecord, RecommendationResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct HistoryRequest {
    pub user_id: String,
    pub top_n: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct BookRequest {
    pub user_id: String,
    pub car_id: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub cars: usize,
    pub vocabulary: usize,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub cars: usize,
    pub vocabulary: usize,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let snapshot = state.index().snapshot();
    Json(HealthResponse {
        status: "ok".to_string(),
        cars: snapshot.catalog().len(),
        vocabulary: snapshot.vectorizer().dimension(),
    })
}

/// Full catalog
pub async fn list_cars(State(state): State<Arc<AppState>>) -> Json<Vec<CarRecord>> {
    let snapshot = state.index().snapshot();
    Json(snapshot.catalog().cars().to_vec())
}

/// Get car by ID
pub async fn get_car(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CarRecord>, ApiError> {
    let snapshot = state.index().snapshot();
    snapshot
        .catalog()
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(ApiError::CarNotFound(id))
}

/// Content-based recommendation endpoint
///
/// Always answers 200. A body that is not JSON, or JSON that cannot be read
/// as preferences, yields an empty list; an empty body is a neutral request.
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Json<Vec<RecommendationResult>> {
    let payload = if body.iter().all(u8::is_ascii_whitespace) {
        serde_json::Value::Null
    } else {
        match serde_json::from_slice(&body) {
            Ok(value) => value,
            Err(e) => {
                warn!("Recommendation body is not JSON: {}", e);
                return Json(Vec::new());
            }
        }
    };

    let results = state.recommender.recommend_value(&payload);
    info!("Recommend: {} results", results.len());
    Json(results)
}

/// Same-body-type suggestions from the user's latest booking
pub async fn recommend_history(
    State(state): State<Arc<AppState>>,
    Json(request): Json<HistoryRequest>,
) -> Json<Vec<CarRecord>> {
    let config = state.recommender.config();
    let top_n = request
        .top_n
        .unwrap_or(config.default_top_n)
        .min(config.max_top_n);

    let snapshot = state.index().snapshot();
    let bookings = state.bookings.read().await;
    let cars = recommend_from_history(&bookings, snapshot.catalog(), &request.user_id, top_n)
        .into_iter()
        .cloned()
        .collect();

    Json(cars)
}

/// Log a booking
pub async fn book(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BookRequest>,
) -> Result<Json<Booking>, ApiError> {
    let snapshot = state.index().snapshot();
    let mut bookings = state.bookings.write().await;
    let booking = bookings.log_booking(snapshot.catalog(), &request.user_id, &request.car_id)?;
    Ok(Json(booking))
}

/// A user's bookings, newest first
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Json<Vec<Booking>> {
    let bookings = state.bookings.read().await;
    Json(bookings.for_user(&user_id).into_iter().cloned().collect())
}

/// Re-read the configured catalog source and swap in a freshly fitted index
///
/// On failure the previous catalog keeps serving.
pub async fn reload_catalog(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReloadResponse>, ApiError> {
    let source = state.recommender.config().catalog.clone();
    info!("Reloading catalog from {:?}", source);

    let task_state = Arc::clone(&state);
    let fitted = tokio::task::spawn_blocking(move || -> anyhow::Result<_> {
        let catalog = source.load()?;
        Ok(task_state.index().replace(catalog))
    })
    .await
    .map_err(|e| ApiError::Internal(e.into()))??;

    Ok(Json(ReloadResponse {
        cars: fitted.catalog().len(),
        vocabulary: fitted.vectorizer().dimension(),
    }))
}
