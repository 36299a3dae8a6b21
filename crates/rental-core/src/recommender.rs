//! Recommendation service
//!
//! Orchestrates one content-based recommendation:
//!
//! 1. Build a query phrase from the non-empty categorical preferences
//!    (or the neutral placeholder when there are none)
//! 2. Score every car of the current snapshot by cosine similarity
//! 3. Filter, de-duplicate and diversify with [`Diversifier`]
//!
//! The service never fails a request. Payloads that cannot be coerced come
//! back as an empty list; an empty catalog does too.

use crate::catalog::normalize_text;
use crate::config::EngineConfig;
use crate::index::{CatalogIndex, FittedCatalog};
use crate::search::{Diversifier, PreferenceRequest, RecommendationResult};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Content-based recommender over a shared catalog index
pub struct RecommendationService {
    index: Arc<CatalogIndex>,
    config: EngineConfig,
}

impl RecommendationService {
    pub fn new(index: Arc<CatalogIndex>, config: EngineConfig) -> Self {
        Self { index, config }
    }

    pub fn index(&self) -> &Arc<CatalogIndex> {
        &self.index
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Recommend cars for a typed request
    ///
    /// `top_n` falls back to the request's own count, then to the configured
    /// default, and is clamped to the configured maximum.
    pub fn recommend(
        &self,
        preferences: &PreferenceRequest,
        top_n: Option<usize>,
    ) -> Vec<RecommendationResult> {
        let snapshot = self.index.snapshot();
        let top_n = self.resolve_top_n(top_n.or(preferences.top_n));
        recommend_from(&snapshot, preferences, top_n, &self.config.neutral_query)
    }

    /// Recommend cars for a raw JSON payload
    ///
    /// A payload that cannot be coerced is logged and answered with an empty
    /// list.
    pub fn recommend_value(&self, payload: &Value) -> Vec<RecommendationResult> {
        match PreferenceRequest::from_value(payload) {
            Ok(preferences) => self.recommend(&preferences, None),
            Err(e) => {
                warn!("Ignoring malformed preference payload: {}", e);
                Vec::new()
            }
        }
    }

    fn resolve_top_n(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.config.default_top_n)
            .min(self.config.max_top_n)
    }
}

/// Join the non-empty categorical preferences into one normalized phrase
///
/// Returns `neutral` when every preference is absent or blank.
pub fn build_query(preferences: &PreferenceRequest, neutral: &str) -> String {
    let parts: Vec<String> = preferences
        .categorical()
        .iter()
        .flatten()
        .map(|p| normalize_text(p))
        .filter(|p| !p.is_empty())
        .collect();

    if parts.is_empty() {
        normalize_text(neutral)
    } else {
        parts.join(" ")
    }
}

/// Run one recommendation against a fitted snapshot
pub fn recommend_from(
    snapshot: &FittedCatalog,
    preferences: &PreferenceRequest,
    top_n: usize,
    neutral: &str,
) -> Vec<RecommendationResult> {
    if snapshot.catalog().is_empty() {
        debug!("Catalog is empty, nothing to recommend");
        return Vec::new();
    }

    let query = build_query(preferences, neutral);
    let scored = snapshot.score(&query);
    let picked = Diversifier::select(scored, &preferences.bounds(), top_n);

    debug!("Query '{}' -> {} recommendations", query, picked.len());
    picked.into_iter().map(RecommendationResult::from).collect()
}
