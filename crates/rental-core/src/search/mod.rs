//! Search module - preference matching over the car catalog
//!
//! This module provides:
//! - TF-IDF vectorization of feature texts and preference phrases
//! - Cosine similarity scoring against the fitted catalog matrix
//! - Numeric filtering, de-duplication and brand diversification

pub mod diversify;
pub mod similarity;
pub mod vectorizer;

pub use diversify::Diversifier;
pub use similarity::{cosine_similarity, score_all};
pub use vectorizer::TfidfVectorizer;

use crate::catalog::CarRecord;
use serde::{Deserialize, Serialize};

/// Result count used when a request does not ask for one
pub const DEFAULT_TOP_N: usize = 5;

/// Placeholder query for requests with no categorical preference
pub const NEUTRAL_QUERY: &str = "car";

/// One recommendation query
///
/// Every field is optional; absent or empty means "no preference".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceRequest {
    #[serde(rename = "Brand", default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(rename = "Fuel_Type", default, skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
    #[serde(rename = "Transmission", default, skip_serializing_if = "Option::is_none")]
    pub transmission: Option<String>,
    #[serde(rename = "Body_Type", default, skip_serializing_if = "Option::is_none")]
    pub body_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_mileage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_engine_cc: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_n: Option<usize>,
}

impl PreferenceRequest {
    /// Categorical preferences in query order
    pub fn categorical(&self) -> [Option<&str>; 4] {
        [
            self.brand.as_deref(),
            self.fuel_type.as_deref(),
            self.transmission.as_deref(),
            self.body_type.as_deref(),
        ]
    }

    pub fn bounds(&self) -> NumericBounds {
        NumericBounds {
            min_mileage: self.min_mileage.filter(|v| v.is_finite()),
            max_engine_cc: self.max_engine_cc.filter(|v| v.is_finite()),
        }
    }
}

/// Advisory numeric constraints
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NumericBounds {
    pub min_mileage: Option<f64>,
    pub max_engine_cc: Option<f64>,
}

impl NumericBounds {
    pub fn accepts(&self, car: &CarRecord) -> bool {
        self.min_mileage.map_or(true, |min| car.mileage >= min)
            && self.max_engine_cc.map_or(true, |max| car.engine_cc <= max)
    }
}

/// A catalog row paired with its similarity to the current query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCar<'a> {
    pub car: &'a CarRecord,
    pub score: f32,
}

/// One output row of a recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    #[serde(rename = "Car_ID")]
    pub car_id: String,
    #[serde(rename = "Brand")]
    pub brand: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Fuel_Type")]
    pub fuel_type: String,
    #[serde(rename = "Transmission")]
    pub transmission: String,
    #[serde(rename = "Body_Type")]
    pub body_type: String,
    #[serde(rename = "Mileage")]
    pub mileage: f64,
    #[serde(rename = "Engine_CC")]
    pub engine_cc: f64,
    pub similarity_score: f32,
}

impl From<ScoredCar<'_>> for RecommendationResult {
    fn from(scored: ScoredCar<'_>) -> Self {
        let car = scored.car;
        Self {
            car_id: car.id.clone(),
            brand: car.brand.clone(),
            model: car.model.clone(),
            fuel_type: car.fuel_type.clone(),
            transmission: car.transmission.clone(),
            body_type: car.body_type.clone(),
            mileage: finite_or_zero(car.mileage),
            engine_cc: finite_or_zero(car.engine_cc),
            similarity_score: if scored.score.is_finite() {
                scored.score
            } else {
                0.0
            },
        }
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
