//! Fitted catalog snapshots
//!
//! A [`FittedCatalog`] bundles a catalog with the vectorizer fitted on it and
//! the matrix of its feature vectors. The three are built together and never
//! mutated, so a snapshot is always internally consistent.
//!
//! [`CatalogIndex`] is the process-wide handle. Readers take an `Arc` to the
//! current snapshot and work on it without holding any lock; a reload fits a
//! complete new snapshot first and then swaps the pointer in a single write.

use crate::catalog::Catalog;
use crate::search::{score_all, ScoredCar, TfidfVectorizer};
use std::sync::{Arc, RwLock};
use tracing::info;

/// Catalog, vocabulary and matrix from one catalog snapshot
#[derive(Debug, Clone, Default)]
pub struct FittedCatalog {
    catalog: Catalog,
    vectorizer: TfidfVectorizer,
    matrix: Vec<Vec<f32>>,
}

impl FittedCatalog {
    /// Fit the vectorizer over the catalog feature texts
    pub fn fit(catalog: Catalog) -> Self {
        let texts = catalog.feature_texts();
        let vectorizer = TfidfVectorizer::fit(&texts);
        let matrix = vectorizer.transform_all(&texts);

        info!(
            "Fitted catalog: {} cars, vocabulary size {}",
            catalog.len(),
            vectorizer.dimension()
        );

        Self {
            catalog,
            vectorizer,
            matrix,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn matrix(&self) -> &[Vec<f32>] {
        &self.matrix
    }

    /// Score every catalog row against a query string
    pub fn score(&self, query: &str) -> Vec<ScoredCar<'_>> {
        let query_vector = self.vectorizer.transform(query);
        let scores = score_all(&self.matrix, &query_vector);

        self.catalog
            .iter()
            .zip(scores)
            .map(|(car, score)| ScoredCar { car, score })
            .collect()
    }
}

/// Shared, atomically replaceable catalog snapshot
#[derive(Debug, Default)]
pub struct CatalogIndex {
    current: RwLock<Arc<FittedCatalog>>,
}

impl CatalogIndex {
    pub fn new(catalog: Catalog) -> Self {
        Self::from_fitted(FittedCatalog::fit(catalog))
    }

    pub fn from_fitted(fitted: FittedCatalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(fitted)),
        }
    }

    /// The snapshot serving right now
    pub fn snapshot(&self) -> Arc<FittedCatalog> {
        // a poisoned lock still holds a complete snapshot
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Refit on a new catalog and swap it in, returning the new snapshot
    pub fn replace(&self, catalog: Catalog) -> Arc<FittedCatalog> {
        let fitted = Arc::new(FittedCatalog::fit(catalog));
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::clone(&fitted);
        fitted
    }
}
