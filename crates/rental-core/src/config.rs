//! Configuration management for the recommendation engine
//!
//! Handles where the catalog comes from and the request-count limits.

use crate::catalog::Catalog;
use crate::search::{DEFAULT_TOP_N, NEUTRAL_QUERY};
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

/// Where the catalog is loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// The builtin seed fleet
    Builtin,
    /// A `.csv` or `.json` file
    File(PathBuf),
}

impl CatalogSource {
    /// Load the catalog this source points at
    pub fn load(&self) -> Result<Catalog> {
        match self {
            CatalogSource::Builtin => Ok(Catalog::builtin()),
            CatalogSource::File(path) => Catalog::load(path)
                .with_context(|| format!("Failed to load catalog from {}", path.display())),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Catalog source
    pub catalog: CatalogSource,
    /// Result count when a request does not ask for one
    pub default_top_n: usize,
    /// Upper bound for requested result counts
    pub max_top_n: usize,
    /// Query used when a request has no categorical preference
    pub neutral_query: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogSource::Builtin,
            default_top_n: DEFAULT_TOP_N,
            max_top_n: 50,
            neutral_query: NEUTRAL_QUERY.to_string(),
        }
    }
}

impl EngineConfig {
    /// Use a catalog file instead of the builtin fleet
    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog = CatalogSource::File(path.into());
        self
    }

    /// Load configuration from environment variables
    ///
    /// Expected variables:
    /// - CATALOG_PATH: catalog file (.csv or .json); builtin fleet when unset
    /// - DEFAULT_TOP_N: default result count (default: 5)
    /// - MAX_TOP_N: maximum result count (default: 50)
    /// - NEUTRAL_QUERY: placeholder for empty preferences (default: "car")
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let catalog = match lookup("CATALOG_PATH").filter(|p| !p.trim().is_empty()) {
            Some(path) => CatalogSource::File(PathBuf::from(path.trim())),
            None => CatalogSource::Builtin,
        };

        let default_top_n = parse_count(&lookup, "DEFAULT_TOP_N", defaults.default_top_n)?;
        let max_top_n = parse_count(&lookup, "MAX_TOP_N", defaults.max_top_n)?;
        if max_top_n == 0 {
            return Err(anyhow!("MAX_TOP_N must be at least 1"));
        }

        let neutral_query = lookup("NEUTRAL_QUERY")
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .unwrap_or(defaults.neutral_query);

        Ok(Self {
            catalog,
            default_top_n: default_top_n.min(max_top_n),
            max_top_n,
            neutral_query,
        })
    }
}

fn parse_count(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: usize,
) -> Result<usize> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<usize>()
            .map_err(|_| anyhow!("Invalid {}: {}", key, value)),
        None => Ok(default),
    }
}
