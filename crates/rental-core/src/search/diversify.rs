//! Numeric filtering and brand diversification of scored cars
//!
//! Pure "most similar" ranking tends to fill the list with near-identical cars
//! from one dominant brand. The selection here runs, in order:
//!
//! 1. numeric filter (falls back to the unfiltered rows when nothing passes)
//! 2. stable sort by similarity, descending
//! 3. de-duplication by (brand, model), first row wins
//! 4. one row per brand, in similarity order
//! 5. backfill from the rows skipped in step 4 until `top_n` is reached
//! 6. truncate to `top_n`
//!
//! Every step is total: no input can make it fail.

use crate::search::{NumericBounds, ScoredCar};
use std::collections::HashSet;
use tracing::debug;

/// Brand-diverse top-N selection
pub struct Diversifier;

impl Diversifier {
    /// Run the full selection pipeline
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// // three toyotas (0.9, 0.8, 0.7) and two hondas (0.85, 0.6), top_n = 3
    /// let picked = Diversifier::select(scored, &NumericBounds::default(), 3);
    /// // -> toyota@0.9, honda@0.85, toyota@0.8
    /// ```
    pub fn select<'a>(
        scored: Vec<ScoredCar<'a>>,
        bounds: &NumericBounds,
        top_n: usize,
    ) -> Vec<ScoredCar<'a>> {
        if top_n == 0 {
            return Vec::new();
        }

        let filtered = apply_numeric_filter(scored, bounds);
        let sorted = sort_by_score(filtered);
        let unique = dedupe_models(sorted);
        let (mut picked, leftovers) = split_by_brand(unique);

        if picked.len() < top_n {
            let missing = top_n - picked.len();
            picked.extend(leftovers.into_iter().take(missing));
        }

        picked.truncate(top_n);
        picked
    }
}

/// Keep rows inside the bounds, or all rows if none are inside
pub fn apply_numeric_filter<'a>(
    scored: Vec<ScoredCar<'a>>,
    bounds: &NumericBounds,
) -> Vec<ScoredCar<'a>> {
    if bounds.min_mileage.is_none() && bounds.max_engine_cc.is_none() {
        return scored;
    }

    let passing: Vec<ScoredCar<'a>> = scored
        .iter()
        .copied()
        .filter(|s| bounds.accepts(s.car))
        .collect();

    if passing.is_empty() {
        debug!(
            "Numeric bounds {:?} exclude all {} rows, ignoring them",
            bounds,
            scored.len()
        );
        scored
    } else {
        passing
    }
}

/// Sort by descending score, keeping catalog order for ties
pub fn sort_by_score(mut scored: Vec<ScoredCar<'_>>) -> Vec<ScoredCar<'_>> {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// Drop every row whose (brand, model) pair was already seen
pub fn dedupe_models(sorted: Vec<ScoredCar<'_>>) -> Vec<ScoredCar<'_>> {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    sorted
        .into_iter()
        .filter(|s| seen.insert((s.car.brand.as_str(), s.car.model.as_str())))
        .collect()
}

/// Split rows into the first row of each brand and everything else
///
/// Both halves keep their input order.
pub fn split_by_brand<'a>(sorted: Vec<ScoredCar<'a>>) -> (Vec<ScoredCar<'a>>, Vec<ScoredCar<'a>>) {
    let mut brands: HashSet<&str> = HashSet::new();
    sorted
        .into_iter()
        .partition(|s| brands.insert(s.car.brand.as_str()))
}
