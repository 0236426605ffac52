#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Min-max normalization and weighted building scoring.
//!
//! One scan over the batch establishes the normalization range for the
//! continuous metrics (oldest year, worst energy rank); each building is
//! then scalarized into a single weighted score. Older buildings and worse
//! labels score higher (hotter); the busy-road signal is binary.

use building_heatmap_building_models::Building;
use serde::{Deserialize, Serialize};

/// Normalized-score value used when a metric's range is degenerate
/// (min == max). Keeps the math free of divisions by zero and NaN.
const DEGENERATE_SCORE: f64 = 0.5;

/// Min/max bounds of the continuous metrics over one batch.
///
/// Computed once per batch; depends only on the data, never the weights.
/// An empty batch has no range, which is why construction returns
/// `Option` instead of leaking sentinel infinities downstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationRange {
    /// Minimum oldest-year over all buildings.
    pub min_year: i32,
    /// Maximum oldest-year over all buildings.
    pub max_year: i32,
    /// Minimum worst-energy-rank over all buildings.
    pub min_energy_rank: i8,
    /// Maximum worst-energy-rank over all buildings.
    pub max_energy_rank: i8,
}

impl NormalizationRange {
    /// Scans the batch once and returns its metric bounds, or `None` for
    /// an empty batch.
    #[must_use]
    pub fn compute(buildings: &[Building]) -> Option<Self> {
        let first = buildings.first()?;
        let mut range = Self {
            min_year: first.oldest_year,
            max_year: first.oldest_year,
            min_energy_rank: first.worst_energy_rank,
            max_energy_rank: first.worst_energy_rank,
        };
        for building in &buildings[1..] {
            range.min_year = range.min_year.min(building.oldest_year);
            range.max_year = range.max_year.max(building.oldest_year);
            range.min_energy_rank = range.min_energy_rank.min(building.worst_energy_rank);
            range.max_energy_rank = range.max_energy_rank.max(building.worst_energy_rank);
        }
        Some(range)
    }

    /// Normalized year score: 1 at the oldest year in the batch, 0 at the
    /// newest, [`DEGENERATE_SCORE`] when the range collapses.
    #[must_use]
    pub fn year_score(&self, oldest_year: i32) -> f64 {
        if self.max_year > self.min_year {
            1.0 - f64::from(oldest_year - self.min_year) / f64::from(self.max_year - self.min_year)
        } else {
            DEGENERATE_SCORE
        }
    }

    /// Normalized energy score: 1 at the worst label in the batch, 0 at
    /// the best, [`DEGENERATE_SCORE`] when the range collapses.
    #[must_use]
    pub fn energy_score(&self, worst_energy_rank: i8) -> f64 {
        if self.max_energy_rank > self.min_energy_rank {
            1.0 - f64::from(worst_energy_rank - self.min_energy_rank)
                / f64::from(self.max_energy_rank - self.min_energy_rank)
        } else {
            DEGENERATE_SCORE
        }
    }
}

/// User-supplied weights for the three scoring criteria.
///
/// Each weight is expected in [0, 1] and the sum is advisory: callers are
/// expected (but not required) to keep it at or below 1.0. The scorer
/// itself never clamps, so a sum above 1.0 produces scores above 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreWeights {
    /// Weight of the normalized energy score.
    pub energy_weight: f64,
    /// Weight of the normalized year score.
    pub year_weight: f64,
    /// Weight of the binary busy-road score.
    pub busy_road_weight: f64,
}

impl Default for ScoreWeights {
    /// The original slider defaults: energy 0.5, year 0.5, busy road 0.
    fn default() -> Self {
        Self {
            energy_weight: 0.5,
            year_weight: 0.5,
            busy_road_weight: 0.0,
        }
    }
}

impl ScoreWeights {
    /// Sum of the three weights.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.energy_weight + self.year_weight + self.busy_road_weight
    }
}

/// A normalization range paired with weights: everything needed to score
/// one building. Both halves stay fixed for the duration of one recompute
/// pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scorer {
    range: NormalizationRange,
    weights: ScoreWeights,
}

impl Scorer {
    /// Builds a scorer for a batch, or `None` when the batch is empty.
    ///
    /// Logs a warning (once per scorer, not per building) when the weight
    /// sum exceeds the advisory 1.0 cap.
    #[must_use]
    pub fn for_batch(buildings: &[Building], weights: ScoreWeights) -> Option<Self> {
        let range = NormalizationRange::compute(buildings)?;
        if weights.sum() > 1.0 {
            log::warn!(
                "Weight sum {:.2} exceeds 1.0; scores will not be bounded by 1.0",
                weights.sum()
            );
        }
        Some(Self { range, weights })
    }

    /// The batch range this scorer was built from.
    #[must_use]
    pub const fn range(&self) -> NormalizationRange {
        self.range
    }

    /// The weights this scorer applies.
    #[must_use]
    pub const fn weights(&self) -> ScoreWeights {
        self.weights
    }

    /// Scores a building from its derived metrics.
    #[must_use]
    pub fn score_metrics(&self, oldest_year: i32, worst_energy_rank: i8, on_busy_road: bool) -> f64 {
        let year_score = self.range.year_score(oldest_year);
        let energy_score = self.range.energy_score(worst_energy_rank);
        let busy_road_score = if on_busy_road { 1.0 } else { 0.0 };

        energy_score * self.weights.energy_weight
            + year_score * self.weights.year_weight
            + busy_road_score * self.weights.busy_road_weight
    }

    /// Scores a single building.
    #[must_use]
    pub fn score(&self, building: &Building) -> f64 {
        self.score_metrics(
            building.oldest_year,
            building.worst_energy_rank,
            building.on_busy_road,
        )
    }

    /// Scores the whole batch in input order.
    #[must_use]
    pub fn score_all(&self, buildings: &[Building]) -> Vec<f64> {
        buildings.iter().map(|b| self.score(b)).collect()
    }
}

/// Scores a batch in fixed-size chunks, in input order.
///
/// Chunking exists so an interactive host can yield to its scheduler
/// between chunks on large batches; boundaries never change the result.
/// The returned iterator is lazy: each `next()` scores one chunk.
pub fn score_chunks<'a>(
    scorer: &'a Scorer,
    buildings: &'a [Building],
    chunk_size: usize,
) -> impl Iterator<Item = Vec<f64>> + 'a {
    buildings
        .chunks(chunk_size.max(1))
        .map(|chunk| scorer.score_all(chunk))
}

#[cfg(test)]
mod tests {
    use super::*;
    use building_heatmap_building_models::AddressRecord;

    fn building(footprint: &str, year: i32, rank: i8, busy: bool) -> Building {
        Building {
            footprint: footprint.to_string(),
            addresses: vec![AddressRecord {
                address: "Teststraat 1".to_string(),
                energy_label: "C".to_string(),
                building_year: Some(year),
                on_busy_road: busy,
                neighborhood: "Centrum".to_string(),
                latitude: 52.37,
                longitude: 4.9,
            }],
            worst_energy_rank: rank,
            oldest_year: year,
            on_busy_road: busy,
        }
    }

    #[test]
    fn empty_batch_has_no_range() {
        assert!(NormalizationRange::compute(&[]).is_none());
        assert!(Scorer::for_batch(&[], ScoreWeights::default()).is_none());
    }

    #[test]
    fn single_building_batch_scores_degenerate_half() {
        let batch = vec![building("a", 1931, -2, false)];
        let scorer = Scorer::for_batch(&batch, ScoreWeights::default()).unwrap();
        let range = scorer.range();
        assert!((range.year_score(1931) - 0.5).abs() < f64::EPSILON);
        assert!((range.energy_score(-2) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn year_score_penalizes_older_buildings() {
        let batch = vec![building("a", 1900, 0, false), building("b", 2000, 0, false)];
        let range = NormalizationRange::compute(&batch).unwrap();
        assert!((range.year_score(1900) - 1.0).abs() < f64::EPSILON);
        assert!((range.year_score(2000) - 0.0).abs() < f64::EPSILON);
        assert!((range.year_score(1950) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn energy_score_penalizes_worse_labels() {
        let batch = vec![building("a", 2000, -2, false), building("b", 2000, 8, false)];
        let range = NormalizationRange::compute(&batch).unwrap();
        assert!((range.energy_score(-2) - 1.0).abs() < f64::EPSILON);
        assert!((range.energy_score(8) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn energy_only_weights_pass_energy_score_through() {
        let batch = vec![
            building("a", 2000, -2, false),
            building("b", 2000, 8, false),
            building("c", 2000, 0, true),
        ];
        let weights = ScoreWeights {
            energy_weight: 1.0,
            year_weight: 0.0,
            busy_road_weight: 0.0,
        };
        let scorer = Scorer::for_batch(&batch, weights).unwrap();
        let expected = scorer.range().energy_score(0);
        assert!((expected - 0.8).abs() < f64::EPSILON);
        assert!((scorer.score(&batch[2]) - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn busy_road_score_is_binary() {
        let batch = vec![building("a", 1900, 0, true), building("b", 2000, 4, false)];
        let weights = ScoreWeights {
            energy_weight: 0.0,
            year_weight: 0.0,
            busy_road_weight: 1.0,
        };
        let scorer = Scorer::for_batch(&batch, weights).unwrap();
        assert!((scorer.score(&batch[0]) - 1.0).abs() < f64::EPSILON);
        assert!((scorer.score(&batch[1]) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn score_is_not_clamped_when_weights_exceed_one() {
        let batch = vec![building("a", 1900, -2, true), building("b", 2000, 8, false)];
        let weights = ScoreWeights {
            energy_weight: 1.0,
            year_weight: 1.0,
            busy_road_weight: 1.0,
        };
        let scorer = Scorer::for_batch(&batch, weights).unwrap();
        // Oldest year, worst label, busy road: 1 + 1 + 1.
        assert!((scorer.score(&batch[0]) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn chunked_scoring_matches_unchunked_bit_for_bit() {
        let batch: Vec<Building> = (0..53)
            .map(|i| {
                building(
                    &format!("fp-{i}"),
                    1900 + i,
                    i8::try_from(i % 11).unwrap() - 2,
                    i % 3 == 0,
                )
            })
            .collect();
        let scorer = Scorer::for_batch(&batch, ScoreWeights::default()).unwrap();

        let whole = scorer.score_all(&batch);
        let chunked: Vec<f64> = score_chunks(&scorer, &batch, 7).flatten().collect();
        assert_eq!(whole.len(), chunked.len());
        for (a, b) in whole.iter().zip(&chunked) {
            assert_eq!(a.to_bits(), b.to_bits(), "chunk boundary changed a score");
        }
    }

    #[test]
    fn scoring_never_produces_nan() {
        let batch = vec![building("a", 1950, 3, false)];
        let scorer = Scorer::for_batch(&batch, ScoreWeights::default()).unwrap();
        assert!(scorer.score(&batch[0]).is_finite());
    }
}
