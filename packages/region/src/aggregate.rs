//! Spatial aggregation of building scores into regional means.
//!
//! For each region, every building whose representative point falls inside
//! the region's bounding box (inclusive) contributes its weighted score to
//! the region's arithmetic mean. Iteration order over both regions and
//! buildings is input order, so repeated runs on identical input produce
//! bit-identical means.

use building_heatmap_building_models::Building;
use building_heatmap_region_models::{Region, RegionScore};
use building_heatmap_scoring::Scorer;

use crate::RegionError;
use crate::store::RegionStore;

/// Aggregates building scores into one [`RegionScore`] per region.
///
/// Every region appears in the output, including those with zero matched
/// buildings (reported as no data, not a mean of zero). `scores` must be
/// the scorer output aligned with `buildings` in input order.
#[must_use]
pub fn aggregate_regions(
    regions: &[Region],
    buildings: &[Building],
    scores: &[f64],
) -> Vec<RegionScore> {
    debug_assert_eq!(buildings.len(), scores.len());

    regions
        .iter()
        .map(|region| {
            let mut sum = 0.0;
            let mut count: u64 = 0;

            for (building, score) in buildings.iter().zip(scores) {
                let Some((latitude, longitude)) = building.representative_point() else {
                    continue;
                };
                if region.bounding_box.contains(latitude, longitude) {
                    sum += score;
                    count += 1;
                }
            }

            let mean_score = (count > 0).then(|| {
                #[allow(clippy::cast_precision_loss)]
                let denominator = count as f64;
                sum / denominator
            });

            RegionScore {
                code: region.code.clone(),
                name: region.name.clone(),
                mean_score,
                building_count: count,
            }
        })
        .collect()
}

/// Scores a batch and aggregates it into the store's regions.
///
/// # Errors
///
/// Returns [`RegionError::BoundariesUnavailable`] unless the store is
/// ready. An empty batch produces all-no-data regions rather than an
/// error.
pub fn aggregate_with_store(
    store: &RegionStore,
    scorer: Option<&Scorer>,
    buildings: &[Building],
) -> Result<Vec<RegionScore>, RegionError> {
    let regions = store.regions()?;
    let scores = scorer.map_or_else(Vec::new, |s| s.score_all(buildings));
    let with_data = aggregate_regions(regions, &buildings[..scores.len()], &scores);
    log::info!(
        "Regional aggregation: {} of {} regions matched buildings",
        with_data.iter().filter(|r| r.has_data()).count(),
        with_data.len()
    );
    Ok(with_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use building_heatmap_building_models::AddressRecord;
    use building_heatmap_region_models::BoundingBox;
    use building_heatmap_scoring::ScoreWeights;

    fn building(footprint: &str, lat: f64, lon: f64, year: i32) -> Building {
        Building {
            footprint: footprint.to_string(),
            addresses: vec![AddressRecord {
                address: "Teststraat 1".to_string(),
                energy_label: "C".to_string(),
                building_year: Some(year),
                on_busy_road: false,
                neighborhood: "Centrum".to_string(),
                latitude: lat,
                longitude: lon,
            }],
            worst_energy_rank: 2,
            oldest_year: year,
            on_busy_road: false,
        }
    }

    fn region(code: &str, bbox: BoundingBox) -> Region {
        Region {
            code: code.to_string(),
            name: format!("Buurt {code}"),
            bounding_box: bbox,
        }
    }

    #[test]
    fn mean_of_matched_buildings() {
        let regions = vec![region("AA01", BoundingBox::new(52.0, 53.0, 4.0, 5.0))];
        let buildings = vec![
            building("a", 52.3, 4.8, 1900),
            building("b", 52.4, 4.9, 2000),
        ];
        let scores = vec![0.2, 0.8];

        let result = aggregate_regions(&regions, &buildings, &scores);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].building_count, 2);
        assert!((result[0].mean_score.unwrap() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn unmatched_region_reports_no_data() {
        let regions = vec![region("ZZ99", BoundingBox::new(0.0, 1.0, 0.0, 1.0))];
        let buildings = vec![building("a", 52.3, 4.8, 1950)];
        let scores = vec![0.4];

        let result = aggregate_regions(&regions, &buildings, &scores);
        assert_eq!(result[0].mean_score, None);
        assert_eq!(result[0].building_count, 0);
        assert!(!result[0].has_data());
    }

    #[test]
    fn building_without_coordinates_matches_nothing() {
        let regions = vec![region("AA01", BoundingBox::new(52.0, 53.0, 4.0, 5.0))];
        let buildings = vec![building("a", f64::NAN, f64::NAN, 1950)];
        let scores = vec![0.4];

        let result = aggregate_regions(&regions, &buildings, &scores);
        assert_eq!(result[0].building_count, 0);
    }

    #[test]
    fn aggregation_is_deterministic() {
        let regions = vec![
            region("AA01", BoundingBox::new(52.0, 53.0, 4.0, 5.0)),
            region("AA02", BoundingBox::new(52.0, 52.35, 4.0, 5.0)),
        ];
        let buildings: Vec<Building> = (0..40)
            .map(|i| building(&format!("fp-{i}"), 52.3 + f64::from(i) * 0.001, 4.8, 1900 + i))
            .collect();
        let scorer = Scorer::for_batch(&buildings, ScoreWeights::default()).unwrap();
        let scores = scorer.score_all(&buildings);

        let first = aggregate_regions(&regions, &buildings, &scores);
        let second = aggregate_regions(&regions, &buildings, &scores);
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.building_count, b.building_count);
            match (a.mean_score, b.mean_score) {
                (Some(x), Some(y)) => assert_eq!(x.to_bits(), y.to_bits()),
                (None, None) => {}
                _ => panic!("runs disagree on data presence"),
            }
        }
    }

    #[test]
    fn store_gating_blocks_until_ready() {
        let store = RegionStore::default();
        let buildings = vec![building("a", 52.3, 4.8, 1950)];
        let scorer = Scorer::for_batch(&buildings, ScoreWeights::default());
        let result = aggregate_with_store(&store, scorer.as_ref(), &buildings);
        assert!(matches!(
            result,
            Err(RegionError::BoundariesUnavailable { .. })
        ));
    }

    #[test]
    fn ready_store_aggregates_empty_batch_as_no_data() {
        let mut store = RegionStore::default();
        store.begin_loading();
        store.finish_loading(vec![region("AA01", BoundingBox::new(52.0, 53.0, 4.0, 5.0))]);
        let result = aggregate_with_store(&store, None, &[]).unwrap();
        assert_eq!(result.len(), 1);
        assert!(!result[0].has_data());
    }
}
