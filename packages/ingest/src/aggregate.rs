//! Footprint-keyed building aggregation.
//!
//! Groups address rows into [`Building`] entities by exact WKT string
//! identity. Iteration order of the resulting buildings equals the order
//! of first appearance in the input, so repeated runs over the same data
//! produce identical downstream aggregates.

use std::collections::HashMap;

use building_heatmap_building_models::{AddressRecord, BatchStats, Building};

use crate::parsing::RawRecord;

/// Groups raw rows into buildings.
///
/// Records with an empty footprint are skipped entirely and counted in
/// [`BatchStats::skipped_missing_footprint`]; they never contribute to any
/// building. Grouping is O(n) via a footprint-keyed index into an
/// insertion-ordered list.
#[must_use]
pub fn group_buildings<I>(records: I) -> (Vec<Building>, BatchStats)
where
    I: IntoIterator<Item = RawRecord>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<AddressRecord>)> = Vec::new();
    let mut stats = BatchStats::default();

    for record in records {
        if record.missing_footprint() {
            stats.skipped_missing_footprint += 1;
            continue;
        }

        let address = record.to_address();
        match index.get(&record.building_polygon_wkt) {
            Some(&slot) => groups[slot].1.push(address),
            None => {
                index.insert(record.building_polygon_wkt.clone(), groups.len());
                groups.push((record.building_polygon_wkt, vec![address]));
            }
        }
        stats.processed += 1;
    }

    let buildings: Vec<Building> = groups
        .into_iter()
        .map(|(footprint, addresses)| finalize(footprint, addresses))
        .collect();
    stats.buildings = buildings.len() as u64;

    log::info!(
        "Processed {} addresses with polygons, skipped {} without, {} unique buildings",
        stats.processed,
        stats.skipped_missing_footprint,
        stats.buildings
    );

    (buildings, stats)
}

/// Seals a group into a [`Building`], computing the derived metrics once.
fn finalize(footprint: String, addresses: Vec<AddressRecord>) -> Building {
    let worst_energy_rank = Building::worst_energy_rank_of(&addresses);
    let oldest_year = Building::oldest_year_of(&addresses);
    let on_busy_road = Building::any_on_busy_road(&addresses);
    Building {
        footprint,
        addresses,
        worst_energy_rank,
        oldest_year,
        on_busy_road,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(footprint: &str, address: &str, label: &str, year: &str) -> RawRecord {
        RawRecord {
            building_polygon_wkt: footprint.to_string(),
            full_address: address.to_string(),
            energy_label: label.to_string(),
            building_year: year.to_string(),
            busy_roads: "0".to_string(),
            neighborhood: "Centrum".to_string(),
            latitude: "52.37".to_string(),
            longitude: "4.9".to_string(),
        }
    }

    const FP_A: &str = "POLYGON ((0 0, 1 0, 1 1, 0 0))";
    const FP_B: &str = "POLYGON ((5 5, 6 5, 6 6, 5 5))";

    #[test]
    fn groups_by_exact_footprint_text() {
        let rows = vec![
            row(FP_A, "Straat 1", "A", "1990"),
            row(FP_B, "Straat 2", "B", "1980"),
            row(FP_A, "Straat 1-H", "G", "1931"),
        ];
        let (buildings, stats) = group_buildings(rows);

        assert_eq!(buildings.len(), 2);
        assert_eq!(buildings[0].footprint, FP_A);
        assert_eq!(buildings[0].addresses.len(), 2);
        assert_eq!(buildings[0].worst_energy_rank, -2);
        assert_eq!(buildings[0].oldest_year, 1931);
        assert_eq!(stats.processed, 3);
        assert_eq!(stats.buildings, 2);
    }

    #[test]
    fn preserves_first_seen_order() {
        let rows = vec![
            row(FP_B, "Straat 2", "B", "1980"),
            row(FP_A, "Straat 1", "A", "1990"),
            row(FP_B, "Straat 2-H", "C", "1975"),
        ];
        let (buildings, _) = group_buildings(rows);
        assert_eq!(buildings[0].footprint, FP_B);
        assert_eq!(buildings[1].footprint, FP_A);
    }

    #[test]
    fn skips_records_without_footprint() {
        let rows = vec![
            row("", "Straat 1", "A", "1990"),
            row("   ", "Straat 2", "B", "1980"),
            row(FP_A, "Straat 3", "C", "1970"),
        ];
        let (buildings, stats) = group_buildings(rows);
        assert_eq!(buildings.len(), 1);
        assert_eq!(stats.processed, 1);
        assert_eq!(stats.skipped_missing_footprint, 2);
    }

    #[test]
    fn textually_distinct_footprints_stay_distinct() {
        // Same shape, different spacing: distinct buildings by design.
        let spaced = "POLYGON ((0 0, 1 0, 1 1, 0 0))";
        let compact = "POLYGON((0 0, 1 0, 1 1, 0 0))";
        let rows = vec![
            row(spaced, "Straat 1", "A", "1990"),
            row(compact, "Straat 2", "B", "1980"),
        ];
        let (buildings, _) = group_buildings(rows);
        assert_eq!(buildings.len(), 2);
    }

    #[test]
    fn grouping_is_idempotent() {
        let rows = || {
            vec![
                row(FP_A, "Straat 1", "A", "1990"),
                row(FP_B, "Straat 2", "B", "1980"),
                row(FP_A, "Straat 1-H", "G", "1931"),
            ]
        };
        let (first, first_stats) = group_buildings(rows());
        let (second, second_stats) = group_buildings(rows());
        assert_eq!(first, second);
        assert_eq!(first_stats, second_stats);
    }

    #[test]
    fn addresses_keep_input_order() {
        let rows = vec![
            row(FP_A, "Straat 1", "A", "1990"),
            row(FP_A, "Straat 2", "B", "1980"),
            row(FP_A, "Straat 3", "C", "1970"),
        ];
        let (buildings, _) = group_buildings(rows);
        let names: Vec<&str> = buildings[0]
            .addresses
            .iter()
            .map(|a| a.address.as_str())
            .collect();
        assert_eq!(names, vec!["Straat 1", "Straat 2", "Straat 3"]);
    }
}
