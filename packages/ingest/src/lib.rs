#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Library for ingesting the per-address building dataset from CSV into
//! footprint-grouped [`Building`] entities.
//!
//! One pass over the input: rows are parsed leniently (bad years and
//! coordinates degrade to fallbacks, never abort), grouped by the exact
//! WKT footprint text, and summarized with processed/skipped counts.

pub mod aggregate;
pub mod parsing;

use std::path::Path;

use building_heatmap_building_models::{BatchStats, Building};
use thiserror::Error;

use crate::parsing::RawRecord;

/// Errors that can occur during dataset ingestion.
#[derive(Debug, Error)]
pub enum IngestError {
    /// CSV reading or deserialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads raw dataset rows from a CSV file.
///
/// Columns follow the enriched export schema (`building_polygon_wkt`,
/// `full_address`, `Energielabel`, `Energielabels_Bouwjaar`, `busy_roads`,
/// `neighborhood`, `latitude`, `longitude`). Short rows are tolerated.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be read or a row fails to
/// deserialize.
pub fn read_records(path: &Path) -> Result<Vec<RawRecord>, IngestError> {
    let file = std::fs::File::open(path)?;
    read_records_from(file)
}

/// Reads raw dataset rows from any CSV reader.
///
/// # Errors
///
/// Returns [`IngestError`] if a row fails to deserialize.
pub fn read_records_from<R: std::io::Read>(reader: R) -> Result<Vec<RawRecord>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in csv_reader.deserialize() {
        let record: RawRecord = row?;
        records.push(record);
    }

    log::info!("Parsed {} records from CSV", records.len());
    Ok(records)
}

/// Loads a CSV file and groups its rows into buildings.
///
/// Convenience wrapper over [`read_records`] and
/// [`aggregate::group_buildings`].
///
/// # Errors
///
/// Returns [`IngestError`] if reading the file fails.
pub fn load_buildings(path: &Path) -> Result<(Vec<Building>, BatchStats), IngestError> {
    let records = read_records(path)?;
    Ok(aggregate::group_buildings(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
building_polygon_wkt,full_address,Energielabel,Energielabels_Bouwjaar,busy_roads,neighborhood,latitude,longitude
\"POLYGON ((4.9 52.37, 4.91 52.37, 4.91 52.38, 4.9 52.37))\",Teststraat 1,C,1972,1,De Pijp,52.37,4.9
\"POLYGON ((4.9 52.37, 4.91 52.37, 4.91 52.38, 4.9 52.37))\",Teststraat 1-H,G,1931,0,De Pijp,52.37,4.9
,Zonderstraat 9,A,2001,0,,52.4,4.95
";

    #[test]
    fn reads_quoted_wkt_rows() {
        let records = read_records_from(CSV.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records[0].building_polygon_wkt.starts_with("POLYGON"));
        assert_eq!(records[1].energy_label, "G");
        assert!(records[2].missing_footprint());
    }

    #[test]
    fn csv_to_buildings_end_to_end() {
        let records = read_records_from(CSV.as_bytes()).unwrap();
        let (buildings, stats) = aggregate::group_buildings(records);
        assert_eq!(buildings.len(), 1);
        assert_eq!(buildings[0].addresses.len(), 2);
        assert_eq!(buildings[0].worst_energy_rank, -2);
        assert_eq!(buildings[0].oldest_year, 1931);
        assert!(buildings[0].on_busy_road);
        assert_eq!(stats.skipped_missing_footprint, 1);
    }
}
