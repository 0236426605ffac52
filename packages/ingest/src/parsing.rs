//! Lenient field parsers for the per-address dataset rows.
//!
//! Every accessor degrades instead of failing: an unparseable year becomes
//! `None` (the batch default applies later), missing coordinates become
//! NaN, and the busy-road flag is true only for a literal `"1"`.

use building_heatmap_building_models::AddressRecord;
use serde::Deserialize;

/// One raw CSV row from the enriched address export.
///
/// All fields are kept as strings at this layer; interpretation happens in
/// [`RawRecord::to_address`] so that a malformed value in one column never
/// rejects the whole row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    /// WKT footprint of the containing building. Empty means the record is
    /// skipped during grouping.
    #[serde(default)]
    pub building_polygon_wkt: String,
    /// Full street address.
    #[serde(default)]
    pub full_address: String,
    /// Energy label (e.g. "A++", "G", or an unknown value).
    #[serde(default, rename = "Energielabel")]
    pub energy_label: String,
    /// Construction year as recorded with the energy label.
    #[serde(default, rename = "Energielabels_Bouwjaar")]
    pub building_year: String,
    /// `"1"` when the address sits on a busy road, `"0"` or empty otherwise.
    #[serde(default)]
    pub busy_roads: String,
    /// Neighborhood name, may be empty.
    #[serde(default)]
    pub neighborhood: String,
    /// Latitude as text, may be empty or malformed.
    #[serde(default)]
    pub latitude: String,
    /// Longitude as text, may be empty or malformed.
    #[serde(default)]
    pub longitude: String,
}

impl RawRecord {
    /// Converts this row into an [`AddressRecord`], applying the lenient
    /// field interpretations.
    #[must_use]
    pub fn to_address(&self) -> AddressRecord {
        AddressRecord {
            address: self.full_address.clone(),
            energy_label: self.energy_label.clone(),
            building_year: parse_year(&self.building_year),
            on_busy_road: parse_busy_road(&self.busy_roads),
            neighborhood: parse_neighborhood(&self.neighborhood),
            latitude: parse_coordinate(&self.latitude),
            longitude: parse_coordinate(&self.longitude),
        }
    }

    /// True when the footprint column is empty or whitespace.
    #[must_use]
    pub fn missing_footprint(&self) -> bool {
        self.building_polygon_wkt.trim().is_empty()
    }
}

/// Parses a construction year. Returns `None` when missing or unparseable.
#[must_use]
pub fn parse_year(s: &str) -> Option<i32> {
    s.trim().parse::<i32>().ok()
}

/// Parses the busy-road flag: only a literal `"1"` counts as true.
#[must_use]
pub fn parse_busy_road(s: &str) -> bool {
    s.trim() == "1"
}

/// Parses a coordinate, producing NaN for missing or malformed values so
/// downstream membership tests simply never match.
#[must_use]
pub fn parse_coordinate(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Normalizes a neighborhood name, defaulting to `"Unknown"`.
#[must_use]
pub fn parse_neighborhood(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        "Unknown".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_year() {
        assert_eq!(parse_year("1931"), Some(1931));
        assert_eq!(parse_year(" 2005 "), Some(2005));
    }

    #[test]
    fn rejects_unparsable_year() {
        assert_eq!(parse_year("onbekend"), None);
        assert_eq!(parse_year(""), None);
    }

    #[test]
    fn busy_road_requires_literal_one() {
        assert!(parse_busy_road("1"));
        assert!(!parse_busy_road("0"));
        assert!(!parse_busy_road(""));
        assert!(!parse_busy_road("true"));
    }

    #[test]
    fn malformed_coordinate_becomes_nan() {
        assert!(parse_coordinate("").is_nan());
        assert!(parse_coordinate("n/a").is_nan());
        assert!((parse_coordinate("52.37") - 52.37).abs() < f64::EPSILON);
    }

    #[test]
    fn neighborhood_defaults_to_unknown() {
        assert_eq!(parse_neighborhood(""), "Unknown");
        assert_eq!(parse_neighborhood("  "), "Unknown");
        assert_eq!(parse_neighborhood("De Pijp"), "De Pijp");
    }

    #[test]
    fn row_converts_to_address() {
        let row = RawRecord {
            building_polygon_wkt: "POLYGON ((0 0, 1 0, 1 1, 0 0))".to_string(),
            full_address: "Teststraat 1".to_string(),
            energy_label: "C".to_string(),
            building_year: "1972".to_string(),
            busy_roads: "1".to_string(),
            neighborhood: String::new(),
            latitude: "52.37".to_string(),
            longitude: "bad".to_string(),
        };
        let address = row.to_address();
        assert_eq!(address.building_year, Some(1972));
        assert!(address.on_busy_road);
        assert_eq!(address.neighborhood, "Unknown");
        assert!(address.longitude.is_nan());
    }
}
