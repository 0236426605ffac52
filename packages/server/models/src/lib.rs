#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the building heatmap server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the domain types to allow independent evolution of the API
//! contract.

use building_heatmap_building_models::{AddressRecord, Building, BuildingSummary, EnergyLabel};
use building_heatmap_region_models::RegionScore;
use serde::{Deserialize, Serialize};

/// An address as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAddress {
    /// Full street address.
    pub address: String,
    /// Raw energy label string.
    pub energy_label: String,
    /// Construction year, absent when the input was unparseable.
    pub building_year: Option<i32>,
    /// Whether this address sits on a busy road.
    pub busy_road: bool,
    /// Neighborhood name.
    pub neighborhood: String,
}

impl From<&AddressRecord> for ApiAddress {
    fn from(record: &AddressRecord) -> Self {
        Self {
            address: record.address.clone(),
            energy_label: record.energy_label.clone(),
            building_year: record.building_year,
            busy_road: record.on_busy_road,
            neighborhood: record.neighborhood.clone(),
        }
    }
}

/// The worst energy label of a building, with its numeric rank.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnergyLabel {
    /// Label text (e.g. "G"), or "Unknown" for an unreachable rank.
    pub label: String,
    /// Numeric rank of the label.
    pub score: i8,
}

impl ApiEnergyLabel {
    /// Builds the API view of an energy rank.
    #[must_use]
    pub fn from_rank(rank: i8) -> Self {
        let label = EnergyLabel::from_rank(rank)
            .map_or_else(|_| "Unknown".to_string(), |l| l.to_string());
        Self { label, score: rank }
    }
}

/// A full building with its address list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiBuilding {
    /// Raw WKT footprint string.
    pub polygon: String,
    /// Decoded footprint as a `GeoJSON` geometry object, `null` when the
    /// WKT text could not be decoded. Map consumers render from this.
    pub geometry: Option<serde_json::Value>,
    /// All grouped addresses in input order.
    pub addresses: Vec<ApiAddress>,
    /// Worst energy label over all addresses.
    pub worst_energy_label: ApiEnergyLabel,
    /// Oldest parsable construction year.
    pub oldest_year: i32,
    /// Whether any address sits on a busy road.
    pub on_busy_road: bool,
}

impl From<&Building> for ApiBuilding {
    fn from(building: &Building) -> Self {
        // An undecodable footprint only costs the building its rendered
        // shape; the metrics still ship.
        let geometry = match building_heatmap_geometry::decode(&building.footprint) {
            Ok(footprint) => Some(footprint.to_geojson()),
            Err(e) => {
                log::warn!("Undecodable footprint {:?}: {e}", building.footprint);
                None
            }
        };
        Self {
            polygon: building.footprint.clone(),
            geometry,
            addresses: building.addresses.iter().map(ApiAddress::from).collect(),
            worst_energy_label: ApiEnergyLabel::from_rank(building.worst_energy_rank),
            oldest_year: building.oldest_year,
            on_busy_road: building.on_busy_road,
        }
    }
}

/// Minimal pre-aggregated building view for the initial map load.
///
/// Domain [`BuildingSummary`] already serializes with the right field
/// names; this alias keeps the API surface explicit.
pub type ApiBuildingSummary = BuildingSummary;

/// Query parameters for the building-details endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildingDetailsParams {
    /// Exact WKT footprint string identifying the building.
    pub polygon: String,
}

/// Query parameters for the address search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    /// Substring to match against full addresses (minimum 3 characters).
    pub q: String,
}

/// One address search match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSearchMatch {
    /// Full street address.
    pub address: String,
    /// WKT footprint of the containing building.
    pub polygon: String,
    /// Neighborhood name.
    pub neighborhood: String,
    /// Latitude (NaN serializes as `null`).
    pub latitude: Option<f64>,
    /// Longitude (NaN serializes as `null`).
    pub longitude: Option<f64>,
}

/// Query parameters for the region-scores endpoint.
///
/// Missing weights fall back to the original slider defaults
/// (energy 0.5, year 0.5, busy road 0).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionScoreParams {
    /// Weight of the normalized energy score.
    pub energy_weight: Option<f64>,
    /// Weight of the normalized year score.
    pub year_weight: Option<f64>,
    /// Weight of the binary busy-road score.
    pub busy_road_weight: Option<f64>,
}

impl RegionScoreParams {
    /// Resolves the supplied parameters into [`ScoreWeights`].
    #[must_use]
    pub fn weights(&self) -> building_heatmap_scoring::ScoreWeights {
        let defaults = building_heatmap_scoring::ScoreWeights::default();
        building_heatmap_scoring::ScoreWeights {
            energy_weight: self.energy_weight.unwrap_or(defaults.energy_weight),
            year_weight: self.year_weight.unwrap_or(defaults.year_weight),
            busy_road_weight: self.busy_road_weight.unwrap_or(defaults.busy_road_weight),
        }
    }
}

/// The aggregated score of one region as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRegionScore {
    /// Region code.
    pub code: String,
    /// Human-readable region name.
    pub name: String,
    /// Mean weighted score, absent for regions with no matched buildings.
    pub mean_score: Option<f64>,
    /// Number of matched buildings.
    pub building_count: u64,
}

impl From<RegionScore> for ApiRegionScore {
    fn from(score: RegionScore) -> Self {
        Self {
            code: score.code,
            name: score.name,
            mean_score: score.mean_score,
            building_count: score.building_count,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energy_label_view_resolves_known_ranks() {
        let label = ApiEnergyLabel::from_rank(-2);
        assert_eq!(label.label, "G");
        assert_eq!(label.score, -2);
    }

    #[test]
    fn energy_label_view_handles_out_of_scale_rank() {
        let label = ApiEnergyLabel::from_rank(42);
        assert_eq!(label.label, "Unknown");
    }

    #[test]
    fn building_view_carries_decoded_geometry() {
        let building = Building {
            footprint: "POLYGON ((4.9 52.37, 4.91 52.37, 4.91 52.38, 4.9 52.37))".to_string(),
            addresses: Vec::new(),
            worst_energy_rank: 2,
            oldest_year: 1972,
            on_busy_road: false,
        };
        let view = ApiBuilding::from(&building);
        assert_eq!(view.geometry.as_ref().unwrap()["type"], "Polygon");

        let broken = Building {
            footprint: "POLYGON ((not wkt".to_string(),
            ..building
        };
        assert!(ApiBuilding::from(&broken).geometry.is_none());
    }

    #[test]
    fn region_score_params_default_to_slider_defaults() {
        let params = RegionScoreParams {
            energy_weight: None,
            year_weight: Some(0.25),
            busy_road_weight: None,
        };
        let weights = params.weights();
        assert!((weights.energy_weight - 0.5).abs() < f64::EPSILON);
        assert!((weights.year_weight - 0.25).abs() < f64::EPSILON);
        assert!((weights.busy_road_weight - 0.0).abs() < f64::EPSILON);
    }
}
