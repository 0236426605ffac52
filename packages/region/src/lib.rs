#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region boundary fetching and spatial score aggregation.
//!
//! Downloads named region polygons (Amsterdam buurten by default) as a
//! `GeoJSON` `FeatureCollection`, derives a bounding box per region, and
//! aggregates per-building weighted scores into a mean score per region
//! via bounding-box membership.

pub mod aggregate;
pub mod boundaries;
pub mod fetch;
pub mod store;

use thiserror::Error;

/// Default boundary source: the Amsterdam open-data buurten layer.
pub const DEFAULT_BOUNDARIES_URL: &str =
    "https://maps.amsterdam.nl/open_geodata/geojson_lnglat.php?KAARTLAAG=GEBIED_BUURTEN&THEMA=gebiedsindeling";

/// Errors that can occur during region operations.
#[derive(Debug, Error)]
pub enum RegionError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Data conversion or normalization error.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },

    /// Region boundaries have not finished loading. Blocks regional
    /// aggregation only; building-level scoring stays usable.
    #[error("Region boundaries unavailable (store is {state})")]
    BoundariesUnavailable {
        /// The store state at the time of the request.
        state: &'static str,
    },
}
