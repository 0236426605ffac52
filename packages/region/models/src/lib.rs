#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Named region and regional score types.
//!
//! A region is a named area whose bounding box is derived from its
//! boundary geometry. Regions are read-only views: aggregation computes
//! scores from buildings without mutating either side.

use serde::{Deserialize, Serialize};

/// A geographic bounding box in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    /// Southern latitude boundary.
    pub south: f64,
    /// Northern latitude boundary.
    pub north: f64,
    /// Western longitude boundary.
    pub west: f64,
    /// Eastern longitude boundary.
    pub east: f64,
}

impl BoundingBox {
    /// Creates a new bounding box from the given boundaries.
    #[must_use]
    pub const fn new(south: f64, north: f64, west: f64, east: f64) -> Self {
        Self {
            south,
            north,
            west,
            east,
        }
    }

    /// Inclusive membership test for a point.
    ///
    /// This is a bounding-box test, not true polygon containment: points
    /// near a region's diagonal edge may match a neighboring region. That
    /// approximation is intentional and preserved.
    #[must_use]
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.south
            && latitude <= self.north
            && longitude >= self.west
            && longitude <= self.east
    }
}

/// A named region with its membership bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    /// Region code (e.g. a `Buurtcode` like "AA01").
    pub code: String,
    /// Human-readable region name.
    pub name: String,
    /// Bounding box derived from the region's boundary geometry.
    pub bounding_box: BoundingBox,
}

/// The aggregated score of one region for one scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionScore {
    /// Region code.
    pub code: String,
    /// Human-readable region name.
    pub name: String,
    /// Arithmetic mean of matched building scores. `None` when no
    /// building fell inside the region's bounding box ("no data", which
    /// is distinct from a mean of zero).
    pub mean_score: Option<f64>,
    /// Number of buildings matched to this region.
    pub building_count: u64,
}

impl RegionScore {
    /// True when at least one building matched this region.
    #[must_use]
    pub const fn has_data(&self) -> bool {
        self.mean_score.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox_membership_is_inclusive() {
        let bbox = BoundingBox::new(52.3, 52.4, 4.8, 4.9);
        assert!(bbox.contains(52.3, 4.8));
        assert!(bbox.contains(52.4, 4.9));
        assert!(bbox.contains(52.35, 4.85));
        assert!(!bbox.contains(52.41, 4.85));
        assert!(!bbox.contains(52.35, 4.79));
    }

    #[test]
    fn nan_points_never_match() {
        let bbox = BoundingBox::new(52.3, 52.4, 4.8, 4.9);
        assert!(!bbox.contains(f64::NAN, 4.85));
        assert!(!bbox.contains(52.35, f64::NAN));
    }
}
