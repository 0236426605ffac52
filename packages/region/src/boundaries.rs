//! Normalizes raw `GeoJSON` features into [`Region`] values.
//!
//! Extracts the region code and name from feature properties and derives
//! the membership bounding box from the boundary geometry. Features with
//! missing properties or unusable geometry are skipped with a warning,
//! never aborting the batch.

use building_heatmap_region_models::{BoundingBox, Region};
use geo::BoundingRect;

/// Property field names for extracting a region's code and name.
///
/// Defaults match the Amsterdam buurten layer (`Buurtcode` / `Buurtnaam`).
#[derive(Debug, Clone)]
pub struct FieldMapping {
    /// Property holding the region code.
    pub code: String,
    /// Property holding the region name.
    pub name: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            code: "Buurtcode".to_string(),
            name: "Buurtnaam".to_string(),
        }
    }
}

/// Normalizes a list of raw `GeoJSON` features into regions.
#[must_use]
pub fn regions_from_features(
    features: &[serde_json::Value],
    fields: &FieldMapping,
) -> Vec<Region> {
    let regions: Vec<Region> = features
        .iter()
        .filter_map(|feature| region_from_feature(feature, fields))
        .collect();
    log::info!(
        "Normalized {} of {} boundary features into regions",
        regions.len(),
        features.len()
    );
    regions
}

/// Normalizes a single `GeoJSON` feature.
fn region_from_feature(feature: &serde_json::Value, fields: &FieldMapping) -> Option<Region> {
    let props = feature.get("properties")?;

    let code = props
        .get(&fields.code)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())?
        .to_string();
    let name = props
        .get(&fields.name)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())?
        .to_string();

    let geometry = feature.get("geometry")?;
    let Some(bounding_box) = derive_bounding_box(geometry) else {
        log::warn!("Unusable geometry for region {code}, skipping");
        return None;
    };

    Some(Region {
        code,
        name,
        bounding_box,
    })
}

/// Derives the axis-aligned bounding box of a `GeoJSON` geometry object.
fn derive_bounding_box(geometry: &serde_json::Value) -> Option<BoundingBox> {
    let geom: geojson::Geometry = serde_json::from_value(geometry.clone()).ok()?;
    let geo_geom: geo::Geometry<f64> = geom.try_into().ok()?;
    let rect = geo_geom.bounding_rect()?;
    Some(BoundingBox::new(
        rect.min().y,
        rect.max().y,
        rect.min().x,
        rect.max().x,
    ))
}
