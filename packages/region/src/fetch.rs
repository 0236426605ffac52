//! Direct `GeoJSON` URL fetcher for region boundaries.

use crate::RegionError;

/// Fetches all features from a `GeoJSON` `FeatureCollection` URL.
///
/// # Errors
///
/// Returns [`RegionError`] if the request fails or the response cannot be
/// parsed as a feature collection.
pub async fn fetch_features(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<serde_json::Value>, RegionError> {
    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(RegionError::Conversion {
            message: format!("GeoJSON request failed with status {}", resp.status()),
        });
    }
    let body = resp.text().await?;

    let json: serde_json::Value = serde_json::from_str(&body)?;

    let features = json["features"]
        .as_array()
        .ok_or_else(|| RegionError::Conversion {
            message: "No features array in GeoJSON response".to_string(),
        })?;

    Ok(features.clone())
}
