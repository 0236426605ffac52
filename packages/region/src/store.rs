//! Region boundary store: a small Idle → Loading → Ready state machine.
//!
//! Regional aggregation requires `Ready`. Requests arriving before the
//! boundary fetch completes get an explicit `BoundariesUnavailable` error
//! instead of a silently empty result.

use building_heatmap_region_models::Region;

use crate::boundaries::FieldMapping;
use crate::{RegionError, boundaries, fetch};

/// Lifecycle of the region boundary data.
#[derive(Debug, Default)]
pub enum RegionStore {
    /// No fetch has started.
    #[default]
    Idle,
    /// A boundary fetch is in flight.
    Loading,
    /// Boundaries are loaded and aggregation may run.
    Ready(Vec<Region>),
}

impl RegionStore {
    /// Short state name for logs and error payloads.
    #[must_use]
    pub const fn state_name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready(_) => "ready",
        }
    }

    /// True once boundaries are loaded.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Marks the store as loading.
    pub fn begin_loading(&mut self) {
        *self = Self::Loading;
    }

    /// Installs loaded regions, completing the transition to `Ready`.
    pub fn finish_loading(&mut self, regions: Vec<Region>) {
        log::info!("Region store ready with {} regions", regions.len());
        *self = Self::Ready(regions);
    }

    /// Returns the loaded regions.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::BoundariesUnavailable`] unless the store is
    /// `Ready`.
    pub fn regions(&self) -> Result<&[Region], RegionError> {
        match self {
            Self::Ready(regions) => Ok(regions),
            Self::Idle | Self::Loading => Err(RegionError::BoundariesUnavailable {
                state: self.state_name(),
            }),
        }
    }

    /// Fetches and installs boundaries from a `GeoJSON` URL.
    ///
    /// On failure the store returns to `Idle` so a later retry starts
    /// from a clean state.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError`] if the fetch or normalization fails.
    pub async fn load(
        &mut self,
        client: &reqwest::Client,
        url: &str,
        fields: &FieldMapping,
    ) -> Result<(), RegionError> {
        self.begin_loading();
        log::info!("Loading region boundaries from {url}");

        match fetch::fetch_features(client, url).await {
            Ok(features) => {
                let regions = boundaries::regions_from_features(&features, fields);
                self.finish_loading(regions);
                Ok(())
            }
            Err(e) => {
                *self = Self::Idle;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use building_heatmap_region_models::BoundingBox;

    fn region(code: &str) -> Region {
        Region {
            code: code.to_string(),
            name: code.to_string(),
            bounding_box: BoundingBox::new(52.3, 52.4, 4.8, 4.9),
        }
    }

    #[test]
    fn idle_and_loading_refuse_aggregation() {
        let mut store = RegionStore::default();
        assert!(matches!(
            store.regions(),
            Err(RegionError::BoundariesUnavailable { state: "idle" })
        ));

        store.begin_loading();
        assert!(matches!(
            store.regions(),
            Err(RegionError::BoundariesUnavailable { state: "loading" })
        ));
    }

    #[test]
    fn ready_store_exposes_regions() {
        let mut store = RegionStore::default();
        store.begin_loading();
        store.finish_loading(vec![region("AA01")]);
        assert!(store.is_ready());
        assert_eq!(store.regions().unwrap().len(), 1);
    }
}
