//! HTTP handler functions for the building heatmap API.

use actix_web::{HttpResponse, web};
use building_heatmap_region::aggregate::aggregate_regions;
use building_heatmap_scoring::{Scorer, score_chunks};
use building_heatmap_server_models::{
    ApiBuilding, ApiBuildingSummary, ApiHealth, ApiRegionScore, ApiSearchMatch,
    BuildingDetailsParams, RegionScoreParams, SearchParams,
};
use chrono::Utc;

use crate::AppState;
use crate::cache::Snapshot;

/// Minimum length of an address search query.
const MIN_SEARCH_LEN: usize = 3;

/// Maximum number of address search results.
const MAX_SEARCH_RESULTS: usize = 20;

/// Buildings scored per chunk before yielding back to the runtime.
const SCORE_CHUNK: usize = 2048;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/buildings`
///
/// Returns every building with its full address list.
pub async fn buildings(state: web::Data<AppState>) -> HttpResponse {
    let snapshot = match dataset(&state).await {
        Ok(snapshot) => snapshot,
        Err(response) => return response,
    };

    let result: Vec<ApiBuilding> = snapshot.buildings.iter().map(ApiBuilding::from).collect();
    HttpResponse::Ok().json(result)
}

/// `GET /api/buildings-minimal`
///
/// Returns the pre-aggregated building summaries for the initial map load.
pub async fn buildings_minimal(state: web::Data<AppState>) -> HttpResponse {
    let snapshot = match dataset(&state).await {
        Ok(snapshot) => snapshot,
        Err(response) => return response,
    };

    let result: Vec<ApiBuildingSummary> = snapshot
        .buildings
        .iter()
        .map(building_heatmap_building_models::Building::summary)
        .collect();
    HttpResponse::Ok().json(result)
}

/// `GET /api/building-details?polygon=...`
///
/// Returns the address list for one building, keyed by its exact WKT
/// footprint text.
pub async fn building_details(
    state: web::Data<AppState>,
    params: web::Query<BuildingDetailsParams>,
) -> HttpResponse {
    if params.polygon.trim().is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Polygon parameter required"
        }));
    }

    let snapshot = match dataset(&state).await {
        Ok(snapshot) => snapshot,
        Err(response) => return response,
    };

    snapshot
        .buildings
        .iter()
        .find(|b| b.footprint == params.polygon)
        .map_or_else(
            || {
                HttpResponse::NotFound().json(serde_json::json!({
                    "error": "Building not found"
                }))
            },
            |building| {
                let addresses: Vec<building_heatmap_server_models::ApiAddress> = building
                    .addresses
                    .iter()
                    .map(building_heatmap_server_models::ApiAddress::from)
                    .collect();
                HttpResponse::Ok().json(addresses)
            },
        )
}

/// `GET /api/search-addresses?q=...`
///
/// Case-insensitive substring search over full addresses, capped at
/// [`MAX_SEARCH_RESULTS`] matches.
pub async fn search_addresses(
    state: web::Data<AppState>,
    params: web::Query<SearchParams>,
) -> HttpResponse {
    let query = params.q.trim();
    if query.len() < MIN_SEARCH_LEN {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Query too short (min 3 chars)"
        }));
    }

    let snapshot = match dataset(&state).await {
        Ok(snapshot) => snapshot,
        Err(response) => return response,
    };

    let query_lower = query.to_lowercase();
    let mut matches = Vec::new();

    'outer: for building in snapshot.buildings.iter() {
        for address in &building.addresses {
            if address.address.to_lowercase().contains(&query_lower) {
                matches.push(ApiSearchMatch {
                    address: address.address.clone(),
                    polygon: building.footprint.clone(),
                    neighborhood: address.neighborhood.clone(),
                    latitude: address.latitude.is_finite().then_some(address.latitude),
                    longitude: address.longitude.is_finite().then_some(address.longitude),
                });
                if matches.len() >= MAX_SEARCH_RESULTS {
                    break 'outer;
                }
            }
        }
    }

    log::info!("Address search {query:?}: {} matches", matches.len());
    HttpResponse::Ok().json(matches)
}

/// `GET /api/region-scores?energyWeight=&yearWeight=&busyRoadWeight=`
///
/// Scores the whole batch at the supplied weights and aggregates the
/// scores into regional means. Returns 503 while region boundaries are
/// still loading.
pub async fn region_scores(
    state: web::Data<AppState>,
    params: web::Query<RegionScoreParams>,
) -> HttpResponse {
    let weights = params.weights();

    // Single in-flight computation token: serializes recomputes so the
    // normalization range and weights stay consistent within one pass.
    let _token = state.recompute.lock().await;

    let snapshot = match dataset(&state).await {
        Ok(snapshot) => snapshot,
        Err(response) => return response,
    };
    let buildings = snapshot.buildings;

    let mut scores = Vec::with_capacity(buildings.len());
    if let Some(scorer) = Scorer::for_batch(&buildings, weights) {
        // Chunked so large batches don't monopolize the worker; chunk
        // boundaries cannot change the result.
        for chunk in score_chunks(&scorer, &buildings, SCORE_CHUNK) {
            scores.extend(chunk);
            tokio::task::yield_now().await;
        }
    }

    let store = state.regions.read().await;
    match store.regions() {
        Ok(regions) => {
            let result: Vec<ApiRegionScore> = aggregate_regions(regions, &buildings, &scores)
                .into_iter()
                .map(ApiRegionScore::from)
                .collect();
            HttpResponse::Ok().json(result)
        }
        Err(e) => {
            log::warn!("Regional aggregation refused: {e}");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "error": "Region boundaries unavailable"
            }))
        }
    }
}

/// Returns a fresh dataset snapshot, reloading through the TTL cache.
async fn dataset(state: &web::Data<AppState>) -> Result<Snapshot, HttpResponse> {
    let mut cache = state.cache.write().await;
    cache.snapshot(Utc::now()).map_err(|e| {
        log::error!("Failed to load dataset: {e}");
        HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Failed to load dataset"
        }))
    })
}
