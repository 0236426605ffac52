#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the building heatmap application.
//!
//! Serves the building dataset (full and minimal variants), on-demand
//! building details, address search, and regional score aggregation for
//! the map frontend, plus the frontend's static files.

mod cache;
mod handlers;

use std::path::PathBuf;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use building_heatmap_region::boundaries::FieldMapping;
use building_heatmap_region::store::RegionStore;
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};

use crate::cache::DatasetCache;

/// Default dataset location relative to the working directory.
const DEFAULT_CSV_PATH: &str = "data/enriched_with_busy_roads.csv";

/// Default dataset cache TTL in minutes.
const DEFAULT_TTL_MINUTES: i64 = 10;

/// Shared application state.
pub struct AppState {
    /// TTL'd dataset cache.
    pub cache: RwLock<DatasetCache>,
    /// Region boundary store.
    pub regions: RwLock<RegionStore>,
    /// Single in-flight computation token for score recomputes.
    pub recompute: Mutex<()>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let csv_path = PathBuf::from(
        std::env::var("DATASET_CSV").unwrap_or_else(|_| DEFAULT_CSV_PATH.to_string()),
    );
    let ttl_minutes: i64 = std::env::var("CACHE_TTL_MINUTES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_TTL_MINUTES);
    let boundaries_url = std::env::var("BOUNDARIES_URL")
        .unwrap_or_else(|_| building_heatmap_region::DEFAULT_BOUNDARIES_URL.to_string());

    let state = web::Data::new(AppState {
        cache: RwLock::new(DatasetCache::new(
            csv_path,
            chrono::Duration::minutes(ttl_minutes),
        )),
        regions: RwLock::new(RegionStore::default()),
        recompute: Mutex::new(()),
    });

    // Prime the dataset cache so the first request doesn't pay the load.
    // A failure here is logged, not fatal: handlers retry through the
    // cache and report the error per request.
    if let Err(e) = state.cache.write().await.reload(Utc::now()) {
        log::error!("Initial dataset load failed: {e}");
    }

    // Load region boundaries in the background; aggregation requests
    // arriving before this finishes get an explicit 503. The store lock
    // is only held for the state transitions, not across the fetch.
    {
        let state = state.clone();
        actix_web::rt::spawn(async move {
            let client = reqwest::Client::new();
            state.regions.write().await.begin_loading();
            match building_heatmap_region::fetch::fetch_features(&client, &boundaries_url).await {
                Ok(features) => {
                    let regions = building_heatmap_region::boundaries::regions_from_features(
                        &features,
                        &FieldMapping::default(),
                    );
                    state.regions.write().await.finish_loading(regions);
                }
                Err(e) => {
                    log::error!("Failed to load region boundaries: {e}");
                    *state.regions.write().await = RegionStore::Idle;
                }
            }
        });
    }

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/buildings", web::get().to(handlers::buildings))
                    .route(
                        "/buildings-minimal",
                        web::get().to(handlers::buildings_minimal),
                    )
                    .route(
                        "/building-details",
                        web::get().to(handlers::building_details),
                    )
                    .route(
                        "/search-addresses",
                        web::get().to(handlers::search_addresses),
                    )
                    .route("/region-scores", web::get().to(handlers::region_scores)),
            )
            // Serve frontend static files (production)
            .service(Files::new("/", "app/dist").index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
