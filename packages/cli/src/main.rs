#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the building heatmap batch pipeline.

use std::path::{Path, PathBuf};
use std::time::Instant;

use building_heatmap_building_models::Building;
use building_heatmap_ingest::load_buildings;
use building_heatmap_region::boundaries::FieldMapping;
use building_heatmap_region::store::RegionStore;
use building_heatmap_region::{DEFAULT_BOUNDARIES_URL, RegionError, aggregate, boundaries};
use building_heatmap_scoring::{NormalizationRange, ScoreWeights, Scorer};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "building_heatmap", about = "Building heatmap batch pipeline")]
struct Cli {
    /// Path to the enriched address CSV
    #[arg(long, default_value = "data/enriched_with_busy_roads.csv")]
    csv: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print batch statistics and the normalization range
    Stats,
    /// Score all buildings and print the hottest ones
    Score {
        #[command(flatten)]
        weights: WeightArgs,
        /// Number of buildings to print
        #[arg(long, default_value = "10")]
        top: usize,
    },
    /// Aggregate building scores into per-region means
    Regions {
        #[command(flatten)]
        weights: WeightArgs,
        /// Local `GeoJSON` boundary file. When absent, boundaries are
        /// fetched from `--boundaries-url`.
        #[arg(long)]
        boundaries: Option<PathBuf>,
        /// Boundary `FeatureCollection` URL
        #[arg(long, default_value = DEFAULT_BOUNDARIES_URL)]
        boundaries_url: String,
    },
}

#[derive(Args)]
struct WeightArgs {
    /// Weight of the normalized energy-label score
    #[arg(long, default_value = "0.5")]
    energy_weight: f64,
    /// Weight of the normalized construction-year score
    #[arg(long, default_value = "0.5")]
    year_weight: f64,
    /// Weight of the binary busy-road score
    #[arg(long, default_value = "0.0")]
    busy_road_weight: f64,
}

impl From<WeightArgs> for ScoreWeights {
    fn from(args: WeightArgs) -> Self {
        Self {
            energy_weight: args.energy_weight,
            year_weight: args.year_weight,
            busy_road_weight: args.busy_road_weight,
        }
    }
}

#[allow(clippy::too_many_lines)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Stats => {
            let start = Instant::now();
            let (buildings, stats) = load_buildings(&cli.csv)?;
            println!("Addresses processed:  {}", stats.processed);
            println!("Missing footprints:   {}", stats.skipped_missing_footprint);
            println!("Unique buildings:     {}", stats.buildings);
            match NormalizationRange::compute(&buildings) {
                Some(range) => {
                    println!(
                        "Year range:           {} - {}",
                        range.min_year, range.max_year
                    );
                    println!(
                        "Energy rank range:    {} - {}",
                        range.min_energy_rank, range.max_energy_rank
                    );
                }
                None => println!("Empty batch, no normalization range"),
            }
            log::info!("Stats computed in {:.1}s", start.elapsed().as_secs_f64());
        }
        Commands::Score { weights, top } => {
            let start = Instant::now();
            let (buildings, _) = load_buildings(&cli.csv)?;
            let Some(scorer) = Scorer::for_batch(&buildings, weights.into()) else {
                println!("No buildings to score");
                return Ok(());
            };

            let mut ranked: Vec<(f64, &Building)> = scorer
                .score_all(&buildings)
                .into_iter()
                .zip(&buildings)
                .collect();
            ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

            println!("{:<8} {:<6} {:<6} {:<5} ADDRESS", "SCORE", "YEAR", "LABEL", "BUSY");
            for (score, building) in ranked.iter().take(top) {
                let label = building
                    .worst_energy_label()
                    .map_or_else(|| "?".to_string(), |l| l.to_string());
                let address = building
                    .addresses
                    .first()
                    .map_or("(no address)", |a| a.address.as_str());
                println!(
                    "{score:<8.4} {:<6} {label:<6} {:<5} {address}",
                    building.oldest_year,
                    if building.on_busy_road { "yes" } else { "no" },
                );
            }
            log::info!(
                "Scored {} buildings in {:.1}s",
                buildings.len(),
                start.elapsed().as_secs_f64()
            );
        }
        Commands::Regions {
            weights,
            boundaries,
            boundaries_url,
        } => {
            let start = Instant::now();
            let (buildings, _) = load_buildings(&cli.csv)?;

            let mut store = RegionStore::default();
            if let Some(path) = boundaries {
                store.begin_loading();
                store.finish_loading(load_boundary_file(&path)?);
            } else {
                let client = reqwest::Client::new();
                store
                    .load(&client, &boundaries_url, &FieldMapping::default())
                    .await?;
            }

            let scorer = Scorer::for_batch(&buildings, weights.into());
            let region_scores =
                aggregate::aggregate_with_store(&store, scorer.as_ref(), &buildings)?;

            println!("{:<12} {:<30} {:<10} MEAN", "CODE", "NAME", "BUILDINGS");
            for region in &region_scores {
                let mean = region
                    .mean_score
                    .map_or_else(|| "-".to_string(), |m| format!("{m:.4}"));
                println!(
                    "{:<12} {:<30} {:<10} {mean}",
                    region.code, region.name, region.building_count,
                );
            }
            log::info!(
                "Aggregated {} buildings into {} regions in {:.1}s",
                buildings.len(),
                region_scores.len(),
                start.elapsed().as_secs_f64()
            );
        }
    }

    Ok(())
}

/// Reads a `GeoJSON` `FeatureCollection` file and normalizes its features
/// into regions.
fn load_boundary_file(path: &Path) -> Result<Vec<building_heatmap_region_models::Region>, RegionError> {
    let body = std::fs::read_to_string(path).map_err(|e| RegionError::Conversion {
        message: format!("Failed to read {}: {e}", path.display()),
    })?;
    let json: serde_json::Value = serde_json::from_str(&body)?;
    let features = json["features"]
        .as_array()
        .ok_or_else(|| RegionError::Conversion {
            message: format!("No features array in {}", path.display()),
        })?;
    Ok(boundaries::regions_from_features(
        features,
        &FieldMapping::default(),
    ))
}
