//! In-memory dataset cache with an explicit time-to-live.
//!
//! The cache is an owned value injected into the server state, not
//! module-level shared state. Freshness is an explicit predicate evaluated
//! by the caller; a stale snapshot is simply reloaded from the CSV on the
//! next access.

use std::path::PathBuf;
use std::sync::Arc;

use building_heatmap_building_models::{BatchStats, Building};
use building_heatmap_ingest::IngestError;
use chrono::{DateTime, Duration, Utc};

/// One loaded batch with its load timestamp.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Grouped buildings in first-seen order.
    pub buildings: Arc<Vec<Building>>,
    /// Counters from the grouping pass.
    pub stats: BatchStats,
    /// When this snapshot was loaded.
    pub fetched_at: DateTime<Utc>,
}

/// TTL'd cache around the CSV dataset.
#[derive(Debug)]
pub struct DatasetCache {
    csv_path: PathBuf,
    ttl: Duration,
    snapshot: Option<Snapshot>,
}

impl DatasetCache {
    /// Creates an empty cache for the given CSV path.
    #[must_use]
    pub const fn new(csv_path: PathBuf, ttl: Duration) -> Self {
        Self {
            csv_path,
            ttl,
            snapshot: None,
        }
    }

    /// Freshness predicate: true when a snapshot exists and its age is
    /// within the TTL at `now`.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.snapshot
            .as_ref()
            .is_some_and(|s| now - s.fetched_at <= self.ttl)
    }

    /// Returns a fresh snapshot, reloading from disk when stale or empty.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError`] if reloading the CSV fails. An existing
    /// stale snapshot is kept in that case, but the error still surfaces
    /// so the caller can report it.
    pub fn snapshot(&mut self, now: DateTime<Utc>) -> Result<Snapshot, IngestError> {
        if !self.is_fresh(now) {
            self.reload(now)?;
        }
        // Reload either installed a snapshot or returned the error above.
        self.snapshot
            .clone()
            .ok_or_else(|| IngestError::Io(std::io::Error::other("dataset snapshot missing")))
    }

    /// Forces a reload from disk, replacing any existing snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError`] if reading or parsing the CSV fails.
    pub fn reload(&mut self, now: DateTime<Utc>) -> Result<(), IngestError> {
        log::info!("Loading dataset from {}", self.csv_path.display());
        let (buildings, stats) = building_heatmap_ingest::load_buildings(&self.csv_path)?;
        self.snapshot = Some(Snapshot {
            buildings: Arc::new(buildings),
            stats,
            fetched_at: now,
        });
        Ok(())
    }
}
