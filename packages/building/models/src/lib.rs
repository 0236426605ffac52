#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Building, address, and energy label types for the heatmap pipeline.
//!
//! This crate defines the canonical domain types shared across the entire
//! building-heatmap system: per-address input records, footprint-grouped
//! buildings, and the Dutch energy label scale with its numeric rank
//! mapping used for scoring.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Fallback construction year used when no address in a building carries a
/// parsable year. Documented behavior, not an error.
pub const DEFAULT_OLDEST_YEAR: i32 = 2000;

/// A Dutch energy efficiency label, from A++++ (best) to G (worst).
///
/// Each label maps to a numeric rank via [`EnergyLabel::rank`], where a
/// higher rank means a better label. Scoring inverts this so that worse
/// labels produce higher (hotter) scores.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum EnergyLabel {
    /// A++++ (rank 8)
    #[serde(rename = "A++++")]
    #[strum(serialize = "A++++")]
    APlus4,
    /// A+++ (rank 7)
    #[serde(rename = "A+++")]
    #[strum(serialize = "A+++")]
    APlus3,
    /// A++ (rank 6)
    #[serde(rename = "A++")]
    #[strum(serialize = "A++")]
    APlus2,
    /// A+ (rank 5)
    #[serde(rename = "A+")]
    #[strum(serialize = "A+")]
    APlus1,
    /// A (rank 4)
    A,
    /// B (rank 3)
    B,
    /// C (rank 2)
    C,
    /// D (rank 1)
    D,
    /// E (rank 0)
    E,
    /// F (rank -1)
    F,
    /// G (rank -2)
    G,
}

impl EnergyLabel {
    /// Returns the numeric rank of this label (higher is better).
    #[must_use]
    pub const fn rank(self) -> i8 {
        match self {
            Self::APlus4 => 8,
            Self::APlus3 => 7,
            Self::APlus2 => 6,
            Self::APlus1 => 5,
            Self::A => 4,
            Self::B => 3,
            Self::C => 2,
            Self::D => 1,
            Self::E => 0,
            Self::F => -1,
            Self::G => -2,
        }
    }

    /// Creates a label from a numeric rank.
    ///
    /// # Errors
    ///
    /// Returns an error if the rank is not in the range -2..=8.
    pub const fn from_rank(rank: i8) -> Result<Self, InvalidRankError> {
        match rank {
            8 => Ok(Self::APlus4),
            7 => Ok(Self::APlus3),
            6 => Ok(Self::APlus2),
            5 => Ok(Self::APlus1),
            4 => Ok(Self::A),
            3 => Ok(Self::B),
            2 => Ok(Self::C),
            1 => Ok(Self::D),
            0 => Ok(Self::E),
            -1 => Ok(Self::F),
            -2 => Ok(Self::G),
            _ => Err(InvalidRankError { rank }),
        }
    }

    /// Returns the rank for a raw label string.
    ///
    /// Unrecognized labels map to rank 0 (treated as "E") rather than
    /// failing, so a single bad record never aborts a batch.
    #[must_use]
    pub fn rank_for(label: &str) -> i8 {
        label.trim().parse::<Self>().map_or(0, Self::rank)
    }

    /// Returns all variants, ordered from best to worst.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::APlus4,
            Self::APlus3,
            Self::APlus2,
            Self::APlus1,
            Self::A,
            Self::B,
            Self::C,
            Self::D,
            Self::E,
            Self::F,
            Self::G,
        ]
    }
}

/// Error returned when attempting to create an [`EnergyLabel`] from a rank
/// outside -2..=8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidRankError {
    /// The invalid rank that was provided.
    pub rank: i8,
}

impl std::fmt::Display for InvalidRankError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid energy rank {}: expected -2..=8", self.rank)
    }
}

impl std::error::Error for InvalidRankError {}

/// A single address row from the input dataset, immutable once parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRecord {
    /// Full street address.
    pub address: String,
    /// Raw energy label string as it appeared in the input. May be a value
    /// outside the known A++++..G scale.
    pub energy_label: String,
    /// Construction year, `None` if the input value was unparseable.
    pub building_year: Option<i32>,
    /// Whether this address sits on a busy road.
    pub on_busy_road: bool,
    /// Neighborhood name, `"Unknown"` when absent from the input.
    pub neighborhood: String,
    /// Latitude. May be NaN when the input value was missing or malformed.
    pub latitude: f64,
    /// Longitude. May be NaN when the input value was missing or malformed.
    pub longitude: f64,
}

impl AddressRecord {
    /// Returns the energy rank for this address (unknown labels rank 0).
    #[must_use]
    pub fn energy_rank(&self) -> i8 {
        EnergyLabel::rank_for(&self.energy_label)
    }
}

/// A building: every address sharing one footprint WKT string.
///
/// The footprint text is the building's identity key. Two textually
/// different WKT strings describing the same physical shape are distinct
/// buildings. Derived fields are computed once after grouping completes
/// and are read-only thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    /// Raw WKT footprint string (grouping key and identity).
    pub footprint: String,
    /// Addresses in input order.
    pub addresses: Vec<AddressRecord>,
    /// Minimum energy rank over all addresses (worst label wins).
    pub worst_energy_rank: i8,
    /// Minimum parsable construction year, or [`DEFAULT_OLDEST_YEAR`].
    pub oldest_year: i32,
    /// True iff at least one address is on a busy road.
    pub on_busy_road: bool,
}

impl Building {
    /// Computes the worst (minimum) energy rank over an address list.
    #[must_use]
    pub fn worst_energy_rank_of(addresses: &[AddressRecord]) -> i8 {
        addresses
            .iter()
            .map(AddressRecord::energy_rank)
            .min()
            .unwrap_or(0)
    }

    /// Computes the oldest parsable construction year over an address list,
    /// falling back to [`DEFAULT_OLDEST_YEAR`] when none parses.
    #[must_use]
    pub fn oldest_year_of(addresses: &[AddressRecord]) -> i32 {
        addresses
            .iter()
            .filter_map(|a| a.building_year)
            .min()
            .unwrap_or(DEFAULT_OLDEST_YEAR)
    }

    /// True iff any address in the list is on a busy road.
    #[must_use]
    pub fn any_on_busy_road(addresses: &[AddressRecord]) -> bool {
        addresses.iter().any(|a| a.on_busy_road)
    }

    /// The label corresponding to [`Self::worst_energy_rank`].
    ///
    /// Always resolvable because ranks are produced by the label mapping.
    #[must_use]
    pub fn worst_energy_label(&self) -> Option<EnergyLabel> {
        EnergyLabel::from_rank(self.worst_energy_rank).ok()
    }

    /// Representative point for spatial membership tests: the first address
    /// in input order with finite coordinates.
    #[must_use]
    pub fn representative_point(&self) -> Option<(f64, f64)> {
        self.addresses
            .iter()
            .find(|a| a.latitude.is_finite() && a.longitude.is_finite())
            .map(|a| (a.latitude, a.longitude))
    }

    /// Neighborhood of the first address, or `"Unknown"` for an empty list.
    #[must_use]
    pub fn neighborhood(&self) -> &str {
        self.addresses
            .first()
            .map_or("Unknown", |a| a.neighborhood.as_str())
    }

    /// Produces the lightweight pre-aggregated view of this building.
    #[must_use]
    pub fn summary(&self) -> BuildingSummary {
        let (latitude, longitude) = self
            .representative_point()
            .unwrap_or((f64::NAN, f64::NAN));
        BuildingSummary {
            polygon: self.footprint.clone(),
            address_count: self.addresses.len(),
            worst_energy_rank: self.worst_energy_rank,
            oldest_year: self.oldest_year,
            on_busy_road: self.on_busy_road,
            neighborhood: self.neighborhood().to_string(),
            latitude,
            longitude,
        }
    }
}

/// Minimal pre-aggregated building view for lightweight initial loads.
///
/// Full address detail is fetched on demand keyed by `polygon`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingSummary {
    /// Raw WKT footprint string.
    pub polygon: String,
    /// Number of grouped addresses.
    pub address_count: usize,
    /// Minimum energy rank over all addresses.
    pub worst_energy_rank: i8,
    /// Minimum parsable construction year.
    pub oldest_year: i32,
    /// True iff at least one address is on a busy road.
    pub on_busy_road: bool,
    /// Neighborhood of the first address.
    pub neighborhood: String,
    /// Representative latitude (NaN when no address has coordinates).
    pub latitude: f64,
    /// Representative longitude (NaN when no address has coordinates).
    pub longitude: f64,
}

/// Counters from one grouping pass over the input records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStats {
    /// Records grouped into a building.
    pub processed: u64,
    /// Records skipped for an empty or missing footprint.
    pub skipped_missing_footprint: u64,
    /// Unique buildings produced.
    pub buildings: u64,
}
