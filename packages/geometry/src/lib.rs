#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! WKT polygon decoding for building footprints.
//!
//! The input dataset encodes building footprints as WKT `POLYGON` /
//! `MULTIPOLYGON` strings. Only those two geometry kinds are recognized;
//! this is deliberately not a general WKT parser (no nested geometry
//! types, no 3D coordinates, no SRID prefixes). Decoding failures are
//! recoverable: the caller skips the building for rendering while its
//! other metrics still flow through the pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A coordinate ring: ordered `[longitude, latitude]` pairs, exactly as
/// given in the WKT text. No deduplication, no closure enforcement.
pub type Ring = Vec<[f64; 2]>;

/// A decoded building footprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Footprint {
    /// A single polygon: exterior ring followed by any hole rings.
    Polygon(Vec<Ring>),
    /// Multiple polygons, each a list of rings.
    MultiPolygon(Vec<Vec<Ring>>),
}

impl Footprint {
    /// Total number of coordinate pairs across all rings.
    #[must_use]
    pub fn coordinate_count(&self) -> usize {
        match self {
            Self::Polygon(rings) => rings.iter().map(Vec::len).sum(),
            Self::MultiPolygon(polygons) => polygons
                .iter()
                .flat_map(|rings| rings.iter())
                .map(Vec::len)
                .sum(),
        }
    }

    /// Renders this footprint as a `GeoJSON` geometry object for map
    /// consumers.
    #[must_use]
    pub fn to_geojson(&self) -> serde_json::Value {
        match self {
            Self::Polygon(rings) => serde_json::json!({
                "type": "Polygon",
                "coordinates": rings,
            }),
            Self::MultiPolygon(polygons) => serde_json::json!({
                "type": "MultiPolygon",
                "coordinates": polygons,
            }),
        }
    }
}

/// Errors from WKT decoding. All variants signal "not decodable": the
/// building is skipped for geometry purposes, never the whole batch.
#[derive(Debug, Clone, Error)]
pub enum WktError {
    /// The string does not start with a recognized geometry keyword.
    #[error("unsupported geometry kind: {kind:?}")]
    UnsupportedKind {
        /// Leading keyword (or fragment) found instead.
        kind: String,
    },

    /// Structurally invalid WKT text.
    #[error("malformed WKT: {message}")]
    Malformed {
        /// Description of what went wrong.
        message: String,
    },
}

/// Decodes a WKT `POLYGON` or `MULTIPOLYGON` string.
///
/// # Errors
///
/// Returns [`WktError`] for any other geometry kind, unbalanced
/// parentheses, malformed numbers, or an empty string.
pub fn decode(wkt: &str) -> Result<Footprint, WktError> {
    let trimmed = wkt.trim();
    if trimmed.is_empty() {
        return Err(WktError::Malformed {
            message: "empty string".to_string(),
        });
    }

    // MULTIPOLYGON must be checked first: POLYGON is its suffix.
    if let Some(rest) = trimmed.strip_prefix("MULTIPOLYGON") {
        let outer = single_group(rest)?;
        let polygons = paren_groups(outer)?
            .into_iter()
            .map(|polygon| paren_groups(polygon)?.into_iter().map(parse_ring).collect())
            .collect::<Result<Vec<Vec<Ring>>, WktError>>()?;
        if polygons.is_empty() {
            return Err(WktError::Malformed {
                message: "MULTIPOLYGON with no polygons".to_string(),
            });
        }
        return Ok(Footprint::MultiPolygon(polygons));
    }

    if let Some(rest) = trimmed.strip_prefix("POLYGON") {
        let outer = single_group(rest)?;
        let rings = paren_groups(outer)?
            .into_iter()
            .map(parse_ring)
            .collect::<Result<Vec<Ring>, WktError>>()?;
        if rings.is_empty() {
            return Err(WktError::Malformed {
                message: "POLYGON with no rings".to_string(),
            });
        }
        return Ok(Footprint::Polygon(rings));
    }

    let kind: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    Err(WktError::UnsupportedKind { kind })
}

/// Expects `s` to be exactly one parenthesized group (ignoring surrounding
/// whitespace) and returns its inner text.
fn single_group(s: &str) -> Result<&str, WktError> {
    let groups = paren_groups(s)?;
    match groups.as_slice() {
        [only] => Ok(only),
        _ => Err(WktError::Malformed {
            message: format!("expected one outer group, found {}", groups.len()),
        }),
    }
}

/// Splits `s` into its top-level `( ... )` groups, tolerating whitespace
/// and commas between groups. Anything else between groups, or unbalanced
/// parentheses, is malformed.
fn paren_groups(s: &str) -> Result<Vec<&str>, WktError> {
    let mut groups = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;

    for (i, c) in s.char_indices() {
        match c {
            '(' => {
                if depth == 0 {
                    start = i + 1;
                }
                depth += 1;
            }
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| WktError::Malformed {
                    message: "unbalanced closing parenthesis".to_string(),
                })?;
                if depth == 0 {
                    groups.push(&s[start..i]);
                }
            }
            ',' | ' ' | '\t' => {}
            other if depth == 0 => {
                return Err(WktError::Malformed {
                    message: format!("unexpected character {other:?} between groups"),
                });
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(WktError::Malformed {
            message: "unbalanced opening parenthesis".to_string(),
        });
    }
    Ok(groups)
}

/// Parses one ring: comma-separated `lon lat` coordinate pairs.
fn parse_ring(s: &str) -> Result<Ring, WktError> {
    let ring = s
        .split(',')
        .map(parse_coordinate)
        .collect::<Result<Ring, WktError>>()?;
    if ring.is_empty() {
        return Err(WktError::Malformed {
            message: "empty coordinate ring".to_string(),
        });
    }
    Ok(ring)
}

/// Parses a single whitespace-separated `lon lat` pair.
fn parse_coordinate(s: &str) -> Result<[f64; 2], WktError> {
    let mut tokens = s.split_whitespace();
    let (Some(lon), Some(lat), None) = (tokens.next(), tokens.next(), tokens.next()) else {
        return Err(WktError::Malformed {
            message: format!("expected 'lon lat' pair, found {s:?}"),
        });
    };

    let parse = |token: &str| {
        token.parse::<f64>().map_err(|_| WktError::Malformed {
            message: format!("malformed number: {token:?}"),
        })
    };
    Ok([parse(lon)?, parse(lat)?])
}
