//! Tile coordinate addressing.
//!
//! A tile is addressed by a `(z, x, y)` triple: zoom level, column and row.
//! This module converts that triple into the derived forms the rendering
//! pipeline uses:
//!
//! - **Key** (`"{z}/{x}/{y}"`): lossless, used for map keys
//! - **Hash** (`(x << z) + y`): fast 32-bit pre-filter, collision-prone
//! - **Quad key**: one base-4 digit per zoom level, most significant first
//!
//! # Hash collisions
//!
//! The shift amount in [`hash`] depends on `z`, so distinct triples can map
//! to the same value (`1/1/0` and `0/0/2` both hash to `2`). Only use the hash
//! to narrow a search and confirm identity with [`key`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TileCoordError;

use super::grid::TileGrid;

// =============================================================================
// Tile Coordinate
// =============================================================================

/// Address of one map tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TileCoord {
    /// Zoom level (0 = single root tile)
    pub z: u8,

    /// Column index at this zoom
    pub x: i32,

    /// Row index at this zoom
    pub y: i32,
}

impl TileCoord {
    /// Create a new tile coordinate.
    pub const fn new(z: u8, x: i32, y: i32) -> Self {
        Self { z, x, y }
    }

    /// Overwrite all three components in place.
    pub fn update(&mut self, z: u8, x: i32, y: i32) -> &mut Self {
        self.z = z;
        self.x = x;
        self.y = y;
        self
    }

    /// Canonical `"{z}/{x}/{y}"` key. See [`key`].
    pub fn key(&self) -> String {
        key(self)
    }

    /// 32-bit hash. See [`hash`].
    pub fn hash_code(&self) -> i32 {
        hash(self)
    }

    /// Quad key. See [`quad_key`].
    pub fn quad_key(&self) -> String {
        quad_key(self)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

impl FromStr for TileCoord {
    type Err = TileCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        from_key(s)
    }
}

// =============================================================================
// Addressing Functions
// =============================================================================

/// Create a tile coordinate, reusing `target` when given.
///
/// No range validation is performed; callers supply values consistent with
/// their tile grid.
pub fn create_or_update(z: u8, x: i32, y: i32, target: Option<&mut TileCoord>) -> TileCoord {
    match target {
        Some(coord) => *coord.update(z, x, y),
        None => TileCoord::new(z, x, y),
    }
}

/// Key for loose `z`, `x`, `y` components.
pub fn key_zxy(z: u8, x: i32, y: i32) -> String {
    format!("{}/{}/{}", z, x, y)
}

/// Key for a tile coordinate.
pub fn key(coord: &TileCoord) -> String {
    key_zxy(coord.z, coord.x, coord.y)
}

/// Decode a key produced by [`key`].
///
/// Fails unless the key has exactly three segments and each one parses as an
/// integer of the right width.
pub fn from_key(key: &str) -> Result<TileCoord, TileCoordError> {
    let segments: Vec<&str> = key.split('/').collect();
    if segments.len() != 3 {
        return Err(TileCoordError::WrongSegmentCount {
            key: key.to_string(),
            found: segments.len(),
        });
    }

    let invalid = |segment: &str, axis: &'static str| TileCoordError::InvalidSegment {
        key: key.to_string(),
        segment: segment.to_string(),
        axis,
    };

    let z = segments[0]
        .parse::<u8>()
        .map_err(|_| invalid(segments[0], "z"))?;
    let x = segments[1]
        .parse::<i32>()
        .map_err(|_| invalid(segments[1], "x"))?;
    let y = segments[2]
        .parse::<i32>()
        .map_err(|_| invalid(segments[2], "y"))?;

    Ok(TileCoord::new(z, x, y))
}

/// Compute `(x << z) + y` with 32-bit wrapping arithmetic.
///
/// Not injective: see the module documentation.
pub fn hash(coord: &TileCoord) -> i32 {
    coord
        .x
        .wrapping_shl(u32::from(coord.z))
        .wrapping_add(coord.y)
}

/// Quad key of length `z`, empty at zoom 0.
///
/// Each digit is `'0' + (x bit) + 2 * (y bit)` for one level, starting with
/// the most significant level.
pub fn quad_key(coord: &TileCoord) -> String {
    let mut digits = String::with_capacity(usize::from(coord.z));
    for level in (0..u32::from(coord.z)).rev() {
        let x_bit = coord.x.checked_shr(level).unwrap_or(0) & 1;
        let y_bit = coord.y.checked_shr(level).unwrap_or(0) & 1;
        // x_bit + 2 * y_bit is always in 0..=3
        digits.push(char::from(b'0' + (x_bit + 2 * y_bit) as u8));
    }
    digits
}

/// Whether `coord` lies within the grid's zoom range and extent.
///
/// A grid that reports no tile range for the zoom level accepts every
/// `(x, y)` at that level.
pub fn within_extent_and_z<G: TileGrid + ?Sized>(coord: &TileCoord, grid: &G) -> bool {
    if coord.z < grid.min_zoom() || coord.z > grid.max_zoom() {
        return false;
    }

    let range = match grid.extent() {
        Some(extent) => grid.tile_range_for_extent_and_z(&extent, coord.z),
        None => grid.full_tile_range(coord.z),
    };

    match range {
        Some(range) => range.contains_xy(coord.x, coord.y),
        None => true,
    }
}

// =============================================================================
// Tests
// =============================================================================
