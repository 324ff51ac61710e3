//! Tile addressing.
//!
//! This module converts tile coordinates into keys, hashes and quad keys, and
//! decides whether a coordinate is worth fetching for a tile grid.
//!
//! # Components
//!
//! - [`TileCoord`]: `(z, x, y)` tile address
//! - [`key`] / [`from_key`]: lossless `"{z}/{x}/{y}"` encoding
//! - [`hash`]: fast, collision-prone 32-bit hash
//! - [`quad_key`]: base-4 address, one digit per zoom level
//! - [`within_extent_and_z`]: zoom and extent check against a [`TileGrid`]
//!
//! # Example
//!
//! ```
//! use tile_label_core::tile::{quad_key, within_extent_and_z, TileCoord, XyzTileGrid};
//!
//! let coord = TileCoord::new(3, 3, 5);
//! assert_eq!(coord.key(), "3/3/5");
//! assert_eq!(quad_key(&coord), "213");
//!
//! let grid = XyzTileGrid::web_mercator(0, 18);
//! assert!(within_extent_and_z(&coord, &grid));
//! assert!(!within_extent_and_z(&TileCoord::new(3, 8, 0), &grid));
//! ```

mod coord;
mod grid;

pub use coord::{
    create_or_update, from_key, hash, key, key_zxy, quad_key, within_extent_and_z, TileCoord,
};
pub use grid::{Extent, TileGrid, TileRange, XyzTileGrid, MAX_XYZ_ZOOM, WEB_MERCATOR_HALF_SIZE};
