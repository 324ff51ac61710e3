//! Tile grid collaborator.
//!
//! The rendering pipeline owns the tile grid; this crate only needs to ask it
//! for zoom bounds and the range of tile indices worth fetching at a zoom
//! level. [`TileGrid`] is that seam. [`XyzTileGrid`] is a ready-made
//! implementation for square power-of-two grids (web mercator style).

use serde::{Deserialize, Serialize};

/// Bounding box `[min_x, min_y, max_x, max_y]` in map units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extent {
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Inclusive range of tile columns and rows at one zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRange {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl TileRange {
    pub const fn new(min_x: i32, max_x: i32, min_y: i32, max_y: i32) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Whether `(x, y)` is inside the range (bounds inclusive).
    pub fn contains_xy(&self, x: i32, y: i32) -> bool {
        self.min_x <= x && x <= self.max_x && self.min_y <= y && y <= self.max_y
    }
}

/// Zoom bounds and tile ranges of a tile grid.
///
/// Returning `None` from either range method means "no constraint".
pub trait TileGrid {
    fn min_zoom(&self) -> u8;

    fn max_zoom(&self) -> u8;

    /// Configured extent, if the grid is bounded.
    fn extent(&self) -> Option<Extent>;

    /// Full theoretical tile range at zoom `z`.
    fn full_tile_range(&self, z: u8) -> Option<TileRange>;

    /// Tile range covering `extent` at zoom `z`.
    fn tile_range_for_extent_and_z(&self, extent: &Extent, z: u8) -> Option<TileRange>;
}

// =============================================================================
// XYZ Tile Grid
// =============================================================================

/// Square grid with `2^z` tiles per axis at zoom `z`.
///
/// Columns grow eastward from `world.min_x`, rows grow southward from
/// `world.max_y`.
#[derive(Debug, Clone, PartialEq)]
pub struct XyzTileGrid {
    world: Extent,
    min_zoom: u8,
    max_zoom: u8,
    extent: Option<Extent>,
}

/// Half the circumference of the earth in web mercator meters.
pub const WEB_MERCATOR_HALF_SIZE: f64 = 20_037_508.342_789_244;

/// Highest zoom level whose full range fits in `i32` tile indices.
pub const MAX_XYZ_ZOOM: u8 = 30;

impl XyzTileGrid {
    /// Grid over `world` covering zoom levels `min_zoom..=max_zoom`.
    ///
    /// `max_zoom` is clamped to [`MAX_XYZ_ZOOM`].
    pub fn new(world: Extent, min_zoom: u8, max_zoom: u8) -> Self {
        Self {
            world,
            min_zoom,
            max_zoom: max_zoom.min(MAX_XYZ_ZOOM),
            extent: None,
        }
    }

    /// Standard web mercator grid.
    pub fn web_mercator(min_zoom: u8, max_zoom: u8) -> Self {
        Self::new(
            Extent::new(
                -WEB_MERCATOR_HALF_SIZE,
                -WEB_MERCATOR_HALF_SIZE,
                WEB_MERCATOR_HALF_SIZE,
                WEB_MERCATOR_HALF_SIZE,
            ),
            min_zoom,
            max_zoom,
        )
    }

    /// Restrict valid tiles to those intersecting `extent`.
    pub fn with_extent(mut self, extent: Extent) -> Self {
        self.extent = Some(extent);
        self
    }

    fn tiles_per_axis(z: u8) -> i32 {
        1i32 << z.min(MAX_XYZ_ZOOM)
    }
}

impl TileGrid for XyzTileGrid {
    fn min_zoom(&self) -> u8 {
        self.min_zoom
    }

    fn max_zoom(&self) -> u8 {
        self.max_zoom
    }

    fn extent(&self) -> Option<Extent> {
        self.extent
    }

    fn full_tile_range(&self, z: u8) -> Option<TileRange> {
        if z > MAX_XYZ_ZOOM {
            return None;
        }
        let last = Self::tiles_per_axis(z) - 1;
        Some(TileRange::new(0, last, 0, last))
    }

    fn tile_range_for_extent_and_z(&self, extent: &Extent, z: u8) -> Option<TileRange> {
        if z > MAX_XYZ_ZOOM || self.world.width() <= 0.0 || self.world.height() <= 0.0 {
            return None;
        }

        let tiles = Self::tiles_per_axis(z);
        let tile_width = self.world.width() / f64::from(tiles);
        let tile_height = self.world.height() / f64::from(tiles);

        // Max edges are exclusive: an extent ending on a tile boundary does
        // not include the next tile. The range is not clipped to the world,
        // so an extent outside it yields columns or rows no tile has.
        let first = |offset: f64, size: f64| (offset / size).floor();
        let last_of = |offset: f64, size: f64| (offset / size).ceil() - 1.0;
        let index = |v: f64| v as i32;

        let min_col = first(extent.min_x - self.world.min_x, tile_width);
        let max_col = last_of(extent.max_x - self.world.min_x, tile_width).max(min_col);
        let min_row = first(self.world.max_y - extent.max_y, tile_height);
        let max_row = last_of(self.world.max_y - extent.min_y, tile_height).max(min_row);

        Some(TileRange::new(
            index(min_col),
            index(max_col),
            index(min_row),
            index(max_row),
        ))
    }
}

// =============================================================================
// Tests
// =============================================================================
