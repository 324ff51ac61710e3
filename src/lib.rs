//! # Tile Label Core
//!
//! Support layer for tiled map renderers: compact tile addressing and the
//! lifecycle of a bounded cache of pre-rendered text labels.
//!
//! ## Features
//!
//! - **Tile addressing**: keys, hashes and quad keys for `(z, x, y)` tiles,
//!   plus zoom/extent validation against a tile grid
//! - **Glyph metrics**: text widths and cached line heights from the host
//!   text-layout engine
//! - **Font availability**: background detection of when requested font
//!   families finish loading, invalidating stale metrics and label rasters
//! - **Label cache**: LRU cache of rendered label rasters
//!
//! ## Architecture
//!
//! - [`tile`] - Tile coordinates and tile grid seam
//! - [`text`] - Measurement seam, glyph metrics, font monitor
//! - [`label`] - Label raster cache
//! - [`context`] - Per-map context owning all shared state
//! - [`config`] - Configuration types
//!
//! ## Example
//!
//! ```rust,ignore
//! use tile_label_core::{LabelKey, RenderContext};
//!
//! async fn draw(ctx: &RenderContext<MyEngine>) -> Result<(), MeasureError> {
//!     let font = "bold 12px 'Open Sans', sans-serif";
//!     let width = ctx.measure_width(font, "Main Street").await?;
//!     let height = ctx.measure_line_height(font).await?;
//!
//!     let key = LabelKey::new("Main Street", font);
//!     if ctx.labels().get(&key).await.is_none() {
//!         // Rasterize width x height and store it
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod label;
pub mod text;
pub mod tile;

// Re-export commonly used types
pub use config::LabelConfig;
pub use context::RenderContext;
pub use error::{ConfigError, MeasureError, TileCoordError};
pub use label::{LabelCache, LabelKey, LabelRaster, DEFAULT_LABEL_CACHE_CAPACITY};
pub use text::{
    parse_font_families, FontMonitor, FontStatus, GlyphMetrics, MeasureSurface, MonitorSettings,
    PollOutcome, ProbeGuard, ProbeId, TextMeasurer, RETRY_LIMIT,
};
pub use tile::{
    create_or_update, from_key, hash, key, key_zxy, quad_key, within_extent_and_z, Extent,
    TileCoord, TileGrid, TileRange, XyzTileGrid,
};
