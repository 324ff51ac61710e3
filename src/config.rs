//! Configuration for label caching and font monitoring.
//!
//! [`LabelConfig`] is a `clap` argument group, so a host application embeds
//! it into its own command line with `#[command(flatten)]`:
//!
//! ```ignore
//! use clap::Parser;
//! use tile_label_core::LabelConfig;
//!
//! #[derive(Parser)]
//! struct Cli {
//!     #[command(flatten)]
//!     labels: LabelConfig,
//! }
//! ```
//!
//! # Environment Variables
//!
//! Every option can also be set via an environment variable with the
//! `TILE_LABEL_` prefix:
//!
//! - `TILE_LABEL_CACHE_SIZE` - Max label rasters to cache (default: 2048)
//! - `TILE_LABEL_FONT_POLL_MS` - Font poll period in milliseconds (default: 32)
//! - `TILE_LABEL_FONT_RETRIES` - Polls before giving up on a font (default: 60)
//! - `TILE_LABEL_PROBE_SIZE` - Probe font size in pixels (default: 32)

use clap::Args;

use crate::label::DEFAULT_LABEL_CACHE_CAPACITY;
use crate::text::{POLL_INTERVAL, PROBE_FONT_SIZE_PX, RETRY_LIMIT};

/// Default font poll period in milliseconds.
pub const DEFAULT_FONT_POLL_INTERVAL_MS: u64 = POLL_INTERVAL.as_millis() as u64;

// =============================================================================
// Label Configuration
// =============================================================================

/// Label cache and font monitor settings.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct LabelConfig {
    /// Maximum number of rendered label rasters to keep in cache.
    #[arg(
        long,
        default_value_t = DEFAULT_LABEL_CACHE_CAPACITY,
        env = "TILE_LABEL_CACHE_SIZE"
    )]
    pub label_cache_size: usize,

    /// Period of the font availability poll loop, in milliseconds.
    #[arg(
        long,
        default_value_t = DEFAULT_FONT_POLL_INTERVAL_MS,
        env = "TILE_LABEL_FONT_POLL_MS"
    )]
    pub font_poll_interval_ms: u64,

    /// Number of polls before a font that never loads is given up on.
    #[arg(long, default_value_t = RETRY_LIMIT, env = "TILE_LABEL_FONT_RETRIES")]
    pub font_retry_limit: u32,

    /// Font size used for availability probes, in pixels.
    #[arg(long, default_value_t = PROBE_FONT_SIZE_PX, env = "TILE_LABEL_PROBE_SIZE")]
    pub probe_font_size_px: u32,
}

impl LabelConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.label_cache_size == 0 {
            return Err("label_cache_size must be greater than 0".to_string());
        }
        if self.font_poll_interval_ms == 0 {
            return Err("font_poll_interval_ms must be greater than 0".to_string());
        }
        if self.font_retry_limit == 0 {
            return Err("font_retry_limit must be greater than 0".to_string());
        }
        if self.probe_font_size_px == 0 {
            return Err("probe_font_size_px must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            label_cache_size: DEFAULT_LABEL_CACHE_CAPACITY,
            font_poll_interval_ms: DEFAULT_FONT_POLL_INTERVAL_MS,
            font_retry_limit: RETRY_LIMIT,
            probe_font_size_px: PROBE_FONT_SIZE_PX,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
