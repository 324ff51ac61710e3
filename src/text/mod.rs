//! Text measurement and font availability.
//!
//! # Components
//!
//! - [`TextMeasurer`] / [`MeasureSurface`]: host layout engine seam
//! - [`GlyphMetrics`]: width measurement and cached line heights
//! - [`FontMonitor`]: detects when requested font families finish loading
//! - [`parse_font_families`]: family list of a CSS font shorthand
//!
//! When the monitor confirms a family it clears [`GlyphMetrics`] and the
//! [`LabelCache`](crate::label::LabelCache) in one step.

mod css;
mod measure;
mod metrics;
mod monitor;

pub use css::{is_generic_family, parse_font_families, GENERIC_FAMILIES};
pub use measure::{MeasureSurface, ProbeGuard, ProbeId, TextMeasurer};
pub use metrics::GlyphMetrics;
pub use monitor::{
    FontMonitor, FontStatus, MonitorSettings, PollOutcome, POLL_INTERVAL, PROBE_FONT_SIZE_PX,
    PROBE_TEXT, REFERENCE_FONTS, RETRY_LIMIT,
};
