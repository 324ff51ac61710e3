//! Label render cache.
//!
//! - [`LabelCache`]: LRU cache of label rasters (default 2048 entries)
//! - [`LabelKey`]: composite key for a rendered label (text, font, styles)

mod cache;

pub use cache::{LabelCache, LabelKey, LabelRaster, DEFAULT_LABEL_CACHE_CAPACITY};
