//! Label render cache.
//!
//! This module provides an LRU cache of pre-rendered label rasters, so a label
//! drawn on many frames is rasterized once.
//!
//! # Cache Key
//!
//! Labels are cached by a composite key including:
//! - Label text
//! - CSS font shorthand
//! - Fill style (optional)
//! - Stroke style and width (optional)
//!
//! # Invalidation
//!
//! The cache is cleared wholesale whenever a requested font finishes loading,
//! since any raster may have been drawn with a fallback font. Callers must not
//! assume an entry survives across frames.

use std::num::NonZeroUsize;
use std::sync::Arc;

use image::RgbaImage;
use lru::LruCache;
use tokio::sync::RwLock;
use tracing::trace;

/// Default number of cached labels.
pub const DEFAULT_LABEL_CACHE_CAPACITY: usize = 2048;

/// A ready-to-blit label raster.
pub type LabelRaster = Arc<RgbaImage>;

// =============================================================================
// Cache Key
// =============================================================================

/// Cache key for rendered labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LabelKey {
    /// Text content
    pub text: Arc<str>,

    /// CSS font shorthand used to render the text
    pub font: Arc<str>,

    /// Fill style, if filled
    pub fill: Option<Arc<str>>,

    /// Stroke style and width in hundredths of a pixel, if stroked
    pub stroke: Option<(Arc<str>, u32)>,
}

impl LabelKey {
    /// Create a key for unstyled text.
    pub fn new(text: impl Into<Arc<str>>, font: impl Into<Arc<str>>) -> Self {
        Self {
            text: text.into(),
            font: font.into(),
            fill: None,
            stroke: None,
        }
    }

    /// Set the fill style.
    pub fn with_fill(mut self, fill: impl Into<Arc<str>>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    /// Set the stroke style and width in pixels.
    pub fn with_stroke(mut self, stroke: impl Into<Arc<str>>, width: f32) -> Self {
        let width = (width.max(0.0) * 100.0).round() as u32;
        self.stroke = Some((stroke.into(), width));
        self
    }
}

// =============================================================================
// Label Cache
// =============================================================================

/// LRU cache for label rasters bounded by entry count.
///
/// # Thread Safety
///
/// The cache is thread-safe and can be shared across async tasks via `Arc`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use image::RgbaImage;
/// use tile_label_core::label::{LabelCache, LabelKey};
///
/// #[tokio::main]
/// async fn main() {
///     let cache = LabelCache::new();
///
///     let key = LabelKey::new("Main Street", "12px sans-serif");
///     let raster = Arc::new(RgbaImage::new(64, 16));
///
///     cache.set(key.clone(), raster.clone()).await;
///     assert!(cache.get(&key).await.is_some());
/// }
/// ```
pub struct LabelCache {
    cache: RwLock<LruCache<LabelKey, LabelRaster>>,
}

impl LabelCache {
    /// Create a label cache with default capacity (2048 labels).
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_LABEL_CACHE_CAPACITY)
    }

    /// Create a label cache holding at most `capacity` labels.
    ///
    /// A capacity of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: RwLock::new(LruCache::new(non_zero(capacity))),
        }
    }

    /// Get a label raster, marking it as recently used.
    pub async fn get(&self, key: &LabelKey) -> Option<LabelRaster> {
        let mut cache = self.cache.write().await;
        cache.get(key).cloned()
    }

    /// Get a label raster without updating LRU order.
    pub async fn peek(&self, key: &LabelKey) -> Option<LabelRaster> {
        let cache = self.cache.read().await;
        cache.peek(key).cloned()
    }

    /// Check if a label is cached without updating LRU order.
    pub async fn contains(&self, key: &LabelKey) -> bool {
        let cache = self.cache.read().await;
        cache.contains(key)
    }

    /// Store a label raster, evicting the least-recently-used entry when full.
    ///
    /// Returns the key of the evicted entry, if any. Replacing the raster of
    /// an existing key evicts nothing.
    pub async fn set(&self, key: LabelKey, raster: LabelRaster) -> Option<LabelKey> {
        let mut cache = self.cache.write().await;
        let replacing = cache.contains(&key);
        let (evicted, _) = cache.push(key, raster).filter(|_| !replacing)?;
        trace!(text = %evicted.text, "Evicted label raster");
        Some(evicted)
    }

    /// Remove a label from the cache.
    pub async fn remove(&self, key: &LabelKey) -> Option<LabelRaster> {
        let mut cache = self.cache.write().await;
        cache.pop(key)
    }

    /// Clear all entries from the cache.
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.clear();
    }

    /// Change the capacity, evicting least-recently-used entries if it shrinks.
    pub async fn set_size(&self, capacity: usize) {
        let mut cache = self.cache.write().await;
        cache.resize(non_zero(capacity));
    }

    /// Get the current number of cached labels.
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.len()
    }

    /// Check if the cache is empty.
    pub async fn is_empty(&self) -> bool {
        let cache = self.cache.read().await;
        cache.is_empty()
    }

    /// Get the maximum number of labels.
    pub async fn capacity(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cap().get()
    }

    /// Exclusive access for clearing together with other caches.
    pub(crate) async fn lock(
        &self,
    ) -> tokio::sync::RwLockWriteGuard<'_, LruCache<LabelKey, LabelRaster>> {
        self.cache.write().await
    }
}

impl Default for LabelCache {
    fn default() -> Self {
        Self::new()
    }
}

fn non_zero(capacity: usize) -> NonZeroUsize {
    NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)
}

// =============================================================================
// Tests
// =============================================================================
