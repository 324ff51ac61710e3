//! Glyph metrics cache.
//!
//! Widths are never cached: only the measuring surface's current font is
//! remembered so consecutive measurements in one font skip reconfiguration.
//! Line heights are memoized per font string until the next font
//! availability invalidation.

use std::collections::HashMap;

use tokio::sync::{Mutex, RwLock};
use tracing::trace;

use crate::error::MeasureError;
use crate::label::LabelCache;

use super::measure::{MeasureSurface, ProbeGuard, TextMeasurer};

// =============================================================================
// Measuring Surface Slot
// =============================================================================

/// Lazily created measuring surface plus its current font.
struct SurfaceSlot<S> {
    surface: Option<S>,
    font: Option<String>,
}

impl<S: MeasureSurface> SurfaceSlot<S> {
    fn empty() -> Self {
        Self {
            surface: None,
            font: None,
        }
    }

    fn measure<M>(&mut self, measurer: &M, font: &str, text: &str) -> Result<f64, MeasureError>
    where
        M: TextMeasurer<Surface = S>,
    {
        let surface = match self.surface {
            Some(ref mut surface) => surface,
            None => {
                trace!("Creating text measuring surface");
                self.font = None;
                self.surface.insert(measurer.create_surface()?)
            }
        };

        if self.font.as_deref() != Some(font) {
            surface.set_font(font);
            self.font = Some(font.to_string());
        }

        surface.measure_text(text)
    }

    fn reset(&mut self) {
        self.surface = None;
        self.font = None;
    }
}

// =============================================================================
// Glyph Metrics
// =============================================================================

/// Text measurement front-end with a line height cache.
pub struct GlyphMetrics<M: TextMeasurer> {
    measurer: M,
    surface: Mutex<SurfaceSlot<M::Surface>>,
    heights: RwLock<HashMap<String, f64>>,
}

impl<M: TextMeasurer> GlyphMetrics<M> {
    pub fn new(measurer: M) -> Self {
        Self {
            measurer,
            surface: Mutex::new(SurfaceSlot::empty()),
            heights: RwLock::new(HashMap::new()),
        }
    }

    /// The host text measurer.
    pub fn measurer(&self) -> &M {
        &self.measurer
    }

    /// Width of `text` rendered in `font`, in device pixels.
    pub async fn measure_width(&self, font: &str, text: &str) -> Result<f64, MeasureError> {
        let mut slot = self.surface.lock().await;
        slot.measure(&self.measurer, font, text)
    }

    /// Line height of `font`, in device pixels.
    ///
    /// Measured once per font string with a temporary probe, then served from
    /// cache until the next invalidation.
    pub async fn measure_line_height(&self, font: &str) -> Result<f64, MeasureError> {
        if let Some(height) = self.cached_line_height(font).await {
            return Ok(height);
        }

        let mut heights = self.heights.write().await;
        if let Some(&height) = heights.get(font) {
            return Ok(height);
        }

        let height = {
            let probe = ProbeGuard::insert(&self.measurer, font)?;
            probe.height()?
        };
        trace!(font, height, "Measured line height");
        heights.insert(font.to_string(), height);
        Ok(height)
    }

    /// Cached line height of `font`, without measuring.
    pub async fn cached_line_height(&self, font: &str) -> Option<f64> {
        self.heights.read().await.get(font).copied()
    }

    /// Number of fonts with a cached line height.
    pub async fn cached_height_count(&self) -> usize {
        self.heights.read().await.len()
    }

    /// Drop the measuring surface, the line heights and every label raster.
    ///
    /// All three locks are held together so readers never see a partially
    /// invalidated state.
    pub(crate) async fn invalidate(&self, labels: &LabelCache) {
        let mut slot = self.surface.lock().await;
        let mut heights = self.heights.write().await;
        let mut rasters = labels.lock().await;

        slot.reset();
        heights.clear();
        rasters.clear();
        trace!("Cleared text metrics and label rasters");
    }
}

// =============================================================================
// Tests
// =============================================================================
