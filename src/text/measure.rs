//! Text measurement collaborator.
//!
//! The host text-layout engine measures text in two ways:
//!
//! - **Surface**: a reusable measuring surface with a current font setting,
//!   asked for the advance width of a string.
//! - **Probe**: a detached element sized by the layout engine, used for the
//!   line height of a font. A probe is inserted, measured and removed.
//!
//! [`ProbeGuard`] ties probe removal to scope so the probe never outlives the
//! measurement, including when the measurement fails.

use crate::error::MeasureError;

/// Opaque handle to a probe element inserted by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProbeId(pub u64);

/// A measuring surface with a mutable current font.
pub trait MeasureSurface: Send {
    /// Apply a CSS font shorthand to subsequent measurements.
    fn set_font(&mut self, font: &str);

    /// Advance width of `text` in the current font, in device pixels.
    fn measure_text(&mut self, text: &str) -> Result<f64, MeasureError>;
}

/// Host text-layout engine.
pub trait TextMeasurer: Send + Sync + 'static {
    type Surface: MeasureSurface + 'static;

    /// Create a fresh measuring surface.
    ///
    /// Called lazily and again after every font-availability invalidation, so
    /// newly loaded fonts are picked up.
    fn create_surface(&self) -> Result<Self::Surface, MeasureError>;

    /// Insert a detached probe element styled with `font`.
    fn insert_probe(&self, font: &str) -> Result<ProbeId, MeasureError>;

    /// Rendered height of an inserted probe, in device pixels.
    fn probe_height(&self, probe: ProbeId) -> Result<f64, MeasureError>;

    /// Remove a probe inserted by [`TextMeasurer::insert_probe`].
    fn remove_probe(&self, probe: ProbeId);
}

// =============================================================================
// Probe Guard
// =============================================================================

/// Inserted probe that is removed when the guard drops.
pub struct ProbeGuard<'a, M: TextMeasurer + ?Sized> {
    measurer: &'a M,
    probe: ProbeId,
}

impl<'a, M: TextMeasurer + ?Sized> ProbeGuard<'a, M> {
    /// Insert a probe styled with `font`.
    pub fn insert(measurer: &'a M, font: &str) -> Result<Self, MeasureError> {
        let probe = measurer.insert_probe(font)?;
        Ok(Self { measurer, probe })
    }

    /// Height of the probe.
    pub fn height(&self) -> Result<f64, MeasureError> {
        self.measurer.probe_height(self.probe)
    }
}

impl<M: TextMeasurer + ?Sized> Drop for ProbeGuard<'_, M> {
    fn drop(&mut self) {
        self.measurer.remove_probe(self.probe);
    }
}

// =============================================================================
// Tests
// =============================================================================
