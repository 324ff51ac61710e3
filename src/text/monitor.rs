//! Font availability monitor.
//!
//! Host layout engines load web fonts asynchronously and give no completion
//! signal, silently substituting a fallback until the font arrives. Labels
//! measured or rasterized in the meantime are wrong, so once a requested
//! family becomes available every cached metric and raster is discarded.
//!
//! # Detection
//!
//! A probe string is measured at a fixed size in each reference font alone,
//! then in `"<family>, <reference>"`. If the family is missing the engine falls
//! back to the reference font and both widths match. The family counts as
//! available only when every reference width differs.
//!
//! # States
//!
//! ```text
//!  request ──► available? ──yes──► Confirmed
//!                  │
//!                  no
//!                  ▼
//!            Pending { 0 } ──tick: available──► Confirmed (invalidate caches)
//!                  │
//!                  └─tick: not available──► Pending { n + 1 } ... ──► GaveUp
//! ```
//!
//! One poll loop serves every pending family and stops once none is pending.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

use crate::config::LabelConfig;
use crate::label::LabelCache;

use super::css::{is_generic_family, parse_font_families};
use super::measure::TextMeasurer;
use super::metrics::GlyphMetrics;

/// Number of unsuccessful polls before a family is given up on.
pub const RETRY_LIMIT: u32 = 60;

/// Period of the shared poll loop.
pub const POLL_INTERVAL: Duration = Duration::from_millis(32);

/// Font size used for probe measurements, in pixels.
pub const PROBE_FONT_SIZE_PX: u32 = 32;

/// Wide, character-diverse probe string.
pub const PROBE_TEXT: &str = "wmytzilWMYTZIL@#/&?$%10\u{F013}";

/// Fallback-only fonts the probe is compared against.
pub const REFERENCE_FONTS: [&str; 2] = ["monospace", "serif"];

// =============================================================================
// Font Status
// =============================================================================

/// Availability of one requested font family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStatus {
    /// Not yet available after `retries` polls
    Pending { retries: u32 },

    /// Available in the layout engine
    Confirmed,

    /// Never became available; no longer polled
    GaveUp,
}

impl FontStatus {
    /// Retry counter in `[0, limit]`, where `limit` means confirmed.
    pub fn retries(&self, limit: u32) -> u32 {
        match self {
            Self::Pending { retries } => *retries,
            Self::Confirmed => limit,
            Self::GaveUp => limit.saturating_sub(1),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

/// Result of one poll tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollOutcome {
    /// Families confirmed during this tick
    pub confirmed: Vec<String>,

    /// Families given up on during this tick
    pub gave_up: Vec<String>,

    /// Whether no family is pending any more (the loop should stop)
    pub done: bool,
}

/// Poll loop tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorSettings {
    pub retry_limit: u32,
    pub poll_interval: Duration,
    pub probe_font_size_px: u32,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            retry_limit: RETRY_LIMIT,
            poll_interval: POLL_INTERVAL,
            probe_font_size_px: PROBE_FONT_SIZE_PX,
        }
    }
}

impl From<&LabelConfig> for MonitorSettings {
    fn from(config: &LabelConfig) -> Self {
        Self {
            retry_limit: config.font_retry_limit,
            poll_interval: Duration::from_millis(config.font_poll_interval_ms),
            probe_font_size_px: config.probe_font_size_px,
        }
    }
}

// =============================================================================
// Font Monitor
// =============================================================================

struct FontTable {
    fonts: HashMap<String, FontStatus>,
    /// Set while a poll loop is scheduled
    polling: bool,
}

/// Tracks requested font families until they load.
pub struct FontMonitor {
    table: Mutex<FontTable>,
    settings: MonitorSettings,
}

impl FontMonitor {
    pub fn new() -> Self {
        Self::with_settings(MonitorSettings::default())
    }

    pub fn with_settings(settings: MonitorSettings) -> Self {
        Self {
            table: Mutex::new(FontTable {
                fonts: HashMap::new(),
                polling: false,
            }),
            settings,
        }
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    /// Heuristic availability test for a single family.
    ///
    /// Generic families are always available. Measurement failures count as
    /// "not available".
    pub async fn is_available<M: TextMeasurer>(
        &self,
        metrics: &GlyphMetrics<M>,
        family: &str,
    ) -> bool {
        if is_generic_family(family) {
            return true;
        }

        let size = self.settings.probe_font_size_px;
        for reference in REFERENCE_FONTS {
            let reference_font = format!("{size}px {reference}");
            let candidate_font = format!("{size}px {}, {reference}", quote_family(family));

            let widths = async {
                let reference_width = metrics.measure_width(&reference_font, PROBE_TEXT).await?;
                let width = metrics.measure_width(&candidate_font, PROBE_TEXT).await?;
                Ok::<_, crate::error::MeasureError>((reference_width, width))
            };

            match widths.await {
                Ok((reference_width, width)) => {
                    trace!(family, reference, reference_width, width, "Probed font");
                    if width == reference_width {
                        return false;
                    }
                }
                Err(e) => {
                    trace!(family, error = %e, "Font probe failed");
                    return false;
                }
            }
        }
        true
    }

    /// Register every family of a font shorthand.
    ///
    /// Returns `true` when a poll loop must be started. Unparseable shorthands
    /// are ignored.
    pub async fn register<M: TextMeasurer>(&self, metrics: &GlyphMetrics<M>, font: &str) -> bool {
        let Some(families) = parse_font_families(font) else {
            return false;
        };

        let mut table = self.table.lock().await;
        let mut added_pending = false;

        for family in families {
            if table.fonts.contains_key(&family) {
                continue;
            }

            let status = if self.is_available(metrics, &family).await {
                debug!(family = %family, "Font family available");
                FontStatus::Confirmed
            } else {
                debug!(family = %family, "Font family pending");
                added_pending = true;
                FontStatus::Pending { retries: 0 }
            };
            table.fonts.insert(family, status);
        }

        // Families left pending by an abandoned loop are picked up too.
        if !table.polling && (added_pending || table.fonts.values().any(FontStatus::is_pending)) {
            table.polling = true;
            return true;
        }
        false
    }

    /// Run one poll tick over every pending family.
    ///
    /// If any family is confirmed, the measuring surface, line heights and
    /// label rasters are cleared together. A manual tick never ends a
    /// scheduled poll loop; the loop stops itself on its next tick.
    pub async fn poll_once<M: TextMeasurer>(
        &self,
        metrics: &GlyphMetrics<M>,
        labels: &LabelCache,
    ) -> PollOutcome {
        self.tick(metrics, labels, false).await
    }

    /// Poll tick run by the loop that owns the `polling` flag.
    ///
    /// Clears the flag once nothing is pending, so the next pending
    /// registration starts a new loop.
    pub(crate) async fn poll_loop_tick<M: TextMeasurer>(
        &self,
        metrics: &GlyphMetrics<M>,
        labels: &LabelCache,
    ) -> PollOutcome {
        self.tick(metrics, labels, true).await
    }

    /// Mark the poll loop as stopped without it having run.
    pub(crate) async fn abandon_poll_loop(&self) {
        self.table.lock().await.polling = false;
    }

    async fn tick<M: TextMeasurer>(
        &self,
        metrics: &GlyphMetrics<M>,
        labels: &LabelCache,
        owns_loop: bool,
    ) -> PollOutcome {
        let mut table = self.table.lock().await;
        let mut outcome = PollOutcome::default();
        let mut still_pending = false;

        for (family, status) in table.fonts.iter_mut() {
            let FontStatus::Pending { retries } = *status else {
                continue;
            };

            if self.is_available(metrics, family).await {
                debug!(family = %family, retries, "Font family loaded");
                *status = FontStatus::Confirmed;
                outcome.confirmed.push(family.clone());
            } else if retries + 1 >= self.settings.retry_limit {
                warn!(family = %family, "Font family did not load, giving up");
                *status = FontStatus::GaveUp;
                outcome.gave_up.push(family.clone());
            } else {
                *status = FontStatus::Pending {
                    retries: retries + 1,
                };
                still_pending = true;
            }
        }

        if !outcome.confirmed.is_empty() {
            metrics.invalidate(labels).await;
        }

        if !still_pending {
            if owns_loop {
                table.polling = false;
            }
            outcome.done = true;
        }
        outcome
    }

    /// Status of a family, if it was ever requested.
    pub async fn status(&self, family: &str) -> Option<FontStatus> {
        self.table.lock().await.fonts.get(family).copied()
    }

    /// Number of families still pending.
    pub async fn pending_count(&self) -> usize {
        let table = self.table.lock().await;
        table.fonts.values().filter(|s| s.is_pending()).count()
    }

    /// Whether a poll loop is scheduled.
    pub async fn is_polling(&self) -> bool {
        self.table.lock().await.polling
    }
}

impl Default for FontMonitor {
    fn default() -> Self {
        Self::new()
    }
}

/// Quote a family name for use inside a font shorthand.
fn quote_family(family: &str) -> String {
    let mut quoted = String::with_capacity(family.len() + 2);
    quoted.push('"');
    for c in family.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

// =============================================================================
// Tests
// =============================================================================
