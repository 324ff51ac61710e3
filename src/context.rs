//! Render context.
//!
//! The context owns every piece of shared label state for one map instance:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                      RenderContext                        │
//! │  ┌──────────────┐  ┌───────────────┐  ┌───────────────┐   │
//! │  │ FontMonitor  │  │ GlyphMetrics  │  │  LabelCache   │   │
//! │  │ (retry table)│  │ (surface +    │  │  (LRU label   │   │
//! │  │              │  │  line heights)│  │   rasters)    │   │
//! │  └──────┬───────┘  └───────▲───────┘  └───────▲───────┘   │
//! │         │   invalidate     │                  │           │
//! │         └──────────────────┴──────────────────┘           │
//! │  ┌─────────────────────────────────────────────┐          │
//! │  │ poll task (one tokio task, started on demand)│          │
//! │  └─────────────────────────────────────────────┘          │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! Two contexts in one process never invalidate each other's caches.
//!
//! # Runtime
//!
//! The poll loop is a tokio task. Requesting a font that is not yet
//! available outside a tokio runtime leaves it pending without polling. The
//! next [`RenderContext::request_font`] made inside a runtime starts the loop
//! for every pending family; [`RenderContext::poll_fonts`] ticks by hand.

use std::sync::{Arc, Mutex as StdMutex, Weak};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::config::LabelConfig;
use crate::error::{ConfigError, MeasureError};
use crate::label::LabelCache;
use crate::text::{FontMonitor, GlyphMetrics, MonitorSettings, PollOutcome, TextMeasurer};

struct Shared<M: TextMeasurer> {
    metrics: GlyphMetrics<M>,
    labels: LabelCache,
    monitor: FontMonitor,
    poll_task: StdMutex<Option<JoinHandle<()>>>,
}

/// Shared label state for one map instance.
///
/// Cloning is cheap; clones share the same caches.
pub struct RenderContext<M: TextMeasurer> {
    shared: Arc<Shared<M>>,
}

impl<M: TextMeasurer> Clone for RenderContext<M> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<M: TextMeasurer> RenderContext<M> {
    /// Create a context with default settings.
    pub fn new(measurer: M) -> Self {
        Self::build(measurer, &LabelConfig::default())
    }

    /// Create a context from configuration.
    ///
    /// Fails if any setting is zero.
    pub fn with_config(measurer: M, config: &LabelConfig) -> Result<Self, ConfigError> {
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(Self::build(measurer, config))
    }

    fn build(measurer: M, config: &LabelConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                metrics: GlyphMetrics::new(measurer),
                labels: LabelCache::with_capacity(config.label_cache_size),
                monitor: FontMonitor::with_settings(MonitorSettings::from(config)),
                poll_task: StdMutex::new(None),
            }),
        }
    }

    pub fn labels(&self) -> &LabelCache {
        &self.shared.labels
    }

    pub fn metrics(&self) -> &GlyphMetrics<M> {
        &self.shared.metrics
    }

    pub fn monitor(&self) -> &FontMonitor {
        &self.shared.monitor
    }

    /// Start watching the families of a font shorthand.
    ///
    /// Families already available are confirmed immediately; the rest are
    /// polled in the background. Unparseable shorthands are ignored.
    pub async fn request_font(&self, font: &str) {
        let shared = &self.shared;
        if shared.monitor.register(&shared.metrics, font).await && !self.spawn_poll_task() {
            shared.monitor.abandon_poll_loop().await;
        }
    }

    /// Width of `text` in `font`, registering the font first.
    pub async fn measure_width(&self, font: &str, text: &str) -> Result<f64, MeasureError> {
        self.request_font(font).await;
        self.shared.metrics.measure_width(font, text).await
    }

    /// Line height of `font`, registering the font first.
    pub async fn measure_line_height(&self, font: &str) -> Result<f64, MeasureError> {
        self.request_font(font).await;
        self.shared.metrics.measure_line_height(font).await
    }

    /// Run one poll tick now, independent of the background task.
    pub async fn poll_fonts(&self) -> PollOutcome {
        let shared = &self.shared;
        shared.monitor.poll_once(&shared.metrics, &shared.labels).await
    }

    /// Whether the background poll loop is scheduled.
    pub async fn is_polling(&self) -> bool {
        self.shared.monitor.is_polling().await
    }

    /// Spawn the poll loop. Returns `false` if there is no runtime to run it.
    fn spawn_poll_task(&self) -> bool {
        let Ok(runtime) = Handle::try_current() else {
            warn!("No tokio runtime, font poll loop not started");
            return false;
        };

        let period = self.shared.monitor.settings().poll_interval;
        let weak: Weak<Shared<M>> = Arc::downgrade(&self.shared);

        debug!(period_ms = period.as_millis() as u64, "Starting font poll loop");
        let handle = runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let Some(shared) = weak.upgrade() else {
                    break;
                };
                let outcome = shared
                    .monitor
                    .poll_loop_tick(&shared.metrics, &shared.labels)
                    .await;
                if outcome.done {
                    debug!("Font poll loop finished");
                    break;
                }
            }
        });

        let mut slot = match self.shared.poll_task.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        // A previous loop has already cleared the polling flag and is exiting.
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
        true
    }
}

impl<M: TextMeasurer> Drop for Shared<M> {
    fn drop(&mut self) {
        let slot = match self.poll_task.get_mut() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }
}
