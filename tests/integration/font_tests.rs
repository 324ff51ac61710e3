//! Font availability polling tests.
//!
//! Tests verify:
//! - The background poll loop gives up after the retry limit
//! - A font loading mid-poll clears metrics and label rasters
//! - Available and generic fonts never enter the poll loop
//! - The poll loop restarts for fonts requested after it stopped
//!
//! All tests run on a paused clock so poll ticks are deterministic.

use std::time::Duration;

use tile_label_core::{FontStatus, LabelConfig, RETRY_LIMIT};

use super::test_utils::{create_context, create_context_with_config, make_label, make_raster};

const TICK: Duration = Duration::from_millis(32);

// =============================================================================
// Give Up
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_unavailable_font_stops_after_retry_limit() {
    let (engine, context) = create_context();

    context.request_font("12px MyFont, sans-serif").await;

    assert!(context.is_polling().await);
    assert_eq!(
        context.monitor().status("MyFont").await,
        Some(FontStatus::Pending { retries: 0 })
    );
    assert_eq!(
        context.monitor().status("sans-serif").await,
        Some(FontStatus::Confirmed)
    );

    // One probe at request time, then one per tick until the limit.
    tokio::time::sleep(TICK * (RETRY_LIMIT + 5)).await;

    assert_eq!(
        context.monitor().status("MyFont").await,
        Some(FontStatus::GaveUp)
    );
    assert!(!context.is_polling().await);
    let probes = engine.measurements_for("MyFont");
    assert_eq!(probes, 1 + RETRY_LIMIT as usize);

    // No further measurements once the loop has stopped.
    tokio::time::sleep(TICK * 100).await;
    assert_eq!(engine.measurements_for("MyFont"), probes);
}

#[tokio::test(start_paused = true)]
async fn test_gave_up_font_is_not_requested_again() {
    let config = LabelConfig {
        font_retry_limit: 3,
        ..Default::default()
    };
    let (engine, context) = create_context_with_config(&config);

    context.request_font("12px Missing").await;
    tokio::time::sleep(TICK * 10).await;
    assert_eq!(
        context.monitor().status("Missing").await,
        Some(FontStatus::GaveUp)
    );

    let before = engine.measurement_count();
    context.request_font("12px Missing").await;
    assert!(!context.is_polling().await);
    assert_eq!(engine.measurement_count(), before);
}

// =============================================================================
// Confirmation
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_font_loading_mid_poll_invalidates_caches() {
    let (engine, context) = create_context();

    context.request_font("12px MyFont").await;

    // Three ticks at 32, 64 and 96ms.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(
        context.monitor().status("MyFont").await,
        Some(FontStatus::Pending { retries: 3 })
    );

    // Populate caches for an unrelated, already available font.
    context.metrics().measure_line_height("12px serif").await.unwrap();
    context.labels().set(make_label("Main St"), make_raster()).await;
    assert_eq!(context.metrics().cached_height_count().await, 1);
    assert_eq!(context.labels().len().await, 1);

    engine.load("MyFont");
    tokio::time::sleep(TICK).await;

    assert_eq!(
        context.monitor().status("MyFont").await,
        Some(FontStatus::Confirmed)
    );
    assert_eq!(context.metrics().cached_height_count().await, 0);
    assert!(context.labels().is_empty().await);
    assert!(!context.is_polling().await);
}

#[tokio::test(start_paused = true)]
async fn test_invalidation_recreates_measuring_surface() {
    let (engine, context) = create_context();

    context.request_font("12px Late").await;
    assert_eq!(engine.surface_count(), 1);

    engine.load("Late");
    tokio::time::sleep(TICK * 2).await;
    assert_eq!(
        context.monitor().status("Late").await,
        Some(FontStatus::Confirmed)
    );

    // The confirming tick measured on the old surface; the next measurement
    // needs a new one.
    context.measure_width("12px Late", "abc").await.unwrap();
    assert_eq!(engine.surface_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_available_font_confirmed_without_polling() {
    let (engine, context) = create_context();
    engine.load("Loaded");

    context.request_font("bold 14px Loaded").await;

    assert_eq!(
        context.monitor().status("Loaded").await,
        Some(FontStatus::Confirmed)
    );
    assert!(!context.is_polling().await);

    let before = engine.measurement_count();
    tokio::time::sleep(TICK * 10).await;
    assert_eq!(engine.measurement_count(), before);
}

#[tokio::test(start_paused = true)]
async fn test_fallback_family_never_pending() {
    let (engine, context) = create_context();

    context.request_font("10px monospace, serif").await;

    assert_eq!(
        context.monitor().status("monospace").await,
        Some(FontStatus::Confirmed)
    );
    assert_eq!(
        context.monitor().status("serif").await,
        Some(FontStatus::Confirmed)
    );
    assert_eq!(context.monitor().pending_count().await, 0);
    assert!(!context.is_polling().await);
    assert_eq!(engine.measurement_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_unparseable_font_is_ignored() {
    let (engine, context) = create_context();

    context.request_font("MyFont, sans-serif").await;

    assert_eq!(context.monitor().status("MyFont").await, None);
    assert!(!context.is_polling().await);
    assert_eq!(engine.measurement_count(), 0);
}

// =============================================================================
// Poll Loop Lifecycle
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_single_poll_loop_for_many_fonts() {
    let (engine, context) = create_context();

    context.request_font("12px A").await;
    context.request_font("12px B").await;
    assert_eq!(context.monitor().pending_count().await, 2);

    tokio::time::sleep(Duration::from_millis(100)).await;

    // A second loop would double the per-tick probes.
    assert_eq!(engine.measurements_for("\"A\""), 1 + 3);
    assert_eq!(engine.measurements_for("\"B\""), 1 + 3);
}

#[tokio::test(start_paused = true)]
async fn test_poll_loop_restarts_after_stopping() {
    let (engine, context) = create_context();

    context.request_font("12px First").await;
    engine.load("First");
    tokio::time::sleep(TICK * 2).await;
    assert!(!context.is_polling().await);

    context.request_font("12px Second").await;
    assert!(context.is_polling().await);

    engine.load("Second");
    tokio::time::sleep(TICK * 2).await;
    assert_eq!(
        context.monitor().status("Second").await,
        Some(FontStatus::Confirmed)
    );
    assert!(!context.is_polling().await);
}

#[tokio::test(start_paused = true)]
async fn test_manual_poll_tick() {
    let (engine, context) = create_context();

    context.request_font("12px Manual").await;
    engine.load("Manual");

    let outcome = context.poll_fonts().await;
    assert_eq!(outcome.confirmed, vec!["Manual".to_string()]);
    assert!(outcome.done);

    // The background loop stops itself on its next tick.
    assert!(context.is_polling().await);
    tokio::time::sleep(TICK).await;
    assert!(!context.is_polling().await);
}

#[tokio::test(start_paused = true)]
async fn test_manual_tick_does_not_start_second_loop() {
    let (engine, context) = create_context();

    context.request_font("12px A").await;
    engine.load("A");
    assert!(context.poll_fonts().await.done);

    context.request_font("12px B").await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    // One loop: three ticks at 32, 64 and 96ms.
    assert_eq!(engine.measurements_for("\"B\""), 1 + 3);
    assert_eq!(
        context.monitor().status("B").await,
        Some(FontStatus::Pending { retries: 3 })
    );
}
