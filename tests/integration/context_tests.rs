//! Render context tests.
//!
//! Tests verify:
//! - Measurements register fonts and propagate engine failures
//! - Line heights are measured once per font
//! - Independent contexts do not share caches or invalidation
//! - Configuration flows into the label cache and is validated
//! - Font requests outside a tokio runtime do not panic

use std::time::Duration;

use tile_label_core::{ConfigError, FontStatus, LabelConfig, MeasureError, RenderContext};

use super::test_utils::{
    create_context, create_context_with_config, make_label, make_raster, ScriptedEngine,
};

#[tokio::test]
async fn test_measure_width_registers_font() {
    let (engine, context) = create_context();
    engine.load("Roboto");

    let width = context
        .measure_width("12px Roboto, sans-serif", "abcd")
        .await
        .unwrap();

    assert_eq!(width, 4.0 + 3.0);
    assert_eq!(
        context.monitor().status("Roboto").await,
        Some(FontStatus::Confirmed)
    );
}

#[tokio::test]
async fn test_line_height_measured_once() {
    let (engine, context) = create_context();

    let first = context.measure_line_height("12px serif").await.unwrap();
    let second = context.measure_line_height("12px serif").await.unwrap();

    assert_eq!(first, 14.0);
    assert_eq!(first, second);
    assert_eq!(engine.probes_inserted(), 1);
    assert_eq!(engine.probes_removed(), 1);
}

#[tokio::test]
async fn test_engine_failure_propagates() {
    let (engine, context) = create_context();
    engine.set_unavailable(true);

    let width = context.measure_width("12px serif", "abc").await;
    assert!(matches!(width, Err(MeasureError::Unavailable(_))));

    let height = context.measure_line_height("12px serif").await;
    assert!(matches!(height, Err(MeasureError::Unavailable(_))));
    assert_eq!(engine.probes_removed(), 0);
}

#[tokio::test]
async fn test_engine_failure_does_not_fail_font_request() {
    let (engine, context) = create_context();
    engine.set_unavailable(true);

    context.request_font("12px Offline").await;

    assert_eq!(
        context.monitor().status("Offline").await,
        Some(FontStatus::Pending { retries: 0 })
    );
}

#[tokio::test(start_paused = true)]
async fn test_contexts_are_isolated() {
    let (engine_a, context_a) = create_context();
    let (_engine_b, context_b) = create_context();

    context_a.labels().set(make_label("a"), make_raster()).await;
    context_b.labels().set(make_label("b"), make_raster()).await;
    context_b.measure_line_height("12px serif").await.unwrap();

    context_a.request_font("12px Shared").await;
    engine_a.load("Shared");
    tokio::time::sleep(Duration::from_millis(64)).await;

    assert_eq!(
        context_a.monitor().status("Shared").await,
        Some(FontStatus::Confirmed)
    );
    assert!(context_a.labels().is_empty().await);

    assert_eq!(context_b.monitor().status("Shared").await, None);
    assert_eq!(context_b.labels().len().await, 1);
    assert_eq!(context_b.metrics().cached_height_count().await, 1);
}

#[tokio::test]
async fn test_clones_share_state() {
    let (_engine, context) = create_context();
    let clone = context.clone();

    clone.labels().set(make_label("a"), make_raster()).await;

    assert!(context.labels().contains(&make_label("a")).await);
}

#[tokio::test]
async fn test_label_cache_size_from_config() {
    let config = LabelConfig {
        label_cache_size: 2,
        ..Default::default()
    };
    let (_engine, context) = create_context_with_config(&config);

    for text in ["a", "b", "c"] {
        context.labels().set(make_label(text), make_raster()).await;
    }

    assert_eq!(context.labels().capacity().await, 2);
    assert_eq!(context.labels().len().await, 2);
    assert!(!context.labels().contains(&make_label("a")).await);

    context.labels().set_size(1).await;
    assert_eq!(context.labels().len().await, 1);
    assert!(context.labels().contains(&make_label("c")).await);
}

#[test]
fn test_zero_poll_interval_rejected() {
    let config = LabelConfig {
        font_poll_interval_ms: 0,
        ..Default::default()
    };

    let result = RenderContext::with_config(ScriptedEngine::new(), &config);

    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_request_font_outside_tokio_runtime() {
    let (engine, context) = create_context();

    futures::executor::block_on(context.request_font("12px Late"));

    let status = futures::executor::block_on(context.monitor().status("Late"));
    assert_eq!(status, Some(FontStatus::Pending { retries: 0 }));
    assert!(!futures::executor::block_on(context.is_polling()));

    // A request inside a runtime starts the loop for the family left pending.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap();
    runtime.block_on(async {
        engine.load("Late");
        context.request_font("12px sans-serif").await;
        assert!(context.is_polling().await);

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(
            context.monitor().status("Late").await,
            Some(FontStatus::Confirmed)
        );
        assert!(!context.is_polling().await);
    });
}
