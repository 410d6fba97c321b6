//! Scheduler timing and lifecycle tests.
//!
//! Intervals are tens of milliseconds with generous margins so the
//! assertions hold on loaded CI machines.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use statline_core::Registry;
use statline_logger::{Dispatcher, MemorySink, Scheduler};

fn scheduled_pipeline() -> (Arc<Dispatcher>, Scheduler, MemorySink) {
    let registry = Arc::new(Registry::new());
    registry.add_metric("ticks", 0i64);
    let sink = MemorySink::new();
    let dispatcher = Arc::new(Dispatcher::new(registry, Box::new(sink.clone())));
    let scheduler = Scheduler::new(Arc::clone(&dispatcher));
    (dispatcher, scheduler, sink)
}

#[tokio::test]
async fn periodic_flushes_appear_and_stop_after_stop() {
    let (dispatcher, scheduler, sink) = scheduled_pipeline();

    scheduler.start(Duration::from_millis(25));
    assert!(scheduler.is_running());
    tokio::time::sleep(Duration::from_millis(300)).await;

    scheduler.stop().await;
    assert!(!scheduler.is_running());
    dispatcher.stop().await; // drain what the timer enqueued

    let produced = sink.lines().len();
    assert!(produced >= 3, "expected at least 3 lines, got {produced}");

    // Nothing appears after stop.
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(sink.lines().len(), produced);
}

#[tokio::test]
async fn second_start_is_a_noop_first_interval_wins() {
    let (dispatcher, scheduler, sink) = scheduled_pipeline();

    scheduler.start(Duration::from_millis(25));
    // A second start must not replace the running timer or its interval.
    scheduler.start(Duration::from_secs(30));

    tokio::time::sleep(Duration::from_millis(200)).await;
    scheduler.stop().await;
    dispatcher.stop().await;

    assert!(
        sink.lines().len() >= 2,
        "25ms interval must have survived the second start"
    );
}

#[tokio::test]
async fn update_interval_takes_effect_on_next_cycle() {
    let (dispatcher, scheduler, sink) = scheduled_pipeline();

    scheduler.start(Duration::from_millis(150));
    scheduler.update_interval(Duration::from_millis(30));

    // First sleep still runs its full 150ms (no preemption); afterwards the
    // 30ms interval applies.
    tokio::time::sleep(Duration::from_millis(600)).await;
    scheduler.stop().await;
    dispatcher.stop().await;

    let produced = sink.lines().len();
    assert!(
        produced >= 6,
        "expected the shorter interval to kick in, got {produced} lines"
    );
}

#[tokio::test]
async fn stop_is_idempotent_and_prompt() {
    let (dispatcher, scheduler, _sink) = scheduled_pipeline();

    scheduler.start(Duration::from_secs(60));
    // Stop must wake the in-flight sleep instead of waiting a minute.
    let begun = std::time::Instant::now();
    scheduler.stop().await;
    scheduler.stop().await;
    assert!(begun.elapsed() < Duration::from_secs(5));

    dispatcher.stop().await;
}

#[tokio::test]
async fn stop_before_start_is_safe() {
    let (dispatcher, scheduler, _sink) = scheduled_pipeline();
    scheduler.stop().await;
    assert!(!scheduler.is_running());
    dispatcher.stop().await;
}
