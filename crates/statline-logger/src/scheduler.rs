//! Periodic flush trigger.
//!
//! Wraps a dispatcher with a timer task that sleeps for the configured
//! interval, then requests a flush, until stopped. Interval changes are
//! observed at the top of the next cycle; an in-progress sleep is never
//! preempted by an interval change (stop does wake it, so shutdown is
//! prompt).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::dispatch::Dispatcher;

struct TimerTask {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Periodic scheduler over a dispatcher. At most one timer task is active
/// per instance.
pub struct Scheduler {
    dispatcher: Arc<Dispatcher>,
    interval_ms: Arc<AtomicU64>,
    inner: Mutex<Option<TimerTask>>,
}

impl Scheduler {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            interval_ms: Arc::new(AtomicU64::new(1_000)),
            inner: Mutex::new(None),
        }
    }

    /// Launch the timer task. No-op when already running: the first
    /// interval wins until [`Scheduler::stop`].
    pub fn start(&self, interval: Duration) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.is_some() {
            return;
        }
        self.interval_ms
            .store(interval_millis(interval), Ordering::Relaxed);

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let dispatcher = Arc::clone(&self.dispatcher);
        let interval_ms = Arc::clone(&self.interval_ms);
        let handle = tokio::spawn(async move {
            loop {
                // Re-read so update_interval takes effect next cycle.
                let sleep_for = Duration::from_millis(interval_ms.load(Ordering::Relaxed));
                tokio::select! {
                    _ = tokio::time::sleep(sleep_for) => {
                        if let Err(e) = dispatcher.request_flush() {
                            tracing::error!(error = %e, "scheduled flush failed");
                        }
                    }
                    _ = stop_rx.changed() => break,
                }
            }
            tracing::debug!("timer task exiting");
        });
        *inner = Some(TimerTask { stop_tx, handle });
    }

    /// Change the interval used by the next sleep. A sleep already in
    /// progress is unaffected.
    pub fn update_interval(&self, interval: Duration) {
        self.interval_ms
            .store(interval_millis(interval), Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Signal the timer task (waking an in-flight sleep) and wait for it to
    /// terminate. Idempotent; no further flushes are triggered after this
    /// returns.
    pub async fn stop(&self) {
        let task = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(TimerTask { stop_tx, handle }) = task {
            let _ = stop_tx.send(true);
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "timer task join failed");
            }
        }
    }
}

/// Clamp to at least 1ms so a zero interval cannot spin the timer task.
fn interval_millis(interval: Duration) -> u64 {
    (interval.as_millis() as u64).max(1)
}
