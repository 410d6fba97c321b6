//! Demo workload generators.
//!
//! Two simulated sources of metric traffic: a request loop that updates and
//! flushes an ad-hoc pipeline on every iteration, and a sampling loop that
//! only updates metrics, leaving flushing to the scheduler. Per-call errors
//! are logged and the loops continue; a bad metric name must not kill the
//! demo.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use statline_core::{Registry, Result};

use crate::dispatch::Dispatcher;

/// Update request metrics and flush, every 200ms, until `stop` is set.
pub async fn simulate_requests(dispatcher: Arc<Dispatcher>, stop: Arc<AtomicBool>) {
    let mut rng = StdRng::from_entropy();
    while !stop.load(Ordering::Relaxed) {
        if let Err(e) = record_request(&dispatcher, &mut rng) {
            tracing::error!(error = %e, "request workload update failed");
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
}

fn record_request(dispatcher: &Dispatcher, rng: &mut StdRng) -> Result<()> {
    let registry = dispatcher.registry();
    registry.update("HTTP RPS", rng.gen_range(10..=100i64))?;
    registry.update("LastEndpoint", "/api/v1/resource")?;
    dispatcher.request_flush()?;
    Ok(())
}

/// Sample CPU-ish metrics every 300ms until `stop` is set. Flushing is the
/// scheduler's job.
pub async fn simulate_cpu(registry: Arc<Registry>, stop: Arc<AtomicBool>) {
    let mut rng = StdRng::from_entropy();
    while !stop.load(Ordering::Relaxed) {
        if let Err(e) = record_cpu(&registry, &mut rng) {
            tracing::error!(error = %e, "cpu workload update failed");
        }
        tokio::time::sleep(Duration::from_millis(300)).await;
    }
}

fn record_cpu(registry: &Registry, rng: &mut StdRng) -> Result<()> {
    registry.update("CPU Usage", rng.gen_range(10..=90) as f64 / 100.0)?;
    registry.update("Threads", rng.gen_range(1..=8i64))?;
    Ok(())
}
