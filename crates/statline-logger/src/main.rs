//! statline demo binary.
//!
//! Wires two pipelines over file sinks:
//! - an ad-hoc logger flushed by the request workload on every iteration;
//! - a periodic logger flushed by the scheduler on a wall-clock interval.
//!
//! Runs the randomized workloads for the configured duration, then shuts
//! everything down gracefully (scheduler first, then dispatchers, which
//! drain their queues before returning).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

use statline_core::Registry;
use statline_logger::{config, workload, Dispatcher, FileSink, Scheduler};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    // Config (strict parsing + validate)
    let cfg = config::load_from_file("statline.yaml").expect("config load failed");

    // Ad-hoc pipeline: request metrics, flushed by the workload itself.
    let request_registry = Arc::new(Registry::new());
    request_registry.add_metric("HTTP RPS", 0i64);
    request_registry.add_metric("LastEndpoint", "");
    let request_sink = FileSink::create(&cfg.logger.request_log)
        .await
        .expect("failed to open request log");
    let request_dispatcher = Arc::new(Dispatcher::new(
        Arc::clone(&request_registry),
        Box::new(request_sink),
    ));

    // Scheduled pipeline: metrics from config, flushed on an interval.
    let periodic_registry = Arc::new(Registry::new());
    for spec in &cfg.metrics {
        let default = spec.resolved_default().expect("validated at load");
        periodic_registry.add_metric(spec.name.clone(), default);
    }
    let periodic_sink = FileSink::create(&cfg.logger.periodic_log)
        .await
        .expect("failed to open periodic log");
    let periodic_dispatcher = Arc::new(Dispatcher::new(
        Arc::clone(&periodic_registry),
        Box::new(periodic_sink),
    ));
    let scheduler = Scheduler::new(Arc::clone(&periodic_dispatcher));
    scheduler.start(Duration::from_secs(cfg.logger.interval_secs));

    tracing::info!(
        request_log = %cfg.logger.request_log,
        periodic_log = %cfg.logger.periodic_log,
        interval_secs = cfg.logger.interval_secs,
        "statline demo starting"
    );

    let stop = Arc::new(AtomicBool::new(false));
    let requests = tokio::spawn(workload::simulate_requests(
        Arc::clone(&request_dispatcher),
        Arc::clone(&stop),
    ));
    let cpu = tokio::spawn(workload::simulate_cpu(
        Arc::clone(&periodic_registry),
        Arc::clone(&stop),
    ));

    tokio::time::sleep(Duration::from_secs(cfg.logger.run_secs)).await;
    stop.store(true, Ordering::Relaxed);
    let _ = requests.await;
    let _ = cpu.await;

    scheduler.stop().await;
    request_dispatcher.stop().await;
    periodic_dispatcher.stop().await;

    tracing::info!("logging finished, check the configured log files");
}
