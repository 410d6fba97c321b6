//! Asynchronous batched snapshot writer.
//!
//! The dispatcher decouples "snapshot taken" from "snapshot written": a
//! flush request takes a point-in-time registry snapshot synchronously,
//! enqueues it, and returns without touching I/O. One background writer
//! task drains the queue in FIFO order and serializes each batch to the
//! sink as a single timestamped line.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use statline_core::{Error, Registry, Result, SnapshotBatch};

use crate::sink::Sink;

/// Wall-clock timestamp, millisecond precision, local time.
fn timestamp_now() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

/// Serialize one batch into its log line (without trailing newline).
fn render_line(batch: &SnapshotBatch) -> String {
    let mut line = timestamp_now();
    for (name, value) in batch {
        line.push_str(" \"");
        line.push_str(name);
        line.push_str("\" ");
        line.push_str(value);
    }
    line
}

struct Inner {
    tx: Option<mpsc::UnboundedSender<SnapshotBatch>>,
    worker: Option<JoinHandle<()>>,
}

/// Owns the snapshot queue and the writer task.
///
/// Batches are written in enqueue order, never reordered or dropped. The
/// queue is an unbounded channel: enqueuing never blocks on a slow sink.
pub struct Dispatcher {
    registry: Arc<Registry>,
    inner: Mutex<Inner>,
    stopped: AtomicBool,
    write_errors: Arc<AtomicU64>,
}

impl Dispatcher {
    /// Build a dispatcher over `registry` and spawn its writer task, which
    /// takes exclusive ownership of `sink`.
    pub fn new(registry: Arc<Registry>, sink: Box<dyn Sink>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let write_errors = Arc::new(AtomicU64::new(0));
        let worker = tokio::spawn(run_writer(rx, sink, Arc::clone(&write_errors)));
        Self {
            registry,
            inner: Mutex::new(Inner {
                tx: Some(tx),
                worker: Some(worker),
            }),
            stopped: AtomicBool::new(false),
            write_errors,
        }
    }

    /// The registry this dispatcher snapshots.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Take a snapshot (resetting every metric to its default) and enqueue
    /// it for the writer. Returns once enqueued; never blocks on the sink.
    ///
    /// Fails with [`Error::Stopped`] after [`Dispatcher::stop`] — a stopped
    /// dispatcher accepts no new flushes.
    pub fn request_flush(&self) -> Result<()> {
        if self.stopped.load(Ordering::Acquire) {
            return Err(Error::Stopped);
        }
        let batch = self.registry.snapshot_and_reset();
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        match inner.tx.as_ref() {
            Some(tx) => tx.send(batch).map_err(|_| Error::Stopped),
            None => Err(Error::Stopped),
        }
    }

    /// Count of sink write failures since construction.
    ///
    /// Failed writes lose their line only; the writer keeps processing
    /// subsequent batches. Each failure is also logged via `tracing`.
    pub fn write_errors(&self) -> u64 {
        self.write_errors.load(Ordering::Relaxed)
    }

    /// Stop accepting flushes, drain everything already queued, then join
    /// the writer task. Idempotent; repeated calls are no-ops.
    ///
    /// Shutdown is cooperative: a sink blocked indefinitely on a write will
    /// block this call indefinitely.
    pub async fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
        let (tx, worker) = {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            (inner.tx.take(), inner.worker.take())
        };
        // Dropping the sender closes the queue; the writer drains what is
        // left and exits.
        drop(tx);
        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                tracing::error!(error = %e, "writer task join failed");
            }
        }
    }
}

/// Writer loop: dequeue oldest batch, skip empty ones, otherwise serialize
/// and flush one line. Exits once the queue is closed and drained.
async fn run_writer(
    mut rx: mpsc::UnboundedReceiver<SnapshotBatch>,
    mut sink: Box<dyn Sink>,
    write_errors: Arc<AtomicU64>,
) {
    while let Some(batch) = rx.recv().await {
        if batch.is_empty() {
            continue;
        }
        let line = render_line(&batch);
        if let Err(e) = sink.write_line(&line).await {
            write_errors.fetch_add(1, Ordering::Relaxed);
            tracing::error!(error = %e, "metric line write failed, line dropped");
        }
    }
    tracing::debug!("writer task drained, exiting");
}
