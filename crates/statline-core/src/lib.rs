//! statline core: metric primitives, the registry, and error types.
//!
//! This crate defines the scalar value model, the thread-safe metric
//! registry with snapshot-and-reset semantics, and the error surface shared
//! by the logger pipeline. It intentionally carries no runtime dependencies
//! so it can be used from sync and async contexts alike.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `Error`/`Result` so a metrics layer
//! never takes down its host process.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metric;
pub mod registry;

/// Shared result type.
pub use error::{Error, Result};
pub use metric::{Metric, ScalarKind, Value};
pub use registry::{Registry, SnapshotBatch};
