//! Shared error type across statline crates.

use thiserror::Error;

use crate::metric::ScalarKind;

/// Shared result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type used by the registry and the logger pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Operation referenced a metric name that is not registered.
    #[error("metric not found: {0}")]
    NotFound(String),

    /// Update value kind does not match the metric's registered kind.
    #[error("metric type mismatch for {name}: expected {expected}, got {found}")]
    TypeMismatch {
        name: String,
        expected: ScalarKind,
        found: ScalarKind,
    },

    /// The sink could not be opened or written.
    #[error("sink unavailable: {0}")]
    SinkUnavailable(String),

    /// Flush requested after the dispatcher was stopped.
    #[error("dispatcher stopped")]
    Stopped,

    /// Config read/parse/validate failure.
    #[error("config: {0}")]
    Config(String),
}
