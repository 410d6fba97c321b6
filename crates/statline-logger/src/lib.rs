//! statline logger library entry.
//!
//! This crate wires the metric registry into an asynchronous pipeline: a
//! sink abstraction, a dispatcher owning the snapshot queue and its writer
//! task, and a periodic scheduler that flushes on a wall-clock interval. It
//! is consumed by the demo binary (`main.rs`) and by integration tests.

pub mod config;
pub mod dispatch;
pub mod scheduler;
pub mod sink;
pub mod workload;

pub use dispatch::Dispatcher;
pub use scheduler::Scheduler;
pub use sink::{FileSink, MemorySink, Sink, StdoutSink};
