//! Sink abstraction and built-in sinks.
//!
//! A sink accepts UTF-8 text lines and flushes after each one so partial
//! batches are promptly visible to external readers. The writer task owns
//! its sink exclusively; no sink needs internal locking for the pipeline
//! itself (`MemorySink` carries one only for its cloneable read handle).

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, Stdout};

use statline_core::{Error, Result};

/// Destination for serialized metric lines.
///
/// `write_line` receives the line without its trailing newline and must
/// append it, then flush, before returning.
#[async_trait]
pub trait Sink: Send {
    async fn write_line(&mut self, line: &str) -> Result<()>;
}

/// Append-mode file sink.
pub struct FileSink {
    file: File,
}

impl FileSink {
    /// Open (or create) the file in append mode.
    ///
    /// Open failures surface as [`Error::SinkUnavailable`] at construction
    /// time, before any pipeline is built on top of the sink.
    pub async fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|e| Error::SinkUnavailable(format!("open {}: {e}", path.display())))?;
        Ok(Self { file })
    }
}

#[async_trait]
impl Sink for FileSink {
    async fn write_line(&mut self, line: &str) -> Result<()> {
        let io = |e: std::io::Error| Error::SinkUnavailable(format!("write: {e}"));
        self.file.write_all(line.as_bytes()).await.map_err(io)?;
        self.file.write_all(b"\n").await.map_err(io)?;
        self.file.flush().await.map_err(io)?;
        Ok(())
    }
}

/// Stdout sink for demos and ad-hoc inspection.
pub struct StdoutSink {
    out: Stdout,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self {
            out: tokio::io::stdout(),
        }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Sink for StdoutSink {
    async fn write_line(&mut self, line: &str) -> Result<()> {
        let io = |e: std::io::Error| Error::SinkUnavailable(format!("stdout: {e}"));
        self.out.write_all(line.as_bytes()).await.map_err(io)?;
        self.out.write_all(b"\n").await.map_err(io)?;
        self.out.flush().await.map_err(io)?;
        Ok(())
    }
}

/// In-memory sink with a cloneable read handle.
///
/// Clones share the same buffer: hand one clone to the dispatcher and keep
/// another to inspect what was written. Used by the integration tests and
/// useful to embedders capturing lines in-process.
#[derive(Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Sink for MemorySink {
    async fn write_line(&mut self, line: &str) -> Result<()> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
        Ok(())
    }
}
