use std::io;

use thiserror::Error;

use crate::stream::{framing::FrameError, queue::QueueError};

/// Unified stream error covering I/O, framing, queue hand-off, workers, and validation.
/// - `From<T>` impls enable `?` across the pipeline.
/// - `Io` always names the path or stage that failed.
#[derive(Debug, Error)]
pub enum StreamError {
    /// I/O error with the path or pipeline stage it happened in.
    #[error("I/O error ({context}): {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Frame-level error (validation or parse).
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// Work queue misuse or a poisoned queue lock.
    #[error("queue error: {0}")]
    Queue(#[from] QueueError),

    /// A compression worker failed; carries the worker id.
    #[error("worker {worker} failed: {source}")]
    Worker {
        worker: usize,
        #[source]
        source: Box<StreamError>,
    },

    /// Pipeline wiring error (poisoned lock, panicked thread, ordering gap).
    #[error("pipeline error: {0}")]
    PipelineError(&'static str),

    /// Generic high-level validation with a descriptive message.
    #[error("validation error: {0}")]
    Validation(String),
}

impl StreamError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        StreamError::Io {
            context: context.into(),
            source,
        }
    }

    /// Innermost error, looking through `Worker` wrappers.
    pub fn root(&self) -> &StreamError {
        match self {
            StreamError::Worker { source, .. } => source.root(),
            other => other,
        }
    }
}

impl From<io::Error> for StreamError {
    fn from(e: io::Error) -> Self {
        StreamError::io("stream", e)
    }
}

/// Attach a path or stage to an `io::Result`.
pub trait IoResultExt<T> {
    fn io_context<C, F>(self, f: F) -> Result<T, StreamError>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn io_context<C, F>(self, f: F) -> Result<T, StreamError>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|e| StreamError::io(f(), e))
    }
}
