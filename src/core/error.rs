//! Error types shared by the renderers, the frame pipeline, and the encoders.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unrecognized parameter path: `{0}` (expected one of: Angor, Exp, Wabbit)")]
    InvalidPathName(String),

    #[error("Frame count must be at least one, got {0}")]
    InvalidFrameCount(usize),

    #[error("Worker count must be at least one, got {0}")]
    InvalidWorkerCount(usize),

    #[error("Rendering frame {index} panicked: {message}")]
    RenderPanic { index: usize, message: String },

    #[error("A frame worker terminated outside of job isolation")]
    WorkerPanic,

    #[error("Job queue closed before all {0} frames were enqueued")]
    JobQueueClosed(usize),

    #[error("Result channel closed after {received} of {expected} frames")]
    ResultChannelClosed { received: usize, expected: usize },

    #[error("No result was collected for frame {0}")]
    MissingFrame(usize),

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding failure: {0}")]
    Image(#[from] image::ImageError),

    #[error("Parameter serialization failure: {0}")]
    Json(#[from] serde_json::Error),
}
