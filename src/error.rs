use thiserror::Error;

use crate::wav::FormatError;

/// Jackdaw's crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Jackdaw's crate-wide error type.
///
/// The variants mirror the failure boundaries of a run:
/// - `Format`, `Extraction`, `Recognition`, and `Io` can all occur while
///   processing a single chunk. The orchestrator catches them there, reports
///   them inline, and moves on to the next window.
/// - `Setup` occurs before the chunk loop (duration probe, recognizer
///   initialization, output sink) and aborts the whole run.
#[derive(Debug, Error)]
pub enum Error {
    /// The extracted audio container was malformed or unsupported.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The external extraction call failed for one window.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// The recognizer call failed or returned an unusable result.
    #[error("recognition failed: {0}")]
    Recognition(String),

    /// A setup-phase failure. Fatal to the run, unlike everything above.
    #[error("{0}")]
    Setup(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn setup(message: impl Into<String>) -> Self {
        Self::Setup(message.into())
    }

    /// Whether this error should abort the whole run rather than a single chunk.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Setup(_))
    }
}
