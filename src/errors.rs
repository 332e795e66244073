use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for configuration, input, and output failures.
///
/// Cell-level problems (bad dates, unknown stages, stray failure modes) are
/// coerced during normalization and never surface here.
#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("tracker '{path}' is malformed: {reason}")]
    MalformedInput { path: PathBuf, reason: String },
    #[error("failed writing '{path}': {reason}")]
    Output { path: PathBuf, reason: String },
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}
