//! Error types at the library boundary

use thiserror::Error;

/// Errors surfaced to callers of the follow-up pipeline
///
/// Everything else (generation failure, too few candidates, exhausted
/// fallback pools) is absorbed inside the pipeline.
#[derive(Error, Debug)]
pub enum FollowupError {
    #[error("Invalid profile shape: {0}")]
    InvalidProfileShape(String),
}

/// Failure of the external text-generation oracle
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Generation timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Generator unavailable: {0}")]
    Unavailable(String),
}
