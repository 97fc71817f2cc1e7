//! Pipeline error types.
//!
//! Remote-call failures never surface here: the store folds them into
//! `PipelineState::error`. These errors cover the local edges around the
//! store (reading the source file, saving the result).

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Not a video file: {0}")]
    NotAVideo(String),

    #[error("No downloadable blob for {0}")]
    UnknownBlob(String),

    #[error("Client error: {0}")]
    Client(#[from] hlgen_client::ClientError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn not_a_video(msg: impl Into<String>) -> Self {
        Self::NotAVideo(msg.into())
    }
}
