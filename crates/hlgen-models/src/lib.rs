//! Shared data models for the highlight generation pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Pipeline stages and the progress indicator
//! - The pipeline state aggregate and its view projection
//! - Process/generate endpoint bodies
//! - Download outcomes of the generate call

pub mod api;
pub mod file;
pub mod outcome;
pub mod stage;
pub mod state;

// Re-export common types
pub use api::{GenerateRequest, ProcessResponse, ProcessResult};
pub use file::{media_type_for_path, VideoFile};
pub use outcome::{is_blob_url, DownloadOutcome, VideoBlob, BLOB_URL_PREFIX, DOWNLOAD_FILE_NAME};
pub use stage::{PipelineStage, StageParseError, StepStatus};
pub use state::{PipelineState, PipelineView, SessionId};
