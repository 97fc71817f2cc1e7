//! Pipeline state store for the highlight generation workflow.
//!
//! This crate provides:
//! - [`PipelineStore`], the sole mutator of a session's pipeline state
//! - the [`HighlightService`] seam the store issues remote calls through
//! - an in-memory blob registry backing local download URLs
//! - structured session logging

pub mod blobs;
pub mod error;
pub mod logging;
pub mod service;
pub mod source;
pub mod store;

pub use blobs::BlobRegistry;
pub use error::{PipelineError, PipelineResult};
pub use logging::SessionLogger;
pub use service::HighlightService;
pub use source::load_video_file;
pub use store::{PipelineStore, SkipReason, Transition, ViewAction};
