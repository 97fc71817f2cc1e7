//! Client for the highlight processing and generation services.
//!
//! Two externally owned endpoints drive the pipeline:
//! - the process endpoint takes a multipart video upload and answers with a
//!   highlight spreadsheet reference
//! - the generate endpoint takes the spreadsheet reference and answers with
//!   the final video, either as a URL or as raw bytes
//!
//! Generate responses are normalized by [`resolver::resolve`].

pub mod client;
pub mod config;
pub mod error;
pub mod resolver;
pub mod response;

pub use client::HighlightClient;
pub use config::{ClientConfig, ProcessCredentials};
pub use error::{ClientError, ClientResult, FailureKind, ResolveError};
pub use resolver::resolve;
pub use response::{BufferedResponse, ResponseSource};
