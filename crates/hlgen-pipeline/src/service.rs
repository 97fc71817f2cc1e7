//! Remote service seam used by the store.

use async_trait::async_trait;
use hlgen_client::{ClientResult, HighlightClient};
use hlgen_models::{DownloadOutcome, ProcessResult, VideoFile};

/// The two remote calls the pipeline depends on.
///
/// Implemented by [`HighlightClient`]; tests substitute scripted fakes.
#[async_trait]
pub trait HighlightService: Send + Sync {
    /// Upload the source video; yields the highlight spreadsheet reference.
    async fn process(&self, file: &VideoFile) -> ClientResult<ProcessResult>;

    /// Generate the final video; yields a normalized download outcome.
    async fn generate(&self, result: &ProcessResult) -> ClientResult<DownloadOutcome>;
}

#[async_trait]
impl HighlightService for HighlightClient {
    async fn process(&self, file: &VideoFile) -> ClientResult<ProcessResult> {
        HighlightClient::process(self, file).await
    }

    async fn generate(&self, result: &ProcessResult) -> ClientResult<DownloadOutcome> {
        HighlightClient::generate(self, result).await
    }
}
