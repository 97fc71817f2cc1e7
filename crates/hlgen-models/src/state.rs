//! Pipeline state aggregate.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{PipelineStage, ProcessResult, VideoFile};

/// Unique identifier for one user session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generate a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The single source of truth for one session's pipeline.
///
/// `Default` is the initial literal: stage `Upload`, everything else
/// absent or false.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PipelineState {
    pub stage: PipelineStage,
    pub selected_file: Option<VideoFile>,
    pub is_processing: bool,
    pub is_generating: bool,
    pub error: Option<String>,
    pub process_result: Option<ProcessResult>,
    pub download_url: Option<String>,
}

impl PipelineState {
    pub fn initial() -> Self {
        Self::default()
    }

    pub fn is_initial(&self) -> bool {
        *self == Self::initial()
    }

    /// Whether any remote call is in flight.
    pub fn is_busy(&self) -> bool {
        self.is_processing || self.is_generating
    }

    /// List every aggregate invariant the state currently breaks.
    ///
    /// Empty for any state reachable through the store's transitions.
    pub fn invariant_violations(&self) -> Vec<&'static str> {
        let mut violations = Vec::new();

        if self.download_url.is_some() != (self.stage == PipelineStage::Complete) {
            violations.push("download_url must be set exactly at Complete");
        }

        let expects_result = matches!(
            self.stage,
            PipelineStage::Editing | PipelineStage::Generating | PipelineStage::Complete
        );
        if self.process_result.is_some() != expects_result {
            violations.push("process_result must be set exactly at Editing, Generating and Complete");
        }

        if self.is_processing && self.is_generating {
            violations.push("at most one busy flag may be set");
        }

        if self.error.is_some() && self.is_busy() {
            violations.push("error implies no call in flight");
        }

        if self.is_busy() && !self.stage.is_busy_stage() {
            violations.push("a call is only in flight at Processing or Generating");
        }

        violations
    }
}

/// Read-only projection of the state handed to the view layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PipelineView {
    pub stage: PipelineStage,
    pub is_processing: bool,
    pub is_generating: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spreadsheet_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl From<&PipelineState> for PipelineView {
    fn from(state: &PipelineState) -> Self {
        Self {
            stage: state.stage,
            is_processing: state.is_processing,
            is_generating: state.is_generating,
            error: state.error.clone(),
            spreadsheet_url: state
                .process_result
                .as_ref()
                .map(|r| r.spreadsheet_url.clone()),
            download_url: state.download_url.clone(),
            file_name: state.selected_file.as_ref().map(|f| f.name().to_string()),
        }
    }
}
