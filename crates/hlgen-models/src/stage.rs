//! Pipeline stage definitions.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the five ordered phases a session passes through.
///
/// Variants are declared in pipeline order, so the derived `Ord` matches
/// the progress indicator ordering.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Waiting for the user to pick a source video
    #[default]
    Upload,
    /// Source video is being uploaded and analysed
    Processing,
    /// Highlight spreadsheet is ready for editing
    Editing,
    /// Final video is being generated
    Generating,
    /// Final video is downloadable
    Complete,
}

impl PipelineStage {
    /// All stages in pipeline order.
    pub const ALL: [PipelineStage; 5] = [
        PipelineStage::Upload,
        PipelineStage::Processing,
        PipelineStage::Editing,
        PipelineStage::Generating,
        PipelineStage::Complete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Upload => "upload",
            PipelineStage::Processing => "processing",
            PipelineStage::Editing => "editing",
            PipelineStage::Generating => "generating",
            PipelineStage::Complete => "complete",
        }
    }

    /// Human-readable step label for the progress indicator.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineStage::Upload => "Upload",
            PipelineStage::Processing => "Processing",
            PipelineStage::Editing => "Editing",
            PipelineStage::Generating => "Generating",
            PipelineStage::Complete => "Complete",
        }
    }

    /// Zero-based position in the pipeline.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Whether a remote call is associated with this stage.
    pub fn is_busy_stage(&self) -> bool {
        matches!(self, PipelineStage::Processing | PipelineStage::Generating)
    }

    /// Spinner text shown while this stage's remote call is in flight.
    pub fn busy_message(&self) -> Option<&'static str> {
        match self {
            PipelineStage::Processing => Some("Processing your video..."),
            PipelineStage::Generating => Some("Generating final video..."),
            _ => None,
        }
    }

    /// Status of `step` relative to this (current) stage.
    pub fn step_status(&self, step: PipelineStage) -> StepStatus {
        match step.cmp(self) {
            std::cmp::Ordering::Less => StepStatus::Done,
            std::cmp::Ordering::Equal => StepStatus::Active,
            std::cmp::Ordering::Greater => StepStatus::Pending,
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown pipeline stage: {0}")]
pub struct StageParseError(pub String);

impl FromStr for PipelineStage {
    type Err = StageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PipelineStage::ALL
            .into_iter()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| StageParseError(s.to_string()))
    }
}

/// Rendering status of one step in the progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Active,
    Done,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_ordering_matches_all() {
        for (i, stage) in PipelineStage::ALL.iter().enumerate() {
            assert_eq!(stage.index(), i);
        }
        assert!(PipelineStage::Upload < PipelineStage::Processing);
        assert!(PipelineStage::Generating < PipelineStage::Complete);
    }

    #[test]
    fn test_step_status() {
        let current = PipelineStage::Editing;
        assert_eq!(current.step_status(PipelineStage::Upload), StepStatus::Done);
        assert_eq!(current.step_status(PipelineStage::Processing), StepStatus::Done);
        assert_eq!(current.step_status(PipelineStage::Editing), StepStatus::Active);
        assert_eq!(current.step_status(PipelineStage::Complete), StepStatus::Pending);
    }

    #[test]
    fn test_stage_parse() {
        assert_eq!("Generating".parse::<PipelineStage>(), Ok(PipelineStage::Generating));
        assert!("rendering".parse::<PipelineStage>().is_err());
    }

    #[test]
    fn test_stage_serde() {
        let json = serde_json::to_string(&PipelineStage::Complete).unwrap();
        assert_eq!(json, "\"complete\"");
    }

    #[test]
    fn test_busy_message() {
        assert_eq!(PipelineStage::Processing.busy_message(), Some("Processing your video..."));
        assert_eq!(PipelineStage::Editing.busy_message(), None);
    }

    #[test]
    fn test_busy_stages() {
        let busy: Vec<_> = PipelineStage::ALL.into_iter().filter(|s| s.is_busy_stage()).collect();
        assert_eq!(busy, vec![PipelineStage::Processing, PipelineStage::Generating]);
    }
}
