//! Wire types for the process and generate endpoints.
//!
//! Field names follow the remote services' camelCase JSON.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Success body of the process endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    /// Informational message from the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Identifier of the generated highlight spreadsheet
    pub spreadsheet_id: String,
    /// Editable URL of the highlight spreadsheet
    pub spreadsheet_url: String,
}

/// Output of the process call, required input to the generate call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResult {
    pub spreadsheet_id: String,
    pub spreadsheet_url: String,
}

impl ProcessResult {
    pub fn new(spreadsheet_id: impl Into<String>, spreadsheet_url: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            spreadsheet_url: spreadsheet_url.into(),
        }
    }
}

impl From<ProcessResponse> for ProcessResult {
    fn from(response: ProcessResponse) -> Self {
        Self {
            spreadsheet_id: response.spreadsheet_id,
            spreadsheet_url: response.spreadsheet_url,
        }
    }
}

/// JSON body of the generate endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub spreadsheet_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spreadsheet_url: Option<String>,
}

impl From<&ProcessResult> for GenerateRequest {
    fn from(result: &ProcessResult) -> Self {
        Self {
            spreadsheet_id: result.spreadsheet_id.clone(),
            spreadsheet_url: Some(result.spreadsheet_url.clone()),
        }
    }
}
