//! Highlight service HTTP client.

use hlgen_models::{DownloadOutcome, GenerateRequest, ProcessResponse, ProcessResult, VideoFile};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::resolver;
use crate::response::BufferedResponse;

/// Multipart field carrying the source video.
pub const VIDEO_FIELD: &str = "video";
/// Multipart field carrying the avatar service API key.
pub const API_KEY_FIELD: &str = "heygenApiKey";
/// Multipart field carrying the avatar identifier.
pub const AVATAR_ID_FIELD: &str = "avatarId";

/// Client for the process and generate endpoints.
#[derive(Debug, Clone)]
pub struct HighlightClient {
    http: Client,
    config: ClientConfig,
}

impl HighlightClient {
    /// Create a new client.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ClientError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClientConfig::from_env())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Upload the source video and get a reference to the highlight spreadsheet.
    pub async fn process(&self, file: &VideoFile) -> ClientResult<ProcessResult> {
        let url = &self.config.process_url;
        info!(
            file = %file.name(),
            size = file.size(),
            "Sending video to process endpoint {}",
            url
        );

        let response = self
            .http
            .post(url)
            .multipart(self.process_form(file)?)
            .send()
            .await?;

        debug!("Process endpoint responded with {}", response.status());

        if !response.status().is_success() {
            let (status, detail) = failure_detail(response).await;
            warn!("Process endpoint returned {}: {}", status, detail);
            return Err(ClientError::http(
                status,
                format!("Failed to process video: {}", detail),
            ));
        }

        let body = response.bytes().await?;
        let parsed: ProcessResponse = serde_json::from_slice(&body).map_err(|e| {
            ClientError::invalid_response(format!("malformed process response: {}", e))
        })?;

        if let Some(message) = parsed.message.as_deref() {
            debug!("Process endpoint message: {}", message);
        }
        info!(spreadsheet_id = %parsed.spreadsheet_id, "Video processed");

        Ok(parsed.into())
    }

    /// Request final video generation from the edited spreadsheet.
    pub async fn generate(&self, result: &ProcessResult) -> ClientResult<DownloadOutcome> {
        let url = &self.config.generate_url;
        info!(
            spreadsheet_id = %result.spreadsheet_id,
            "Requesting video generation from {}",
            url
        );

        let response = self
            .http
            .post(url)
            .json(&GenerateRequest::from(result))
            .send()
            .await?;

        debug!(
            status = %response.status(),
            content_type = ?response.headers().get(reqwest::header::CONTENT_TYPE),
            "Generate endpoint responded"
        );

        if !response.status().is_success() {
            let (status, detail) = failure_detail(response).await;
            warn!("Generate endpoint returned {}: {}", status, detail);
            return Err(ClientError::http(
                status,
                format!("Server error: {} - {}", status, detail),
            ));
        }

        let buffered = BufferedResponse::from_response(response).await?;
        debug!("Generate response body is {} bytes", buffered.body_len());

        let outcome = resolver::resolve(&buffered)?;
        info!(local = outcome.is_local(), "Generated video resolved");

        Ok(outcome)
    }

    fn process_form(&self, file: &VideoFile) -> ClientResult<Form> {
        let part = Part::bytes(file.data().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.media_type())?;

        let mut form = Form::new().part(VIDEO_FIELD, part);

        let credentials = &self.config.credentials;
        if let Some(api_key) = &credentials.api_key {
            form = form.text(API_KEY_FIELD, api_key.clone());
        }
        if let Some(avatar_id) = &credentials.avatar_id {
            form = form.text(AVATAR_ID_FIELD, avatar_id.clone());
        }

        Ok(form)
    }
}

/// Status code and human-readable detail of a failed response.
///
/// Prefers the body text; falls back to the status phrase when the body is
/// empty or unreadable.
async fn failure_detail(response: Response) -> (u16, String) {
    let status = response.status();
    let phrase = status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string());

    let detail = match response.text().await {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => phrase,
        Err(e) => {
            debug!("Could not read failure body: {}", e);
            phrase
        }
    };

    (status.as_u16(), detail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = ClientConfig::default().with_endpoints("not-a-url", "http://localhost/gen");
        assert!(matches!(HighlightClient::new(config), Err(ClientError::Config(_))));
    }

    #[test]
    fn test_process_form_builds() {
        let client = HighlightClient::new(ClientConfig::default()).unwrap();
        let file = VideoFile::new("talk.mp4", "video/mp4", vec![0u8; 8]);
        assert!(client.process_form(&file).is_ok());
    }
}
