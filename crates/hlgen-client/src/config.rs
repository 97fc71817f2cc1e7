//! Client configuration.

use std::time::Duration;

use crate::error::{ClientError, ClientResult};

const DEFAULT_PROCESS_URL: &str = "http://localhost:5678/webhook/process";
const DEFAULT_GENERATE_URL: &str = "http://localhost:5678/webhook/generate";

/// Optional credentials forwarded to the process endpoint.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ProcessCredentials {
    /// Avatar service API key
    pub api_key: Option<String>,
    /// Avatar identifier; the service picks a default when absent
    pub avatar_id: Option<String>,
}

impl ProcessCredentials {
    pub fn from_env() -> Self {
        Self {
            api_key: non_empty_env("HLGEN_API_KEY"),
            avatar_id: non_empty_env("HLGEN_AVATAR_ID"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.api_key.is_none() && self.avatar_id.is_none()
    }
}

impl std::fmt::Debug for ProcessCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessCredentials")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("avatar_id", &self.avatar_id)
            .finish()
    }
}

/// Configuration for the highlight service client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Process endpoint (multipart upload)
    pub process_url: String,
    /// Generate endpoint (JSON request)
    pub generate_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Credentials forwarded on the process call
    pub credentials: ProcessCredentials,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            process_url: DEFAULT_PROCESS_URL.to_string(),
            generate_url: DEFAULT_GENERATE_URL.to_string(),
            timeout: Duration::from_secs(600), // uploads and renders are slow
            credentials: ProcessCredentials::default(),
        }
    }
}

impl ClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            process_url: std::env::var("HLGEN_PROCESS_URL")
                .unwrap_or_else(|_| DEFAULT_PROCESS_URL.to_string()),
            generate_url: std::env::var("HLGEN_GENERATE_URL")
                .unwrap_or_else(|_| DEFAULT_GENERATE_URL.to_string()),
            timeout: Duration::from_secs(
                std::env::var("HLGEN_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(600),
            ),
            credentials: ProcessCredentials::from_env(),
        }
    }

    /// Point both endpoints at explicit URLs.
    pub fn with_endpoints(mut self, process_url: impl Into<String>, generate_url: impl Into<String>) -> Self {
        self.process_url = process_url.into();
        self.generate_url = generate_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_credentials(mut self, credentials: ProcessCredentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn validate(&self) -> ClientResult<()> {
        for (name, url) in [("process", &self.process_url), ("generate", &self.generate_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ClientError::config(format!(
                    "{} endpoint must be an http(s) URL, got '{}'",
                    name, url
                )));
            }
        }
        if self.timeout.is_zero() {
            return Err(ClientError::config("timeout must be greater than zero"));
        }
        Ok(())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
