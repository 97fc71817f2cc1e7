//! Client error types.

use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

/// Failure classes surfaced to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network failure or non-2xx status
    Transport,
    /// 2xx status but the body could not be interpreted
    MalformedResponse,
    /// Client could not be constructed
    Configuration,
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-2xx status; `message` already carries the endpoint-specific prefix.
    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            ClientError::Http { .. } | ClientError::Network(_) => FailureKind::Transport,
            ClientError::InvalidResponse(_) | ClientError::Resolve(_) => FailureKind::MalformedResponse,
            ClientError::Config(_) => FailureKind::Configuration,
        }
    }

    /// HTTP status of the failed call, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            ClientError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if re-issuing the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Network(_) => true,
            ClientError::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Failure to turn a successful generate response into a download URL.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("No video URL found in response")]
    MissingUrlField,

    #[error("Empty response body")]
    EmptyBody,

    #[error("Malformed JSON response: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("Unreadable response body: {0}")]
    Unreadable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display_is_message() {
        let err = ClientError::http(502, "Server error: 502 - upstream down");
        assert_eq!(err.to_string(), "Server error: 502 - upstream down");
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.kind(), FailureKind::Transport);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_client_errors_are_not_retryable() {
        let err = ClientError::http(400, "Failed to process video: bad file");
        assert!(!err.is_retryable());

        let err = ClientError::from(ResolveError::MissingUrlField);
        assert_eq!(err.to_string(), "No video URL found in response");
        assert_eq!(err.kind(), FailureKind::MalformedResponse);
        assert!(!err.is_retryable());
    }
}
