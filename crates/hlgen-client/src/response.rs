//! Response abstraction consumed by the resolver.
//!
//! The resolver never sees a concrete HTTP client type, so it can be fed
//! hand-built responses in tests.

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;

use crate::error::{ClientResult, ResolveError};

/// A completed HTTP response whose body may be read more than once.
pub trait ResponseSource {
    /// HTTP status code.
    fn status(&self) -> u16;

    /// Declared `Content-Type` header, verbatim.
    fn content_type(&self) -> Option<&str>;

    /// Body decoded as text.
    fn text(&self) -> Result<String, ResolveError>;

    /// Body as raw bytes.
    fn bytes(&self) -> Result<Bytes, ResolveError>;

    fn is_success(&self) -> bool {
        (200..300).contains(&self.status())
    }
}

/// A fully buffered response.
///
/// Buffering once up front is what allows the text and binary readers to
/// both see the whole body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferedResponse {
    status: u16,
    content_type: Option<String>,
    body: Bytes,
}

impl BufferedResponse {
    pub fn new(status: u16, content_type: Option<&str>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    /// Drain a reqwest response into memory.
    pub async fn from_response(response: reqwest::Response) -> ClientResult<Self> {
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;

        Ok(Self {
            status,
            content_type,
            body,
        })
    }

    pub fn body_len(&self) -> usize {
        self.body.len()
    }
}

impl ResponseSource for BufferedResponse {
    fn status(&self) -> u16 {
        self.status
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    fn text(&self) -> Result<String, ResolveError> {
        Ok(String::from_utf8_lossy(&self.body).into_owned())
    }

    fn bytes(&self) -> Result<Bytes, ResolveError> {
        Ok(self.body.clone())
    }
}

/// Media type without parameters, lowercased (`"Video/MP4; codecs=x"` -> `"video/mp4"`).
pub fn media_type_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Whether a declared media type denotes JSON.
pub fn is_json_media_type(content_type: &str) -> bool {
    let essence = media_type_essence(content_type);
    essence == "application/json" || essence.ends_with("+json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffered_response_reads_twice() {
        let response = BufferedResponse::new(200, Some("video/mp4"), &b"abc"[..]);
        assert_eq!(response.text().unwrap(), "abc");
        assert_eq!(response.bytes().unwrap(), Bytes::from_static(b"abc"));
        assert_eq!(response.text().unwrap(), "abc");
        assert!(response.is_success());
    }

    #[test]
    fn test_media_type_helpers() {
        assert_eq!(media_type_essence("Video/MP4; codecs=avc1"), "video/mp4");
        assert!(is_json_media_type("application/json; charset=utf-8"));
        assert!(is_json_media_type("application/problem+json"));
        assert!(!is_json_media_type("video/mp4"));
        assert!(!is_json_media_type(""));
    }
}
