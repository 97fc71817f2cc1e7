//! Generate-response resolution.
//!
//! The generation service is inconsistent about how it answers: sometimes
//! a JSON envelope holding a remote URL, sometimes the rendered video
//! bytes, and sometimes a JSON envelope delivered with a binary framing.
//! [`resolve`] folds all three into a single [`DownloadOutcome`] without
//! trusting the `Content-Type` header alone.

use bytes::Bytes;
use hlgen_models::{DownloadOutcome, VideoBlob, BLOB_URL_PREFIX};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::ResolveError;
use crate::response::{is_json_media_type, media_type_essence, ResponseSource};

/// JSON fields that may carry the download URL, highest priority first.
pub const URL_FIELDS: [&str; 3] = ["downloadUrl", "videoUrl", "url"];

const FALLBACK_BLOB_TYPE: &str = "application/octet-stream";

/// Classify a successful generate response and extract a download URL.
///
/// The function is pure: the same response always yields the same
/// outcome, including the `blob:` URL of a local payload, which is derived
/// from the payload's content hash.
pub fn resolve<R>(response: &R) -> Result<DownloadOutcome, ResolveError>
where
    R: ResponseSource + ?Sized,
{
    // Text path. A read failure or a non-object prefix defers to the binary path.
    if let Ok(text) = response.text() {
        let trimmed = text.trim();
        if trimmed.starts_with('{') {
            match serde_json::from_str::<Value>(trimmed) {
                Ok(value) => return extract_url(&value).map(DownloadOutcome::remote),
                Err(e) => debug!("Generate response is not valid JSON, treating as binary: {}", e),
            }
        }
    }

    let data = response.bytes()?;
    if data.iter().all(u8::is_ascii_whitespace) {
        return Err(ResolveError::EmptyBody);
    }

    let declared = response.content_type().unwrap_or_default();
    if is_json_media_type(declared) {
        debug!("Binary payload declared as JSON, parsing envelope");
        let text = String::from_utf8_lossy(&data);
        let value: Value = serde_json::from_str(text.trim())?;
        return extract_url(&value).map(DownloadOutcome::remote);
    }

    let media_type = match media_type_essence(declared) {
        essence if essence.is_empty() => FALLBACK_BLOB_TYPE.to_string(),
        essence => essence,
    };
    debug!(
        media_type = %media_type,
        size = data.len(),
        "Treating generate response as video payload"
    );

    Ok(DownloadOutcome::LocalBlob(VideoBlob::new(
        blob_url(&data),
        media_type,
        data,
    )))
}

/// Pick the first non-empty string among [`URL_FIELDS`].
pub fn extract_url(value: &Value) -> Result<String, ResolveError> {
    URL_FIELDS
        .iter()
        .filter_map(|field| value.get(field).and_then(Value::as_str))
        .map(str::trim)
        .find(|url| !url.is_empty())
        .map(str::to_string)
        .ok_or(ResolveError::MissingUrlField)
}

/// Content-addressed `blob:` URL for an in-memory payload.
pub fn blob_url(data: &Bytes) -> String {
    let digest = Sha256::digest(data);
    format!("{}{:x}", BLOB_URL_PREFIX, digest)
}
