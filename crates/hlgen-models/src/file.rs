//! Source video file handle.

use std::fmt;
use std::path::Path;

use bytes::Bytes;

/// Fallback media type for files with no recognised extension.
pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// An opaque handle to a user-selected file.
///
/// The bytes are reference counted, so cloning the handle (for example to
/// keep it around for a retry) does not copy the payload.
#[derive(Clone, PartialEq, Eq)]
pub struct VideoFile {
    name: String,
    media_type: String,
    data: Bytes,
}

impl VideoFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            data: data.into(),
        }
    }

    /// Build a handle for a file at `path`, inferring the media type from
    /// its extension.
    pub fn from_path_bytes(path: &Path, data: impl Into<Bytes>) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".to_string());
        Self::new(name, media_type_for_path(path), data)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Whether the declared media type is a video type.
    pub fn is_video(&self) -> bool {
        self.media_type.to_ascii_lowercase().starts_with("video/")
    }
}

impl fmt::Debug for VideoFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoFile")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("size", &self.data.len())
            .finish()
    }
}

/// Guess a media type from a file extension.
pub fn media_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("mp4") | Some("m4v") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("avi") => "video/x-msvideo",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("json") => "application/json",
        Some("txt") => "text/plain",
        _ => DEFAULT_MEDIA_TYPE,
    }
}
