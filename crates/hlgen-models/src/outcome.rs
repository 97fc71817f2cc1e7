//! Normalized download outcome of the generate call.

use std::fmt;

use bytes::Bytes;

/// URL scheme prefix for in-memory video blobs.
pub const BLOB_URL_PREFIX: &str = "blob:hlgen/";

/// File name suggested to the user when saving the final video.
pub const DOWNLOAD_FILE_NAME: &str = "highlight-video.mp4";

/// A downloadable reference to the final video.
///
/// Both variants expose the same [`DownloadOutcome::url`], so consumers
/// never need to know whether the video arrived as bytes or as a pointer
/// to bytes stored elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The service returned a URL pointing at remote storage
    Remote { url: String },
    /// The service returned the video bytes directly
    LocalBlob(VideoBlob),
}

impl DownloadOutcome {
    pub fn remote(url: impl Into<String>) -> Self {
        Self::Remote { url: url.into() }
    }

    /// URL usable directly as a download target.
    pub fn url(&self) -> &str {
        match self {
            DownloadOutcome::Remote { url } => url,
            DownloadOutcome::LocalBlob(blob) => blob.url(),
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, DownloadOutcome::LocalBlob(_))
    }
}

/// In-memory video payload addressed by a `blob:` URL.
#[derive(Clone, PartialEq, Eq)]
pub struct VideoBlob {
    url: String,
    media_type: String,
    data: Bytes,
}

impl VideoBlob {
    pub fn new(url: impl Into<String>, media_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            url: url.into(),
            media_type: media_type.into(),
            data,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for VideoBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoBlob")
            .field("url", &self.url)
            .field("media_type", &self.media_type)
            .field("size", &self.data.len())
            .finish()
    }
}

/// Whether `url` refers to an in-memory blob rather than a remote location.
pub fn is_blob_url(url: &str) -> bool {
    url.starts_with(BLOB_URL_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_url_is_uniform() {
        let remote = DownloadOutcome::remote("https://cdn/x.mp4");
        assert_eq!(remote.url(), "https://cdn/x.mp4");
        assert!(!remote.is_local());

        let blob = VideoBlob::new("blob:hlgen/abc", "video/mp4", Bytes::from_static(b"\x00\x01"));
        let local = DownloadOutcome::LocalBlob(blob);
        assert_eq!(local.url(), "blob:hlgen/abc");
        assert!(local.is_local());
        assert!(is_blob_url(local.url()));
    }
}
