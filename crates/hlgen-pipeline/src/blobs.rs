//! In-memory registry backing `blob:` download URLs.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use hlgen_models::VideoBlob;
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};

/// Holds the payloads of local-blob outcomes until the session resets.
#[derive(Debug, Default)]
pub struct BlobRegistry {
    blobs: Mutex<HashMap<String, VideoBlob>>,
}

impl BlobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, VideoBlob>> {
        // A panic while holding the lock leaves the map itself intact.
        self.blobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a blob and return its URL.
    pub fn register(&self, blob: VideoBlob) -> String {
        let url = blob.url().to_string();
        debug!(url = %url, size = blob.len(), "Registering video blob");
        self.lock().insert(url.clone(), blob);
        url
    }

    pub fn get(&self, url: &str) -> Option<VideoBlob> {
        self.lock().get(url).cloned()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.lock().contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every registered blob. Returns how many were released.
    pub fn revoke_all(&self) -> usize {
        let mut blobs = self.lock();
        let count = blobs.len();
        blobs.clear();
        if count > 0 {
            debug!("Revoked {} video blob(s)", count);
        }
        count
    }

    /// Write a registered blob to `path`.
    pub async fn save_to(&self, url: &str, path: &Path) -> PipelineResult<usize> {
        let blob = self
            .get(url)
            .ok_or_else(|| PipelineError::UnknownBlob(url.to_string()))?;
        tokio::fs::write(path, blob.data()).await?;
        Ok(blob.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn blob(url: &str) -> VideoBlob {
        VideoBlob::new(url, "video/mp4", Bytes::from_static(b"video"))
    }

    #[test]
    fn test_register_and_revoke() {
        let registry = BlobRegistry::new();
        let url = registry.register(blob("blob:hlgen/a"));
        assert_eq!(url, "blob:hlgen/a");
        assert!(registry.contains(&url));
        assert_eq!(registry.get(&url).unwrap().len(), 5);

        assert_eq!(registry.revoke_all(), 1);
        assert!(registry.is_empty());
        assert!(registry.get(&url).is_none());
    }

    #[tokio::test]
    async fn test_save_to_file() {
        let registry = BlobRegistry::new();
        let url = registry.register(blob("blob:hlgen/b"));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");
        let written = registry.save_to(&url, &path).await.unwrap();

        assert_eq!(written, 5);
        assert_eq!(std::fs::read(&path).unwrap(), b"video");
    }

    #[tokio::test]
    async fn test_save_unknown_blob() {
        let registry = BlobRegistry::new();
        let dir = tempfile::tempdir().unwrap();
        let err = registry
            .save_to("blob:hlgen/missing", &dir.path().join("x.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::UnknownBlob(_)));
    }
}
