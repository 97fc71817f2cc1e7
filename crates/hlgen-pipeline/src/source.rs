//! Loading source videos from disk.

use std::path::Path;

use hlgen_models::VideoFile;
use tracing::debug;

use crate::error::PipelineResult;

/// Read a file into a [`VideoFile`] handle, inferring its media type from
/// the extension.
pub async fn load_video_file(path: &Path) -> PipelineResult<VideoFile> {
    let data = tokio::fs::read(path).await?;
    let file = VideoFile::from_path_bytes(path, data);
    debug!(
        file = %file.name(),
        media_type = %file.media_type(),
        size = file.size(),
        "Loaded source file"
    );
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_load_video_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keynote.webm");
        std::fs::write(&path, b"webm bytes").unwrap();

        let file = assert_ok!(load_video_file(&path).await);
        assert_eq!(file.name(), "keynote.webm");
        assert_eq!(file.media_type(), "video/webm");
        assert_eq!(file.size(), 10);
        assert!(file.is_video());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = assert_err!(load_video_file(&dir.path().join("missing.mp4")).await);
        assert!(matches!(err, PipelineError::Io(_)));
    }
}
