// components/media_downloader/src/types.rs
use async_trait::async_trait;
use media_catalog::Track;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Another download is already in progress")]
    Busy,

    #[error("Invalid track: {0}")]
    InvalidTrack(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Could not write audio: {0}")]
    Encoding(#[from] hound::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Produces the audio file for a track
#[async_trait]
pub trait Fetcher {
    /// Write the audio for `track` to `output`
    async fn fetch(&self, track: &Track, output: &Path) -> Result<(), DownloadError>;
}
