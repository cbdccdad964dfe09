// components/media_downloader/src/lib.rs
mod fetch;
mod types;
mod utils;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use media_catalog::Track;
use playback_primitives::{DownloadedSong, SongId};
use tokio::sync::Mutex;

pub use fetch::PlaceholderFetcher;
pub use types::{DownloadError, Fetcher};
use utils::generate_filename;

pub struct MediaDownloader {
    songs_path: PathBuf,
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    // Held for the duration of a download; only one may run at a time
    in_flight: Mutex<()>,
}

impl MediaDownloader {
    /// Create a downloader storing songs under `library_root/songs`
    pub async fn new(library_root: impl AsRef<Path>) -> Result<Self, DownloadError> {
        Self::new_with_fetcher(library_root, Arc::new(PlaceholderFetcher::default())).await
    }

    /// Create a MediaDownloader with a specific fetcher implementation
    pub async fn new_with_fetcher(
        library_root: impl AsRef<Path>,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
    ) -> Result<Self, DownloadError> {
        let songs_path = library_root.as_ref().join("songs");

        // Create directories if they don't exist
        tokio::fs::create_dir_all(&songs_path).await?;

        Ok(Self {
            songs_path,
            fetcher,
            in_flight: Mutex::new(()),
        })
    }

    pub fn songs_path(&self) -> &Path {
        &self.songs_path
    }

    /// Download a track, returning the record of the local copy.
    ///
    /// Fails with [`DownloadError::Busy`] instead of queueing when another
    /// download is still running.
    pub async fn download(&self, track: &Track) -> Result<DownloadedSong, DownloadError> {
        let _in_flight = self.in_flight.try_lock().map_err(|_| DownloadError::Busy)?;

        if track.uri.trim().is_empty() {
            return Err(DownloadError::InvalidTrack(format!(
                "{:?} has no content uri",
                track.name
            )));
        }

        let downloaded_at = Utc::now();
        let timestamp = downloaded_at.timestamp_millis();
        let file_path = self
            .songs_path
            .join(generate_filename(&track.name, timestamp));

        self.fetcher.fetch(track, &file_path).await?;
        tracing::info!("Downloaded {:?} to {}", track.name, file_path.display());

        Ok(DownloadedSong {
            id: SongId::for_download(&track.uri, timestamp),
            title: track.name.clone(),
            artist: track.artist_line(),
            album: track.album.clone(),
            cover_image: track.cover_image.clone(),
            file_path,
            download_date: downloaded_at,
        })
    }
}
