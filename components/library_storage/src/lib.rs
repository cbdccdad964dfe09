//! Downloaded song list for MDMA
//!
//! Songs are kept as a single JSON array on disk, which is all the
//! persistence the library needs:
//!
//! ```no_run
//! # async fn demo() -> library_storage::Result<()> {
//! use library_storage::SongStore;
//!
//! let store = SongStore::in_library("/music");
//! for song in store.list_downloaded().await? {
//!     println!("{}", song);
//! }
//! # Ok(())
//! # }
//! ```

mod error;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use playback_primitives::{DownloadedSong, SongId};
use tokio::sync::Mutex;

pub use error::{Result, StorageError};

/// Name of the song list inside a library directory
pub const SONG_LIST_FILE: &str = "downloaded_songs.json";

pub struct SongStore {
    path: PathBuf,
    // Serializes read-modify-write cycles
    lock: Mutex<()>,
}

impl SongStore {
    /// Use the song list at `path`; it is created on first save
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Use the song list inside a library directory
    pub fn in_library(library_root: impl AsRef<Path>) -> Self {
        Self::open(library_root.as_ref().join(SONG_LIST_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every downloaded song, oldest first. A missing list is empty.
    pub async fn list_downloaded(&self) -> Result<Vec<DownloadedSong>> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    pub async fn get(&self, id: &SongId) -> Result<Option<DownloadedSong>> {
        Ok(self
            .list_downloaded()
            .await?
            .into_iter()
            .find(|song| &song.id == id))
    }

    /// Append a song, replacing any entry with the same id
    pub async fn save(&self, song: DownloadedSong) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut songs = self.read().await?;

        match songs.iter_mut().find(|existing| existing.id == song.id) {
            Some(existing) => *existing = song,
            None => songs.push(song),
        }

        self.write(&songs).await
    }

    /// Remove a song from the list and delete its audio file.
    ///
    /// Returns the removed entry, or `None` if no song had that id.
    pub async fn delete(&self, id: &SongId) -> Result<Option<DownloadedSong>> {
        let _guard = self.lock.lock().await;
        let mut songs = self.read().await?;

        let Some(index) = songs.iter().position(|song| &song.id == id) else {
            return Ok(None);
        };
        let removed = songs.remove(index);
        self.write(&songs).await?;

        // The entry is gone either way; a leftover file is only wasted space
        match tokio::fs::remove_file(&removed.file_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                "Could not delete audio file {}: {}",
                removed.file_path.display(),
                e
            ),
        }

        tracing::info!("Deleted {} ({})", removed.id, removed.title);
        Ok(Some(removed))
    }

    async fn read(&self) -> Result<Vec<DownloadedSong>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_slice(&bytes).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    async fn write(&self, songs: &[DownloadedSong]) -> Result<()> {
        let json = serde_json::to_vec_pretty(songs)?;
        let write_error = |source| StorageError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
        }
        // Write next to the target and rename so a crash never leaves half a list
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, json).await.map_err(write_error)?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(write_error)?;

        tracing::debug!("Saved {} songs to {}", songs.len(), self.path.display());
        Ok(())
    }
}
