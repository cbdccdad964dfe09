use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Identifies one download event. Downloading the same catalog track twice
/// yields two distinct ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(String);

impl SongId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id for a track downloaded at `timestamp_ms`
    pub fn for_download(uri: &str, timestamp_ms: i64) -> Self {
        Self(format!("{uri}-{timestamp_ms}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SongId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A locally stored, playable song
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadedSong {
    pub id: SongId,
    pub title: String,
    /// Artists flattened into one display string
    pub artist: String,
    pub album: String,
    pub cover_image: String,
    pub file_path: PathBuf,
    pub download_date: DateTime<Utc>,
}

impl fmt::Display for DownloadedSong {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.artist, self.title)
    }
}

/// Which neighbour to move to in a playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Next,
    Previous,
}

impl Direction {
    /// Index of the neighbour of `index` in a circular list of `len` entries.
    /// Previous is computed as `+ len - 1` so it never goes negative.
    pub fn step(self, index: usize, len: usize) -> Option<usize> {
        if len == 0 || index >= len {
            return None;
        }
        Some(match self {
            Direction::Next => (index + 1) % len,
            Direction::Previous => (index + len - 1) % len,
        })
    }
}
