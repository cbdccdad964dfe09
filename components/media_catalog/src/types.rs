use serde::{Deserialize, Serialize};

/// A track as the catalog describes it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub artists: Vec<String>,
    pub album: String,
    pub cover_image: String,
    pub external_url: String,
    /// Unique content URI, e.g. `spotify:track:...`
    pub uri: String,
}

impl Track {
    /// Artists joined for display
    pub fn artist_line(&self) -> String {
        self.artists.join(", ")
    }

    /// Whether `needle` (already lower-cased) occurs in the name, an artist or the album
    pub(crate) fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self
                .artists
                .iter()
                .any(|artist| artist.to_lowercase().contains(needle))
            || self.album.to_lowercase().contains(needle)
    }
}
