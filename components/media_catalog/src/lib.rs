mod error;
mod types;

use async_trait::async_trait;
pub use error::CatalogError;
pub use types::Track;

/// Somewhere tracks can be looked up by free text
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<Track>, CatalogError>;
}

/// A fixed, in-memory catalog.
///
/// Matching is a case-insensitive substring test against the track name,
/// each artist and the album; an empty query matches everything.
pub struct MockCatalog {
    tracks: Vec<Track>,
}

impl MockCatalog {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new(vec![
            mock_track(
                "Shape of You",
                &["Ed Sheeran"],
                "÷ (Divide)",
                "https://images.pexels.com/photos/1389429/pexels-photo-1389429.jpeg",
                "spotify:track:7qiZfU4dY1lWllzX7mPBI3",
            ),
            mock_track(
                "Blinding Lights",
                &["The Weeknd"],
                "After Hours",
                "https://images.pexels.com/photos/1763075/pexels-photo-1763075.jpeg",
                "spotify:track:0VjIjW4GlUZAMYd2vXMi3b",
            ),
            mock_track(
                "Stay",
                &["The Kid LAROI", "Justin Bieber"],
                "F*CK LOVE 3: OVER YOU",
                "https://images.pexels.com/photos/1699161/pexels-photo-1699161.jpeg",
                "spotify:track:5PjdY0CKGZdEuoNab3yDmX",
            ),
        ])
    }
}

fn mock_track(name: &str, artists: &[&str], album: &str, cover: &str, uri: &str) -> Track {
    Track {
        name: name.to_string(),
        artists: artists.iter().map(|a| a.to_string()).collect(),
        album: album.to_string(),
        cover_image: cover.to_string(),
        external_url: uri.to_string(),
        uri: uri.to_string(),
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    async fn search(&self, query: &str) -> Result<Vec<Track>, CatalogError> {
        let needle = query.to_lowercase();
        let found: Vec<Track> = self
            .tracks
            .iter()
            .filter(|track| track.matches(&needle))
            .cloned()
            .collect();

        tracing::debug!("Search for {:?} matched {} tracks", query, found.len());
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    async fn names(query: &str) -> Vec<String> {
        MockCatalog::default()
            .search(query)
            .await
            .unwrap()
            .into_iter()
            .map(|track| track.name)
            .collect()
    }

    #[rstest]
    #[case("shape", &["Shape of You"])]
    #[case("WEEKND", &["Blinding Lights"])]
    #[case("justin", &["Stay"])]
    #[case("after hours", &["Blinding Lights"])]
    #[case("o", &["Shape of You", "Blinding Lights", "Stay"])]
    #[case("nothing like this", &[])]
    #[tokio::test]
    async fn test_search(#[case] query: &str, #[case] expected: &[&str]) {
        assert_eq!(names(query).await, expected);
    }

    #[tokio::test]
    async fn test_empty_query_matches_everything() {
        assert_eq!(names("").await.len(), 3);
    }
}
