use playback_primitives::{Direction, DownloadedSong, SongId};

/// Ordered songs that next/previous resolve against
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playlist {
    songs: Vec<DownloadedSong>,
}

impl Playlist {
    pub fn new(songs: Vec<DownloadedSong>) -> Self {
        Self { songs }
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn songs(&self) -> &[DownloadedSong] {
        &self.songs
    }

    pub fn position_of(&self, id: &SongId) -> Option<usize> {
        self.songs.iter().position(|song| &song.id == id)
    }

    /// The song next to `current`, wrapping around at either end.
    ///
    /// `None` when the playlist is empty or does not contain `current`.
    pub fn neighbour(&self, current: &SongId, direction: Direction) -> Option<&DownloadedSong> {
        let index = self.position_of(current)?;
        direction
            .step(index, self.songs.len())
            .map(|target| &self.songs[target])
    }
}
