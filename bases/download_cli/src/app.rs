// bases/download_cli/src/app.rs
use crate::args::{Args, Command};
use crate::output::OutputHandler;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use library_storage::SongStore;
use media_catalog::{Catalog, MockCatalog};
use media_downloader::{MediaDownloader, PlaceholderFetcher};
use playback_primitives::DownloadedSong;
use std::path::Path;
use std::sync::Arc;

pub struct App {
    args: Args,
    catalog: Box<dyn Catalog>,
    output: OutputHandler,
}

impl App {
    pub fn new(args: Args) -> Self {
        let output = OutputHandler::new(args.verbose);
        Self {
            args,
            catalog: Box::new(MockCatalog::default()),
            output,
        }
    }

    pub async fn run(&self) -> Result<()> {
        match &self.args.command {
            Command::Search { query } => {
                let tracks = self.catalog.search(query).await?;
                tracing::debug!("Search {:?} matched {} tracks", query, tracks.len());
                self.output.print_search_results(query, &tracks);
            }
            Command::Download {
                query,
                index,
                seconds,
            } => {
                self.download(query, *index, *seconds).await?;
            }
        }
        Ok(())
    }

    async fn download(&self, query: &str, index: usize, seconds: u32) -> Result<DownloadedSong> {
        let tracks = self.catalog.search(query).await?;
        let track = tracks.get(index).ok_or_else(|| {
            eyre!(
                "No match #{} for {:?} ({} tracks found)",
                index,
                query,
                tracks.len()
            )
        })?;

        let downloader = self.downloader(&self.args.library, seconds).await?;
        self.output.print_download_start(track);
        let song = downloader.download(track).await?;

        let store = SongStore::in_library(&self.args.library);
        store.save(song.clone()).await?;
        tracing::info!("Saved {} to {}", song.id, store.path().display());
        self.output.print_download_complete(&song);
        Ok(song)
    }

    async fn downloader(&self, library: &Path, seconds: u32) -> Result<MediaDownloader> {
        let fetcher = Arc::new(PlaceholderFetcher::new(seconds));
        Ok(MediaDownloader::new_with_fetcher(library, fetcher).await?)
    }

    pub fn print_error(&self, error: &color_eyre::Report) {
        self.output.print_error(error);
    }
}
