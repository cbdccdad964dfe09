// bases/download_cli/src/output.rs
use media_catalog::Track;
use playback_primitives::DownloadedSong;

pub struct OutputHandler {
    verbose: bool,
}

impl OutputHandler {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn print_search_results(&self, query: &str, tracks: &[Track]) {
        if tracks.is_empty() {
            println!("No tracks match {:?}", query);
            return;
        }

        for (index, track) in tracks.iter().enumerate() {
            println!(
                "[{}] {} - {} ({})",
                index,
                track.artist_line(),
                track.name,
                track.album
            );
            if self.verbose {
                println!("    uri: {}", track.uri);
            }
        }
    }

    pub fn print_download_start(&self, track: &Track) {
        println!("Downloading: {} - {}", track.artist_line(), track.name);
    }

    pub fn print_download_complete(&self, song: &DownloadedSong) {
        println!("Downloaded: {} to {}", song.title, song.file_path.display());
        println!("Artist: {}", song.artist);
        println!("Album: {}", song.album);

        if self.verbose {
            println!("Id: {}", song.id);
            println!("Download time: {}", song.download_date.to_rfc3339());
        }
    }

    pub fn print_error(&self, error: &color_eyre::Report) {
        eprintln!("Error: {}", error);

        if self.verbose {
            eprintln!("\nError details:");
            error.chain().skip(1).for_each(|cause| {
                eprintln!("  caused by: {}", cause);
            });
        }
    }
}
