// bases/download_cli/src/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Search the catalog and download tracks for offline playback
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Library directory that holds downloaded songs
    #[arg(short, long, default_value = "mdma-library")]
    pub library: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// List catalog tracks matching a name, artist or album
    Search { query: String },

    /// Download one of the tracks matching a query
    Download {
        query: String,

        /// Which match to download, counting from 0
        #[arg(long, default_value_t = 0)]
        index: usize,

        /// Length of the placeholder audio in seconds
        #[arg(long, default_value_t = 30)]
        seconds: u32,
    },
}
