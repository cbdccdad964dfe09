// bases/media_ctl/src/config.rs
use crate::commands::Commands;
use clap::Parser;
use playback_session::SessionConfig;
use std::path::PathBuf;
use std::time::Duration;

/// media-ctl configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Library directory holding the song list and audio files
    pub data_dir: PathBuf,

    /// How often the player refreshes the position while playing
    pub poll_interval: Duration,

    pub verbose: bool,
}

/// MDMA media control - manage and play downloaded songs
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Library directory holding downloaded songs
    #[arg(long, default_value = "mdma-library")]
    pub data_dir: PathBuf,

    /// Position refresh interval in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub poll_ms: u64,

    /// Log debug output from the playback session
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Config {
    /// Create configuration from CLI arguments
    pub fn from_args(args: &CliArgs) -> Self {
        Self {
            data_dir: args.data_dir.clone(),
            // A zero period would make the ticker spin
            poll_interval: Duration::from_millis(args.poll_ms.max(1)),
            verbose: args.verbose,
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            poll_interval: self.poll_interval,
            ..SessionConfig::default()
        }
    }

    /// Default `RUST_LOG` filter when none is set
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "media_ctl=debug,playback_session=debug,playback_engine=debug,library_storage=debug"
        } else {
            "media_ctl=info,playback_session=info"
        }
    }
}
