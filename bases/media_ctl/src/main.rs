// bases/media_ctl/src/main.rs
mod commands;
mod config;
mod player;

use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use commands::Commands;
use config::{CliArgs, Config};
use library_storage::SongStore;
use playback_primitives::SongId;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let config = Config::from_args(&args);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .init();

    match args.command {
        Commands::List => {
            let songs = SongStore::in_library(&config.data_dir)
                .list_downloaded()
                .await?;
            if songs.is_empty() {
                println!("No downloaded songs in {}", config.data_dir.display());
            }
            for song in songs {
                println!("{}  {} ({})", song.id, song, song.album);
            }
        }

        Commands::Delete { id } => {
            let id = SongId::new(id);
            match SongStore::in_library(&config.data_dir).delete(&id).await? {
                Some(song) => {
                    tracing::info!("Deleted {} ({})", song.id, song.file_path.display());
                    println!("Deleted {}", song);
                }
                None => return Err(eyre!("No downloaded song with id {}", id)),
            }
        }

        Commands::Play { id } => {
            player::run(&config, id.map(SongId::new)).await?;
        }
    }

    Ok(())
}
