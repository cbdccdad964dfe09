// bases/media_ctl/src/player.rs
use crate::commands::{PlayerCommand, PLAYER_HELP};
use crate::config::Config;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use library_storage::SongStore;
use playback_engine::SimulatedEngine;
use playback_primitives::{DownloadedSong, SongId};
use playback_session::{PlaybackSession, SessionError, SessionHandle, SessionSnapshot};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Play the library from `start` (or its first song) until the user quits
pub async fn run(config: &Config, start: Option<SongId>) -> Result<()> {
    let songs = SongStore::in_library(&config.data_dir)
        .list_downloaded()
        .await?;
    let first = pick_start(&songs, start.as_ref())?;
    tracing::info!(
        "Starting playback of {} with {} songs from {}",
        first.id,
        songs.len(),
        config.data_dir.display()
    );

    let (engine, events) = SimulatedEngine::new();
    let session = PlaybackSession::spawn(Arc::new(engine), events, config.session_config());
    session.set_playlist(songs).await?;

    let mut snapshots = session.subscribe();
    session.play_song(first).await?;
    println!("{}", PLAYER_HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown = Shown::default();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                // EOF behaves like quit
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<PlayerCommand>() {
                    Ok(PlayerCommand::Quit) => break,
                    Ok(command) => {
                        tracing::debug!("Player command {:?}", command);
                        if let Err(e) = apply(&session, command).await {
                            eprintln!("Error: {}", e);
                        }
                    }
                    Err(e) => eprintln!("{}", e),
                }
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                if shown.update(&snapshot) {
                    println!("{}", describe(&snapshot));
                }
            }
        }
    }

    session.shutdown().await?;
    tracing::info!("Player stopped");
    Ok(())
}

fn pick_start(songs: &[DownloadedSong], start: Option<&SongId>) -> Result<DownloadedSong> {
    match start {
        Some(id) => songs
            .iter()
            .find(|song| &song.id == id)
            .cloned()
            .ok_or_else(|| eyre!("No downloaded song with id {}", id)),
        None => songs
            .first()
            .cloned()
            .ok_or_else(|| eyre!("The library is empty, download a song first")),
    }
}

async fn apply(session: &SessionHandle, command: PlayerCommand) -> Result<(), SessionError> {
    match command {
        PlayerCommand::Pause => session.pause_song().await,
        PlayerCommand::Resume => session.resume_song().await,
        PlayerCommand::Next => session.play_next_song().await,
        PlayerCommand::Previous => session.play_previous_song().await,
        PlayerCommand::Seek(target) => session.seek_to(target).await,
        PlayerCommand::Status => {
            println!("{}", describe(&session.snapshot()));
            Ok(())
        }
        PlayerCommand::Help => {
            println!("{}", PLAYER_HELP);
            Ok(())
        }
        PlayerCommand::Quit => Ok(()),
    }
}

/// Song and play state last printed; position ticks alone are not echoed
#[derive(Default)]
struct Shown {
    song: Option<SongId>,
    is_playing: bool,
}

impl Shown {
    fn update(&mut self, snapshot: &SessionSnapshot) -> bool {
        let song = snapshot.current_song.as_ref().map(|song| song.id.clone());
        let changed = song != self.song || snapshot.is_playing != self.is_playing;
        self.song = song;
        self.is_playing = snapshot.is_playing;
        changed
    }
}

fn describe(snapshot: &SessionSnapshot) -> String {
    match &snapshot.current_song {
        None => "Stopped".to_string(),
        Some(song) => format!(
            "{} {} [{} / {}]",
            if snapshot.is_playing { "Playing" } else { "Paused" },
            song,
            snapshot.position,
            snapshot.duration
        ),
    }
}
