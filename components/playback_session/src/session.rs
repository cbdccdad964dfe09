use std::future;
use std::sync::Arc;
use std::time::Duration;

use playback_engine::{EngineEvent, EngineEvents, HandleId, PlaybackEngine};
use playback_primitives::{Direction, DownloadedSong};
use time_primitives::Millis;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, error, info, trace, warn};

use crate::error::SessionError;
use crate::playlist::Playlist;

/// What observers see of the session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub current_song: Option<DownloadedSong>,
    pub is_playing: bool,
    pub duration: Millis,
    pub position: Millis,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How often the position is refreshed while playing
    pub poll_interval: Duration,
    /// Commands that may queue up before callers wait for the session
    pub command_buffer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            command_buffer: 32,
        }
    }
}

type Reply = oneshot::Sender<Result<(), SessionError>>;

enum Command {
    Play { song: DownloadedSong, reply: Reply },
    Pause { reply: Reply },
    Resume { reply: Reply },
    Seek { target: Millis, reply: Reply },
    Advance { direction: Direction, reply: Reply },
    SetPlaylist { songs: Vec<DownloadedSong>, reply: Reply },
    Shutdown { reply: oneshot::Sender<()> },
}

/// Handle to a running playback session
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    /// The most recently published snapshot
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Observe every snapshot the session publishes from now on
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        let mut snapshots = self.snapshots.clone();
        snapshots.mark_unchanged();
        snapshots
    }

    /// Release whatever is loaded and start playing `song`
    pub async fn play_song(&self, song: DownloadedSong) -> Result<(), SessionError> {
        self.request(|reply| Command::Play { song, reply }).await
    }

    pub async fn pause_song(&self) -> Result<(), SessionError> {
        self.request(|reply| Command::Pause { reply }).await
    }

    pub async fn resume_song(&self) -> Result<(), SessionError> {
        self.request(|reply| Command::Resume { reply }).await
    }

    pub async fn seek_to(&self, target: Millis) -> Result<(), SessionError> {
        self.request(|reply| Command::Seek { target, reply }).await
    }

    pub async fn play_next_song(&self) -> Result<(), SessionError> {
        self.advance(Direction::Next).await
    }

    pub async fn play_previous_song(&self) -> Result<(), SessionError> {
        self.advance(Direction::Previous).await
    }

    pub async fn advance(&self, direction: Direction) -> Result<(), SessionError> {
        self.request(|reply| Command::Advance { direction, reply })
            .await
    }

    /// Replace the playlist. The loaded song keeps playing.
    pub async fn set_playlist(&self, songs: Vec<DownloadedSong>) -> Result<(), SessionError> {
        self.request(|reply| Command::SetPlaylist { songs, reply })
            .await
    }

    /// Release the loaded handle and stop the session
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        let (reply, done) = oneshot::channel();
        self.commands
            .send(Command::Shutdown { reply })
            .await
            .map_err(|_| SessionError::Closed)?;
        done.await.map_err(|_| SessionError::Closed)
    }

    async fn request(&self, command: impl FnOnce(Reply) -> Command) -> Result<(), SessionError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| SessionError::Closed)?;
        response.await.map_err(|_| SessionError::Closed)?
    }
}

enum Transport {
    Idle,
    Loaded {
        handle: HandleId,
        song: DownloadedSong,
        playing: bool,
    },
}

/// The task that owns the session state.
///
/// Commands, engine events and the position timer are all handled on this
/// one task, so a `load` can never interleave with another mutation.
pub struct PlaybackSession {
    engine: Arc<dyn PlaybackEngine>,
    events: EngineEvents,
    commands: mpsc::Receiver<Command>,
    snapshots: watch::Sender<SessionSnapshot>,
    playlist: Playlist,
    transport: Transport,
    duration: Millis,
    position: Millis,
    // Only exists while playing
    ticker: Option<Interval>,
    poll_interval: Duration,
}

impl PlaybackSession {
    /// Start a session on the current tokio runtime
    pub fn spawn(
        engine: Arc<dyn PlaybackEngine>,
        events: EngineEvents,
        config: SessionConfig,
    ) -> SessionHandle {
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer.max(1));
        let (snapshot_tx, snapshot_rx) = watch::channel(SessionSnapshot::default());

        let session = PlaybackSession {
            engine,
            events,
            commands: command_rx,
            snapshots: snapshot_tx,
            playlist: Playlist::default(),
            transport: Transport::Idle,
            duration: Millis::ZERO,
            position: Millis::ZERO,
            ticker: None,
            poll_interval: config.poll_interval,
        };
        tokio::spawn(session.run());

        SessionHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
        }
    }

    async fn run(mut self) {
        info!("Playback session started");
        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => {
                        if !self.handle_command(command).await {
                            break;
                        }
                    }
                    None => {
                        self.teardown().await;
                        break;
                    }
                },
                Some(event) = self.events.recv() => self.handle_event(event).await,
                _ = next_tick(&mut self.ticker) => self.refresh_position().await,
            }
        }
        info!("Playback session stopped");
    }

    /// Returns false once the session should stop
    async fn handle_command(&mut self, command: Command) -> bool {
        let (result, reply) = match command {
            Command::Play { song, reply } => (self.load(song).await, reply),
            Command::Pause { reply } => (self.pause().await, reply),
            Command::Resume { reply } => (self.resume().await, reply),
            Command::Seek { target, reply } => (self.seek(target).await, reply),
            Command::Advance { direction, reply } => (self.advance(direction).await, reply),
            Command::SetPlaylist { songs, reply } => {
                debug!("Playlist replaced with {} songs", songs.len());
                self.playlist = Playlist::new(songs);
                (Ok(()), reply)
            }
            Command::Shutdown { reply } => {
                self.teardown().await;
                let _ = reply.send(());
                return false;
            }
        };
        // The caller may have stopped waiting; the transition stands either way
        let _ = reply.send(result);
        true
    }

    async fn load(&mut self, song: DownloadedSong) -> Result<(), SessionError> {
        self.release_current().await;

        info!("Loading {} from {}", song.id, song.file_path.display());
        let handle = match self.engine.acquire(&song.file_path).await {
            Ok(handle) => handle,
            Err(e) => {
                error!("Failed to load {}: {}", song.id, e);
                self.publish();
                return Err(e.into());
            }
        };

        match self.engine.status(handle).await {
            Ok(status) => self.duration = status.duration,
            Err(e) => warn!("Duration of {} not available yet: {}", song.id, e),
        }
        self.transport = Transport::Loaded {
            handle,
            song,
            playing: true,
        };
        self.start_polling();
        self.publish();
        Ok(())
    }

    async fn pause(&mut self) -> Result<(), SessionError> {
        let Transport::Loaded {
            handle,
            playing: true,
            ..
        } = self.transport
        else {
            debug!("Pause ignored: nothing is playing");
            return Ok(());
        };

        if let Err(e) = self.engine.pause(handle).await {
            error!("Failed to pause handle {}: {}", handle, e);
            return Err(e.into());
        }
        self.set_playing(false);
        self.publish();
        Ok(())
    }

    async fn resume(&mut self) -> Result<(), SessionError> {
        let Transport::Loaded {
            handle,
            playing: false,
            ..
        } = self.transport
        else {
            debug!("Resume ignored: nothing is paused");
            return Ok(());
        };

        if let Err(e) = self.engine.resume(handle).await {
            error!("Failed to resume handle {}: {}", handle, e);
            return Err(e.into());
        }
        self.set_playing(true);
        self.publish();
        Ok(())
    }

    async fn seek(&mut self, target: Millis) -> Result<(), SessionError> {
        let Transport::Loaded { handle, .. } = self.transport else {
            debug!("Seek ignored: nothing is loaded");
            return Ok(());
        };

        if let Err(e) = self.engine.seek(handle, target).await {
            error!("Failed to seek handle {} to {}: {}", handle, target, e);
            return Err(e.into());
        }
        // Republish what the engine settled on, it clamps out-of-range targets
        self.position = match self.engine.status(handle).await {
            Ok(status) => status.position,
            Err(e) => {
                warn!("Position after seek not available: {}", e);
                target.clamp_to(self.duration)
            }
        };
        self.publish();
        Ok(())
    }

    async fn advance(&mut self, direction: Direction) -> Result<(), SessionError> {
        let Transport::Loaded { song, .. } = &self.transport else {
            debug!("{:?} ignored: nothing is loaded", direction);
            return Ok(());
        };
        let Some(target) = self.playlist.neighbour(&song.id, direction).cloned() else {
            debug!(
                "{:?} ignored: {} is not in the playlist ({} songs)",
                direction,
                song.id,
                self.playlist.len()
            );
            return Ok(());
        };
        self.load(target).await
    }

    async fn handle_event(&mut self, event: EngineEvent) {
        if !self.is_current(event.handle()) {
            trace!("Ignoring event for stale handle {}", event.handle());
            return;
        }

        match event {
            EngineEvent::Status { status, .. } => {
                if status.duration > Millis::ZERO {
                    self.duration = status.duration;
                }
                if status.did_finish {
                    self.position = self.duration;
                }
                self.publish();
            }
            EngineEvent::Finished { handle } => {
                info!("Handle {} finished, advancing", handle);
                self.position = self.duration;
                self.set_playing(false);
                self.publish();
                if let Err(e) = self.advance(Direction::Next).await {
                    warn!("Automatic advance failed: {}", e);
                }
            }
        }
    }

    async fn refresh_position(&mut self) {
        let Transport::Loaded {
            handle,
            playing: true,
            ..
        } = self.transport
        else {
            self.ticker = None;
            return;
        };

        match self.engine.status(handle).await {
            Ok(status) => {
                if status.duration > Millis::ZERO {
                    self.duration = status.duration;
                }
                self.position = status.position;
                self.publish();
            }
            Err(e) => warn!("Failed to poll position of handle {}: {}", handle, e),
        }
    }

    /// Release the loaded handle, if any, leaving the session idle
    async fn release_current(&mut self) {
        self.ticker = None;
        self.duration = Millis::ZERO;
        self.position = Millis::ZERO;

        let previous = std::mem::replace(&mut self.transport, Transport::Idle);
        if let Transport::Loaded { handle, song, .. } = previous {
            debug!("Releasing handle {} ({})", handle, song.id);
            if let Err(e) = self.engine.release(handle).await {
                warn!("Failed to release handle {}: {}", handle, e);
            }
        }
    }

    async fn teardown(&mut self) {
        self.release_current().await;
        self.publish();
    }

    fn is_current(&self, candidate: HandleId) -> bool {
        matches!(self.transport, Transport::Loaded { handle, .. } if handle == candidate)
    }

    fn set_playing(&mut self, now_playing: bool) {
        if let Transport::Loaded { playing, .. } = &mut self.transport {
            *playing = now_playing;
        }
        if now_playing {
            self.start_polling();
        } else {
            self.ticker = None;
        }
    }

    /// Replace any running timer, so there is never more than one
    fn start_polling(&mut self) {
        let mut ticker =
            tokio::time::interval_at(Instant::now() + self.poll_interval, self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.ticker = Some(ticker);
    }

    fn snapshot(&self) -> SessionSnapshot {
        match &self.transport {
            Transport::Idle => SessionSnapshot::default(),
            Transport::Loaded { song, playing, .. } => SessionSnapshot {
                current_song: Some(song.clone()),
                is_playing: *playing,
                duration: self.duration,
                position: self.position,
            },
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => future::pending().await,
    }
}
