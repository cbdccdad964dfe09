// components/playback_engine/src/simulated.rs
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use parking_lot::Mutex;
use time_primitives::Millis;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::error::EngineError;
use crate::events::{event_channel, EngineEvent, EngineEvents, EngineStatus, EventSender, HandleId};
use crate::probe::{DurationProbe, LoftyProbe};
use crate::PlaybackEngine;

/// Where one handle is in its file.
///
/// Position is derived from the clock instead of being advanced by a
/// callback: `offset` is the position at `since`, and `since` is only set
/// while playing.
struct Playhead {
    file: PathBuf,
    duration: Millis,
    offset: Millis,
    since: Option<Instant>,
    finished: bool,
    // Bumped on every transport change so a stale completion timer can tell
    generation: u64,
    completion: Option<JoinHandle<()>>,
}

impl Playhead {
    fn new(file: PathBuf, duration: Millis) -> Self {
        Self {
            file,
            duration,
            offset: Millis::ZERO,
            since: None,
            finished: false,
            generation: 0,
            completion: None,
        }
    }

    fn position(&self, now: Instant) -> Millis {
        let elapsed = self
            .since
            .map(|since| Millis::from(now.duration_since(since)))
            .unwrap_or(Millis::ZERO);
        (self.offset + elapsed).clamp_to(self.duration)
    }

    fn status(&self, now: Instant) -> EngineStatus {
        EngineStatus {
            position: self.position(now),
            duration: self.duration,
            is_playing: self.since.is_some(),
            did_finish: self.finished,
        }
    }

    /// Freeze the position and cancel any pending completion
    fn halt(&mut self, now: Instant) {
        self.offset = self.position(now);
        self.since = None;
        self.generation += 1;
        if let Some(task) = self.completion.take() {
            task.abort();
        }
    }
}

struct Inner {
    probe: Arc<dyn DurationProbe>,
    handles: Mutex<HashMap<HandleId, Playhead>>,
    next_id: AtomicU64,
    events: EventSender,
}

/// A playback engine that keeps time but produces no sound.
///
/// Every handle plays its file's probed duration in real (tokio) time and
/// reports completion on the event channel, which makes it usable anywhere
/// transport behaviour matters more than audio output: headless hosts, demos
/// and tests running on a paused clock.
#[derive(Clone)]
pub struct SimulatedEngine {
    inner: Arc<Inner>,
}

impl SimulatedEngine {
    /// Create an engine that probes durations with lofty
    pub fn new() -> (Self, EngineEvents) {
        Self::with_probe(Arc::new(LoftyProbe))
    }

    pub fn with_probe(probe: Arc<dyn DurationProbe>) -> (Self, EngineEvents) {
        let (events, receiver) = event_channel();
        let engine = Self {
            inner: Arc::new(Inner {
                probe,
                handles: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                events,
            }),
        };
        (engine, receiver)
    }

    /// Number of handles acquired and not yet released
    pub fn live_handles(&self) -> usize {
        self.inner.handles.lock().len()
    }

    fn with_playhead<T>(
        &self,
        handle: HandleId,
        f: impl FnOnce(&mut Playhead, Instant) -> T,
    ) -> Result<T, EngineError> {
        let mut handles = self.inner.handles.lock();
        let playhead = handles
            .get_mut(&handle)
            .ok_or(EngineError::UnknownHandle(handle))?;
        Ok(f(playhead, Instant::now()))
    }

    /// Start (or restart) the clock on a playhead and arm its completion timer.
    ///
    /// A playhead already at its end (an empty file, or resumed after a seek
    /// to the end) gets a zero-length timer and finishes right away.
    fn start(&self, handle: HandleId, playhead: &mut Playhead, now: Instant) {
        playhead.halt(now);
        playhead.since = Some(now);
        playhead.finished = false;

        let remaining = (playhead.duration - playhead.offset).as_duration();
        let generation = playhead.generation;
        let inner = Arc::downgrade(&self.inner);
        playhead.completion = Some(tokio::spawn(async move {
            tokio::time::sleep(remaining).await;
            Self::complete(inner, handle, generation);
        }));
    }

    fn complete(inner: Weak<Inner>, handle: HandleId, generation: u64) {
        let Some(inner) = inner.upgrade() else {
            return;
        };

        let status = {
            let mut handles = inner.handles.lock();
            let Some(playhead) = handles.get_mut(&handle) else {
                return;
            };
            if playhead.generation != generation || playhead.since.is_none() {
                return;
            }
            playhead.offset = playhead.duration;
            playhead.since = None;
            playhead.finished = true;
            playhead.completion = None;
            playhead.status(Instant::now())
        };

        tracing::debug!("Handle {} finished", handle);
        // The receiver going away just means nobody is listening anymore
        let _ = inner.events.send(EngineEvent::Status { handle, status });
        let _ = inner.events.send(EngineEvent::Finished { handle });
    }
}

#[async_trait]
impl PlaybackEngine for SimulatedEngine {
    async fn acquire(&self, file: &Path) -> Result<HandleId, EngineError> {
        let probe = Arc::clone(&self.inner.probe);
        let path = file.to_path_buf();
        let duration = tokio::task::spawn_blocking(move || probe.probe(&path))
            .await
            .map_err(|_| EngineError::TaskCancelled)??;

        let handle = HandleId::new(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let now = Instant::now();
        {
            // The playhead is in the map before its completion timer is armed,
            // and the initial status is sent before the timer can take the lock
            let mut handles = self.inner.handles.lock();
            let playhead = handles
                .entry(handle)
                .or_insert_with(|| Playhead::new(file.to_path_buf(), duration));
            self.start(handle, playhead, now);
            let status = playhead.status(now);
            let _ = self.inner.events.send(EngineEvent::Status { handle, status });
        }

        tracing::info!(
            "Acquired handle {} for {} (duration={})",
            handle,
            file.display(),
            duration
        );
        Ok(handle)
    }

    async fn release(&self, handle: HandleId) -> Result<(), EngineError> {
        let mut playhead = self
            .inner
            .handles
            .lock()
            .remove(&handle)
            .ok_or(EngineError::UnknownHandle(handle))?;
        playhead.halt(Instant::now());
        tracing::info!("Released handle {} ({})", handle, playhead.file.display());
        Ok(())
    }

    async fn pause(&self, handle: HandleId) -> Result<(), EngineError> {
        self.with_playhead(handle, |playhead, now| playhead.halt(now))?;
        tracing::debug!("Paused handle {}", handle);
        Ok(())
    }

    async fn resume(&self, handle: HandleId) -> Result<(), EngineError> {
        let mut handles = self.inner.handles.lock();
        let playhead = handles
            .get_mut(&handle)
            .ok_or(EngineError::UnknownHandle(handle))?;
        if playhead.since.is_none() {
            self.start(handle, playhead, Instant::now());
        }
        tracing::debug!("Resumed handle {}", handle);
        Ok(())
    }

    async fn seek(&self, handle: HandleId, position: Millis) -> Result<(), EngineError> {
        let mut handles = self.inner.handles.lock();
        let playhead = handles
            .get_mut(&handle)
            .ok_or(EngineError::UnknownHandle(handle))?;
        let now = Instant::now();
        let was_playing = playhead.since.is_some();

        playhead.halt(now);
        playhead.offset = position.clamp_to(playhead.duration);
        playhead.finished = false;
        if was_playing {
            self.start(handle, playhead, now);
        }

        tracing::debug!(
            "Handle {} seeking to position={}/{}",
            handle,
            playhead.offset,
            playhead.duration
        );
        Ok(())
    }

    async fn status(&self, handle: HandleId) -> Result<EngineStatus, EngineError> {
        self.with_playhead(handle, |playhead, now| playhead.status(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::FixedProbe;
    use assert_matches::assert_matches;
    use std::time::Duration;

    fn engine(secs: u64) -> (SimulatedEngine, EngineEvents) {
        SimulatedEngine::with_probe(Arc::new(FixedProbe(Millis::from_secs(secs))))
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_starts_playing() {
        let (engine, mut events) = engine(10);
        let handle = engine.acquire(Path::new("a.wav")).await.unwrap();

        let status = engine.status(handle).await.unwrap();
        assert!(status.is_playing);
        assert_eq!(status.position, Millis::ZERO);
        assert_eq!(status.duration, Millis::from_secs(10));

        assert_matches!(events.recv().await, Some(EngineEvent::Status { handle: h, .. }) if h == handle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_position_follows_clock() {
        let (engine, _events) = engine(10);
        let handle = engine.acquire(Path::new("a.wav")).await.unwrap();

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        let status = engine.status(handle).await.unwrap();
        assert_eq!(status.position, Millis::new(2_500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_freezes_position() {
        let (engine, _events) = engine(10);
        let handle = engine.acquire(Path::new("a.wav")).await.unwrap();

        tokio::time::sleep(Duration::from_secs(1)).await;
        engine.pause(handle).await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;

        let status = engine.status(handle).await.unwrap();
        assert!(!status.is_playing);
        assert_eq!(status.position, Millis::from_secs(1));

        engine.resume(handle).await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(
            engine.status(handle).await.unwrap().position,
            Millis::from_secs(2)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_seek_is_clamped_to_duration() {
        let (engine, _events) = engine(10);
        let handle = engine.acquire(Path::new("a.wav")).await.unwrap();
        engine.pause(handle).await.unwrap();

        engine.seek(handle, Millis::from_secs(60)).await.unwrap();
        let status = engine.status(handle).await.unwrap();
        assert_eq!(status.position, Millis::from_secs(10));
        assert!(!status.is_playing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_finish_emits_events_once() {
        let (engine, mut events) = engine(3);
        let handle = engine.acquire(Path::new("a.wav")).await.unwrap();
        assert_matches!(events.recv().await, Some(EngineEvent::Status { .. }));

        tokio::time::sleep(Duration::from_secs(4)).await;

        assert_matches!(
            events.recv().await,
            Some(EngineEvent::Status { status, .. }) if status.did_finish && !status.is_playing
        );
        assert_eq!(events.recv().await, Some(EngineEvent::Finished { handle }));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_file_finishes_immediately() {
        let (engine, mut events) = engine(0);
        let handle = engine.acquire(Path::new("empty.wav")).await.unwrap();

        assert_matches!(
            events.recv().await,
            Some(EngineEvent::Status { status, .. }) if status.is_playing && !status.did_finish
        );
        assert_matches!(
            events.recv().await,
            Some(EngineEvent::Status { status, .. }) if status.did_finish && !status.is_playing
        );
        assert_eq!(events.recv().await, Some(EngineEvent::Finished { handle }));
        assert!(engine.status(handle).await.unwrap().did_finish);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_at_end_finishes_again() {
        let (engine, mut events) = engine(3);
        let handle = engine.acquire(Path::new("a.wav")).await.unwrap();
        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_matches!(events.recv().await, Some(EngineEvent::Status { .. }));
        assert_matches!(events.recv().await, Some(EngineEvent::Status { .. }));
        assert_eq!(events.recv().await, Some(EngineEvent::Finished { handle }));

        engine.resume(handle).await.unwrap();
        assert_matches!(
            events.recv().await,
            Some(EngineEvent::Status { status, .. }) if status.did_finish
        );
        assert_eq!(events.recv().await, Some(EngineEvent::Finished { handle }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_seek_back_postpones_finish() {
        let (engine, mut events) = engine(3);
        let handle = engine.acquire(Path::new("a.wav")).await.unwrap();
        let _ = events.recv().await;

        tokio::time::sleep(Duration::from_secs(2)).await;
        engine.seek(handle, Millis::ZERO).await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(events.try_recv().is_err());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_matches!(events.recv().await, Some(EngineEvent::Status { .. }));
        assert_eq!(events.recv().await, Some(EngineEvent::Finished { handle }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_released_handle_never_finishes() {
        let (engine, mut events) = engine(3);
        let handle = engine.acquire(Path::new("a.wav")).await.unwrap();
        let _ = events.recv().await;

        engine.release(handle).await.unwrap();
        assert_eq!(engine.live_handles(), 0);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(events.try_recv().is_err());
        assert_matches!(
            engine.status(handle).await,
            Err(EngineError::UnknownHandle(h)) if h == handle
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_release_unknown_handle_fails() {
        let (engine, _events) = engine(3);
        assert_matches!(
            engine.release(HandleId::new(42)).await,
            Err(EngineError::UnknownHandle(_))
        );
    }

    #[tokio::test]
    async fn test_acquire_missing_file_fails() {
        let (engine, _events) = SimulatedEngine::new();
        assert_matches!(
            engine.acquire(Path::new("/this/file/does/not/exist.wav")).await,
            Err(EngineError::NotFound(_))
        );
        assert_eq!(engine.live_handles(), 0);
    }
}
