//! Test doubles shared by the session tests

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use playback_engine::{
    event_channel, EngineError, EngineEvent, EngineEvents, EngineStatus, EventSender, HandleId,
    PlaybackEngine,
};
use playback_primitives::{DownloadedSong, SongId};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use time_primitives::Millis;

pub fn song(id: &str) -> DownloadedSong {
    DownloadedSong {
        id: SongId::from(id),
        title: format!("Title {id}"),
        artist: "Test Artist".to_string(),
        album: "Test Album".to_string(),
        cover_image: String::new(),
        file_path: PathBuf::from(format!("/songs/{id}.wav")),
        download_date: Utc.timestamp_millis_opt(0).unwrap(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Acquire(PathBuf),
    Release(HandleId),
    Pause(HandleId),
    Resume(HandleId),
    Seek(HandleId, Millis),
    Status(HandleId),
}

#[derive(Default)]
struct StubState {
    next_id: u64,
    live: HashSet<HandleId>,
    max_live: usize,
    calls: Vec<Call>,
    failing_files: HashSet<PathBuf>,
    fail_transport: bool,
    position: Millis,
}

/// Records every call and reports a fixed duration
pub struct EngineStub {
    state: Mutex<StubState>,
    events: EventSender,
    duration: Millis,
}

impl EngineStub {
    pub fn new() -> (Arc<Self>, EngineEvents) {
        let (events, receiver) = event_channel();
        let stub = Arc::new(Self {
            state: Mutex::new(StubState::default()),
            events,
            duration: Millis::from_secs(180),
        });
        (stub, receiver)
    }

    pub fn duration(&self) -> Millis {
        self.duration
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn status_calls(&self) -> usize {
        self.count(|call| matches!(call, Call::Status(_)))
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.state.lock().calls.iter().filter(|c| predicate(c)).count()
    }

    pub fn live_handles(&self) -> usize {
        self.state.lock().live.len()
    }

    pub fn max_live_handles(&self) -> usize {
        self.state.lock().max_live
    }

    /// The most recently acquired handle
    pub fn last_handle(&self) -> HandleId {
        HandleId::new(self.state.lock().next_id)
    }

    pub fn fail_acquire(&self, file: &Path) {
        self.state.lock().failing_files.insert(file.to_path_buf());
    }

    pub fn fail_transport(&self, fail: bool) {
        self.state.lock().fail_transport = fail;
    }

    pub fn set_position(&self, position: Millis) {
        self.state.lock().position = position;
    }

    pub fn emit(&self, event: EngineEvent) {
        self.events.send(event).unwrap();
    }

    fn record(&self, call: Call) {
        self.state.lock().calls.push(call);
    }

    fn check_live(&self, handle: HandleId) -> Result<(), EngineError> {
        let state = self.state.lock();
        if state.fail_transport {
            return Err(EngineError::Decoder("transport failure".to_string()));
        }
        if !state.live.contains(&handle) {
            return Err(EngineError::UnknownHandle(handle));
        }
        Ok(())
    }
}

#[async_trait]
impl PlaybackEngine for EngineStub {
    async fn acquire(&self, file: &Path) -> Result<HandleId, EngineError> {
        self.record(Call::Acquire(file.to_path_buf()));
        let mut state = self.state.lock();
        if state.failing_files.contains(file) {
            return Err(EngineError::NotFound(file.to_path_buf()));
        }
        state.next_id += 1;
        let handle = HandleId::new(state.next_id);
        state.live.insert(handle);
        state.max_live = state.max_live.max(state.live.len());
        state.position = Millis::ZERO;
        Ok(handle)
    }

    async fn release(&self, handle: HandleId) -> Result<(), EngineError> {
        self.record(Call::Release(handle));
        if self.state.lock().live.remove(&handle) {
            Ok(())
        } else {
            Err(EngineError::UnknownHandle(handle))
        }
    }

    async fn pause(&self, handle: HandleId) -> Result<(), EngineError> {
        self.record(Call::Pause(handle));
        self.check_live(handle)
    }

    async fn resume(&self, handle: HandleId) -> Result<(), EngineError> {
        self.record(Call::Resume(handle));
        self.check_live(handle)
    }

    async fn seek(&self, handle: HandleId, position: Millis) -> Result<(), EngineError> {
        self.record(Call::Seek(handle, position));
        self.check_live(handle)?;
        self.state.lock().position = position.clamp_to(self.duration);
        Ok(())
    }

    async fn status(&self, handle: HandleId) -> Result<EngineStatus, EngineError> {
        self.record(Call::Status(handle));
        let state = self.state.lock();
        if !state.live.contains(&handle) {
            return Err(EngineError::UnknownHandle(handle));
        }
        Ok(EngineStatus {
            position: state.position,
            duration: self.duration,
            is_playing: true,
            did_finish: false,
        })
    }
}
