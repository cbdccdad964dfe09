use std::fmt;
use time_primitives::Millis;
use tokio::sync::mpsc;

/// Engine-side resource for one loaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(u64);

impl HandleId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Playback status of a single handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineStatus {
    pub position: Millis,
    pub duration: Millis,
    pub is_playing: bool,
    /// Set once the handle has played through to its end
    pub did_finish: bool,
}

/// Notifications the engine pushes without being asked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Status {
        handle: HandleId,
        status: EngineStatus,
    },
    /// Emitted exactly once each time a handle plays through to its end
    Finished { handle: HandleId },
}

impl EngineEvent {
    pub fn handle(&self) -> HandleId {
        match self {
            EngineEvent::Status { handle, .. } | EngineEvent::Finished { handle } => *handle,
        }
    }
}

pub type EngineEvents = mpsc::UnboundedReceiver<EngineEvent>;
pub type EventSender = mpsc::UnboundedSender<EngineEvent>;

/// Create the notification channel an engine publishes on
pub fn event_channel() -> (EventSender, EngineEvents) {
    mpsc::unbounded_channel()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_handle() {
        let handle = HandleId::new(7);
        let finished = EngineEvent::Finished { handle };
        let status = EngineEvent::Status {
            handle,
            status: EngineStatus::default(),
        };

        assert_eq!(finished.handle(), handle);
        assert_eq!(status.handle(), handle);
    }

    #[test]
    fn test_handle_display() {
        assert_eq!(HandleId::new(3).to_string(), "#3");
    }
}
