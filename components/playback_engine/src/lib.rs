mod error;
mod events;
mod probe;
mod simulated;

use std::path::Path;

use async_trait::async_trait;
pub use error::EngineError;
pub use events::{event_channel, EngineEvent, EngineEvents, EngineStatus, EventSender, HandleId};
pub use probe::{DurationProbe, FixedProbe, LoftyProbe};
pub use simulated::SimulatedEngine;
pub use time_primitives::Millis;

/// The platform audio API a playback session drives.
///
/// A handle starts playing as soon as it is acquired. Asynchronous
/// notifications (status changes, completion) are not part of this trait;
/// engines hand out an [`EngineEvents`] receiver when they are created.
#[async_trait]
pub trait PlaybackEngine: Send + Sync {
    /// Load `file` and begin playing it
    async fn acquire(&self, file: &Path) -> Result<HandleId, EngineError>;

    /// Stop and free a handle. The handle is invalid afterwards.
    async fn release(&self, handle: HandleId) -> Result<(), EngineError>;

    async fn pause(&self, handle: HandleId) -> Result<(), EngineError>;

    async fn resume(&self, handle: HandleId) -> Result<(), EngineError>;

    /// Jump to `position`; the engine clamps it to the track's duration
    async fn seek(&self, handle: HandleId, position: Millis) -> Result<(), EngineError>;

    async fn status(&self, handle: HandleId) -> Result<EngineStatus, EngineError>;
}
