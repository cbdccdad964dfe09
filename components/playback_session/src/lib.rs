//! Playback session manager
//!
//! Owns at most one engine handle, the transport state of the song loaded
//! into it and the playlist that next/previous resolve against. The session
//! runs as a single task; callers talk to it through a cloneable
//! [`SessionHandle`] and observe it through [`SessionSnapshot`]s.

mod error;
mod playlist;
mod session;
#[cfg(test)]
mod stub;

pub use error::SessionError;
pub use playlist::Playlist;
pub use session::{PlaybackSession, SessionConfig, SessionHandle, SessionSnapshot};
