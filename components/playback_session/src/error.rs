use playback_engine::EngineError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Playback engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Playback session has shut down")]
    Closed,
}
