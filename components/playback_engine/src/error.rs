use crate::HandleId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Track not found: {0}")]
    NotFound(std::path::PathBuf),

    #[error("Decoder error: {0}")]
    Decoder(String),

    #[error("Unknown playback handle {0}")]
    UnknownHandle(HandleId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Task cancelled")]
    TaskCancelled,
}
