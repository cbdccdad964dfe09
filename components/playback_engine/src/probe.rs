use crate::error::EngineError;
use lofty::AudioFile;
use std::path::Path;
use time_primitives::Millis;

/// Reports how long the audio in a file plays for
pub trait DurationProbe: Send + Sync {
    fn probe(&self, path: &Path) -> Result<Millis, EngineError>;
}

/// Reads the duration from the container's properties
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyProbe;

impl DurationProbe for LoftyProbe {
    fn probe(&self, path: &Path) -> Result<Millis, EngineError> {
        if !path.exists() {
            return Err(EngineError::NotFound(path.to_path_buf()));
        }

        let tagged = lofty::read_from_path(path)
            .map_err(|e| EngineError::Decoder(format!("{}: {}", path.display(), e)))?;
        let duration = Millis::from(tagged.properties().duration());

        tracing::debug!("Probed {}: duration={}", path.display(), duration);
        Ok(duration)
    }
}

/// Pretends every file has the same duration
#[derive(Debug, Clone, Copy)]
pub struct FixedProbe(pub Millis);

impl DurationProbe for FixedProbe {
    fn probe(&self, _path: &Path) -> Result<Millis, EngineError> {
        Ok(self.0)
    }
}
