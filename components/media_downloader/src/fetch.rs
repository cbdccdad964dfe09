// components/media_downloader/src/fetch.rs
use crate::types::{DownloadError, Fetcher};
use async_trait::async_trait;
use media_catalog::Track;
use std::path::Path;

const SAMPLE_RATE: u32 = 8_000;

/// Stands in for a real transfer by writing a short silent WAV.
///
/// The file is real audio, so playback engines can open and time it.
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderFetcher {
    seconds: u32,
}

impl PlaceholderFetcher {
    pub fn new(seconds: u32) -> Self {
        Self { seconds }
    }
}

impl Default for PlaceholderFetcher {
    fn default() -> Self {
        Self::new(30)
    }
}

#[async_trait]
impl Fetcher for PlaceholderFetcher {
    async fn fetch(&self, track: &Track, output: &Path) -> Result<(), DownloadError> {
        tracing::info!(
            "Writing {}s placeholder for {:?} to {}",
            self.seconds,
            track.name,
            output.display()
        );
        let output = output.to_path_buf();
        let seconds = self.seconds;
        tokio::task::spawn_blocking(move || write_silence(&output, seconds))
            .await
            .map_err(|e| DownloadError::DownloadFailed(e.to_string()))?
    }
}

fn write_silence(output: &Path, seconds: u32) -> Result<(), DownloadError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(output, spec)?;
    for _ in 0..(SAMPLE_RATE * seconds) {
        writer.write_sample(0i16)?;
    }
    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
pub mod stub {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::Notify;

    /// Writes an empty file, optionally waiting for a go-ahead first
    #[derive(Default)]
    pub struct FetcherStub {
        pub gate: Option<Arc<Notify>>,
    }

    #[async_trait]
    impl Fetcher for FetcherStub {
        async fn fetch(&self, _track: &Track, output: &Path) -> Result<(), DownloadError> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            tokio::fs::write(output, b"").await?;
            Ok(())
        }
    }
}
