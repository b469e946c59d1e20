//! Text-to-speech gateway seam.

use async_trait::async_trait;

use super::AudioStream;
use crate::PipelineError;

#[async_trait]
pub trait TtsGateway: Send + Sync {
    /// Open a synthesis stream for one text span. Audio is signed 16-bit
    /// little-endian PCM at `sample_rate` Hz, mono.
    async fn open_synthesis(
        &self,
        trace_id: &str,
        text: &str,
        voice_id: &str,
        sample_rate: u32,
    ) -> Result<AudioStream, PipelineError>;
}
