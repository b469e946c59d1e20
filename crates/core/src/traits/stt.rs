//! Speech-to-text gateway seam.

use async_trait::async_trait;

use super::TranscriptStream;
use crate::PipelineError;

#[async_trait]
pub trait SttGateway: Send + Sync {
    /// Open a bidirectional transcription session: an ingress the caller
    /// pushes PCM chunks into, and the stream of transcript hypotheses.
    async fn open_transcription(
        &self,
        trace_id: &str,
    ) -> Result<(Box<dyn AudioIngress>, TranscriptStream), PipelineError>;
}

/// Audio input half of a transcription session.
#[async_trait]
pub trait AudioIngress: Send {
    async fn send_audio(&mut self, chunk: Vec<u8>) -> Result<(), PipelineError>;

    /// Half-close: signals that no more audio will follow. The transcript
    /// stream stays readable until the gateway finishes.
    async fn finish(&mut self) -> Result<(), PipelineError>;
}
