//! Media gateway seam: inbound capture and outbound playback.

use async_trait::async_trait;

use super::AudioStream;
use crate::PipelineError;

#[async_trait]
pub trait MediaGateway: Send + Sync {
    /// Best-effort NAT hole punch: play a short warmer toward the caller's
    /// RTP address. Callers log and ignore failures.
    async fn warm_up(&self, trace_id: &str, rtp_addr: &str) -> Result<(), PipelineError>;

    /// Open the inbound capture stream for the given server-side RTP port,
    /// resampled to `sample_rate` Hz.
    async fn open_capture(
        &self,
        trace_id: &str,
        server_rtp_port: u16,
        sample_rate: u32,
    ) -> Result<AudioStream, PipelineError>;

    /// Open the outbound playback stream for a call. The returned sink has
    /// already sent the call-id handshake frame, so the first `send_audio`
    /// is never the first frame on the wire.
    async fn open_playback(
        &self,
        trace_id: &str,
        call_id: &str,
    ) -> Result<Box<dyn PlaybackSink>, PipelineError>;
}

/// Outbound audio sink for one call.
#[async_trait]
pub trait PlaybackSink: Send {
    async fn send_audio(&mut self, chunk: Vec<u8>) -> Result<(), PipelineError>;

    /// Half-close the send direction and wait for the gateway's final ack.
    /// Idempotent: closing an already-closed sink is a no-op.
    async fn close(&mut self) -> Result<(), PipelineError>;
}
