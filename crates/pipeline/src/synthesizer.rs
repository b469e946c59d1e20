//! Sentence synthesis: TTS audio piped into outbound playback.

use std::path::PathBuf;
use std::sync::Arc;

use futures::StreamExt;
use tokio::io::AsyncReadExt;

use callflow_core::traits::{PlaybackSink, TtsGateway};
use callflow_core::{CancelSignal, PipelineError};

/// Chunk size for streaming the pre-recorded fallback announcement.
const FALLBACK_CHUNK_BYTES: usize = 1024;

/// Speaks one text span at a time into a call's playback stream.
///
/// Serialization is the caller's job (Respond awaits each invocation), so
/// sentences reach the caller in dialog order.
pub struct Synthesizer {
    tts: Arc<dyn TtsGateway>,
    sample_rate: u32,
    fallback_audio_path: PathBuf,
}

impl Synthesizer {
    pub fn new(tts: Arc<dyn TtsGateway>, sample_rate: u32, fallback_audio_path: PathBuf) -> Self {
        Self {
            tts,
            sample_rate,
            fallback_audio_path,
        }
    }

    /// Synthesize `text` and forward every non-empty chunk to the sink.
    ///
    /// Returns `Canceled` the moment either signal fires (barge-in or call
    /// shutdown) without touching the sink, which stays usable for the next
    /// sentence. If the TTS stream cannot be opened, the pre-recorded
    /// fallback announcement plays instead so the caller never hears dead
    /// air.
    pub async fn speak(
        &self,
        trace_id: &str,
        text: &str,
        voice_id: &str,
        sink: &mut dyn PlaybackSink,
        call_cancel: &mut CancelSignal,
        speech_cancel: &mut CancelSignal,
    ) -> Result<(), PipelineError> {
        let mut audio = match self
            .tts
            .open_synthesis(trace_id, text, voice_id, self.sample_rate)
            .await
        {
            Ok(stream) => stream,
            Err(err) => {
                tracing::warn!(error = %err, "TTS unavailable, playing fallback announcement");
                return self.play_fallback(sink).await;
            }
        };

        loop {
            tokio::select! {
                _ = call_cancel.cancelled() => return Err(PipelineError::Canceled),
                _ = speech_cancel.cancelled() => return Err(PipelineError::Canceled),
                chunk = audio.next() => match chunk {
                    None => return Ok(()),
                    Some(Ok(bytes)) => {
                        if !bytes.is_empty() {
                            sink.send_audio(bytes).await?;
                        }
                    }
                    Some(Err(err)) => {
                        // A synthesis that dies mid-stream loses one sentence,
                        // not the call.
                        tracing::warn!(error = %err, "TTS stream broke mid-synthesis, dropping sentence");
                        return Ok(());
                    }
                },
            }
        }
    }

    /// Stream the technical-difficulty asset into the call, then half-close
    /// the outbound direction. File or send failures here are fatal.
    async fn play_fallback(&self, sink: &mut dyn PlaybackSink) -> Result<(), PipelineError> {
        let mut file = tokio::fs::File::open(&self.fallback_audio_path)
            .await
            .map_err(|err| {
                PipelineError::upstream("tts", format!("fallback audio unavailable: {err}"))
            })?;

        let mut buf = [0u8; FALLBACK_CHUNK_BYTES];
        loop {
            let n = file.read(&mut buf).await.map_err(|err| {
                PipelineError::upstream("tts", format!("fallback audio read failed: {err}"))
            })?;
            if n == 0 {
                break;
            }
            sink.send_audio(buf[..n].to_vec()).await?;
        }

        sink.close().await?;
        tracing::info!("fallback announcement played");
        Ok(())
    }
}
