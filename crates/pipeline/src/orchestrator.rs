//! Per-call orchestration: stream setup, worker lifetimes, cancellation.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use callflow_core::traits::{DialogGateway, MediaGateway, SttGateway, TtsGateway};
use callflow_core::{cancel_pair, CallSession, CancelSignal, MediaInfo, PipelineError};

use crate::ingest::run_ingest;
use crate::latch::BargeInLatch;
use crate::recognize::run_recognize;
use crate::respond::run_respond;
use crate::synthesizer::Synthesizer;

/// Sized so a reporting worker never blocks, even if every worker fails at
/// once.
const ERROR_CHANNEL_CAPACITY: usize = 8;

/// Dialog identity used when the request carries no user id.
const UNKNOWN_USER: &str = "unknown_user";

/// Pipeline lifecycle notifications, surfaced to the RPC layer as status
/// frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// All four streams are open and the workers are live.
    Running,
    /// The call ended cleanly (client cancel or upstream EOF).
    Stopped,
    /// A handshake or stream error ended the call.
    Failed(String),
}

/// Engine tunables, resolved from settings at startup.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// PCM sample rate (Hz) for both capture and synthesis.
    pub sample_rate: u32,
    /// Interim transcripts longer than this (chars, trimmed) trigger
    /// barge-in.
    pub barge_in_min_chars: usize,
    /// Voice for pipeline synthesis; SpeakText callers pass their own.
    pub default_voice: String,
    /// Pre-recorded announcement for TTS outages.
    pub fallback_audio_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            barge_in_min_chars: 3,
            default_voice: "coqui:default".to_string(),
            fallback_audio_path: PathBuf::from("assets/audio/technical_difficulty.wav"),
        }
    }
}

/// The per-call pipeline engine.
///
/// Holds the upstream gateway set (process-wide, concurrency-safe) and runs
/// one full-duplex loop per `run` invocation. Calls are fully independent;
/// the only per-call shared state is the barge-in latch created inside
/// `run`.
pub struct CallPipeline {
    media: Arc<dyn MediaGateway>,
    stt: Arc<dyn SttGateway>,
    dialog: Arc<dyn DialogGateway>,
    synthesizer: Arc<Synthesizer>,
    config: EngineConfig,
}

impl CallPipeline {
    pub fn new(
        media: Arc<dyn MediaGateway>,
        stt: Arc<dyn SttGateway>,
        dialog: Arc<dyn DialogGateway>,
        tts: Arc<dyn TtsGateway>,
        config: EngineConfig,
    ) -> Self {
        let synthesizer = Arc::new(Synthesizer::new(
            tts,
            config.sample_rate,
            config.fallback_audio_path.clone(),
        ));
        Self {
            media,
            stt,
            dialog,
            synthesizer,
            config,
        }
    }

    /// Run the full-duplex loop for one call.
    ///
    /// Returns on the first terminal condition: client cancellation
    /// (`Canceled`), a handshake or stream error (`Upstream`), or every
    /// worker reaching upstream EOF (`Ok`). Exactly one terminal event
    /// (`Stopped` or `Failed`) is emitted before returning, on every path.
    pub async fn run(
        &self,
        session: CallSession,
        cancel: CancelSignal,
        events: mpsc::Sender<PipelineEvent>,
    ) -> Result<(), PipelineError> {
        let call_id = session.call_id.clone();
        let outcome = self.run_call(session, cancel, &events).await;

        match &outcome {
            Ok(()) => {
                tracing::info!(call_id = %call_id, "pipeline ended, upstream streams closed");
                let _ = events.send(PipelineEvent::Stopped).await;
            }
            Err(err) if err.is_canceled() => {
                tracing::info!(call_id = %call_id, "pipeline cancelled by client");
                let _ = events.send(PipelineEvent::Stopped).await;
            }
            Err(err) => {
                tracing::error!(call_id = %call_id, error = %err, "pipeline ended with stream error");
                let _ = events.send(PipelineEvent::Failed(err.to_string())).await;
            }
        }

        outcome
    }

    async fn run_call(
        &self,
        session: CallSession,
        mut cancel: CancelSignal,
        events: &mpsc::Sender<PipelineEvent>,
    ) -> Result<(), PipelineError> {
        if cancel.is_cancelled() {
            return Err(PipelineError::Canceled);
        }

        let trace_id = session.trace_id().to_string();
        tracing::info!(
            call_id = %session.call_id,
            session_id = %session.session_id,
            "starting voice pipeline"
        );

        if !session.media.caller_rtp_addr.is_empty() {
            if let Err(err) = self
                .media
                .warm_up(&trace_id, &session.media.caller_rtp_addr)
                .await
            {
                tracing::warn!(error = %err, "warm-up toward caller failed, continuing");
            }
        }

        let capture = self
            .media
            .open_capture(&trace_id, session.media.server_rtp_port, self.config.sample_rate)
            .await?;
        let (stt_in, transcripts) = self.stt.open_transcription(&trace_id).await?;
        let user_id = session.user_id.as_deref().unwrap_or(UNKNOWN_USER);
        let (dialog_in, tokens) = self
            .dialog
            .open_conversation(&trace_id, &session.session_id, user_id)
            .await?;
        let playback = self.media.open_playback(&trace_id, &session.call_id).await?;

        let _ = events.send(PipelineEvent::Running).await;
        tracing::info!(call_id = %session.call_id, "all channels active, listening");

        let latch = Arc::new(BargeInLatch::new());
        let (errors_tx, mut errors_rx) = mpsc::channel(ERROR_CHANNEL_CAPACITY);
        let (worker_handle, worker_signal) = cancel_pair();

        let ingest = tokio::spawn(run_ingest(
            capture,
            stt_in,
            errors_tx.clone(),
            worker_signal.clone(),
        ));
        let recognize = tokio::spawn(run_recognize(
            transcripts,
            dialog_in,
            Arc::clone(&latch),
            self.config.barge_in_min_chars,
            errors_tx.clone(),
            worker_signal.clone(),
        ));
        let respond = tokio::spawn(run_respond(
            tokens,
            playback,
            Arc::clone(&self.synthesizer),
            Arc::clone(&latch),
            trace_id,
            self.config.default_voice.clone(),
            errors_tx,
            worker_signal,
        ));

        let outcome = tokio::select! {
            _ = cancel.cancelled() => Err(PipelineError::Canceled),
            err = errors_rx.recv() => match err {
                Some(err) => Err(err),
                // All three workers exited cleanly: every stream hit EOF.
                None => Ok(()),
            },
        };

        // Unblock whatever is still running and wait for the streams to be
        // released before reporting the terminal state.
        worker_handle.cancel();
        let _ = tokio::join!(ingest, recognize, respond);

        outcome
    }

    /// One-shot announcement without the duplex loop: warm-up, open
    /// playback, speak once, close. No STT, no dialog, no barge-in source;
    /// the latch is armed purely to keep the synthesizer contract uniform.
    ///
    /// An empty trimmed text is a successful no-op.
    pub async fn speak_text(
        &self,
        call_id: &str,
        text: &str,
        voice_id: &str,
        media: &MediaInfo,
        mut cancel: CancelSignal,
    ) -> Result<(), PipelineError> {
        if cancel.is_cancelled() {
            return Err(PipelineError::Canceled);
        }

        let text = text.trim();
        if text.is_empty() {
            tracing::debug!(call_id = %call_id, "empty announcement, nothing to synthesize");
            return Ok(());
        }
        let voice = if voice_id.is_empty() {
            self.config.default_voice.as_str()
        } else {
            voice_id
        };

        // This RPC carries no session id, so the call id doubles as the
        // trace correlation value.
        let trace_id = call_id;

        if !media.caller_rtp_addr.is_empty() {
            if let Err(err) = self.media.warm_up(trace_id, &media.caller_rtp_addr).await {
                tracing::warn!(error = %err, "warm-up toward caller failed, continuing");
            }
        }

        let mut playback = self.media.open_playback(trace_id, call_id).await?;

        let latch = BargeInLatch::new();
        let mut speech_cancel = latch.arm();
        let spoken = self
            .synthesizer
            .speak(
                trace_id,
                text,
                voice,
                playback.as_mut(),
                &mut cancel,
                &mut speech_cancel,
            )
            .await;
        latch.disarm();
        spoken?;

        if let Err(err) = playback.close().await {
            tracing::warn!(error = %err, "playback ack failed after announcement");
        }
        tracing::debug!(call_id = %call_id, "announcement completed");
        Ok(())
    }
}
