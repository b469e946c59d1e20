//! End-to-end pipeline behavior over in-memory gateways.
//!
//! The fakes speak the same seams as the gRPC clients, so these tests drive
//! the full engine: capture → STT → dialog → synthesis → playback, plus
//! barge-in and the failure paths.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_stream::wrappers::ReceiverStream;

use callflow_core::traits::{
    AudioIngress, AudioStream, DialogGateway, MediaGateway, PlaybackSink, SttGateway,
    TokenStream, TranscriptStream, TtsGateway, UtteranceSink,
};
use callflow_core::{
    cancel_pair, CallSession, CancelHandle, DialogToken, MediaInfo, PipelineError,
    TranscriptEvent,
};
use callflow_pipeline::{CallPipeline, EngineConfig, PipelineEvent};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
enum PlaybackOp {
    Chunk(Vec<u8>),
    Closed,
}

struct FakeMedia {
    capture_rx: Mutex<Option<mpsc::Receiver<Result<Vec<u8>, PipelineError>>>>,
    playback_tx: mpsc::Sender<PlaybackOp>,
    warmups: AtomicUsize,
    captures: AtomicUsize,
    playbacks: AtomicUsize,
}

#[async_trait]
impl MediaGateway for FakeMedia {
    async fn warm_up(&self, _trace_id: &str, _rtp_addr: &str) -> Result<(), PipelineError> {
        self.warmups.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn open_capture(
        &self,
        _trace_id: &str,
        _server_rtp_port: u16,
        _sample_rate: u32,
    ) -> Result<AudioStream, PipelineError> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        let rx = self.capture_rx.lock().take().expect("capture opened twice");
        Ok(Box::pin(ReceiverStream::new(rx)))
    }

    async fn open_playback(
        &self,
        _trace_id: &str,
        _call_id: &str,
    ) -> Result<Box<dyn PlaybackSink>, PipelineError> {
        self.playbacks.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakePlayback {
            tx: self.playback_tx.clone(),
        }))
    }
}

struct FakePlayback {
    tx: mpsc::Sender<PlaybackOp>,
}

#[async_trait]
impl PlaybackSink for FakePlayback {
    async fn send_audio(&mut self, chunk: Vec<u8>) -> Result<(), PipelineError> {
        self.tx
            .send(PlaybackOp::Chunk(chunk))
            .await
            .map_err(|_| PipelineError::upstream("media", "test playback closed"))
    }

    async fn close(&mut self) -> Result<(), PipelineError> {
        let _ = self.tx.send(PlaybackOp::Closed).await;
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
enum SttOp {
    Audio(Vec<u8>),
    Finished,
}

struct FakeStt {
    transcripts_rx: Mutex<Option<mpsc::Receiver<Result<TranscriptEvent, PipelineError>>>>,
    audio_tx: mpsc::Sender<SttOp>,
    opened: AtomicUsize,
    fail_open: bool,
}

#[async_trait]
impl SttGateway for FakeStt {
    async fn open_transcription(
        &self,
        _trace_id: &str,
    ) -> Result<(Box<dyn AudioIngress>, TranscriptStream), PipelineError> {
        if self.fail_open {
            return Err(PipelineError::upstream("stt", "gateway down"));
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        let rx = self
            .transcripts_rx
            .lock()
            .take()
            .expect("transcription opened twice");
        let ingress = FakeIngress {
            tx: self.audio_tx.clone(),
        };
        Ok((Box::new(ingress), Box::pin(ReceiverStream::new(rx))))
    }
}

struct FakeIngress {
    tx: mpsc::Sender<SttOp>,
}

#[async_trait]
impl AudioIngress for FakeIngress {
    async fn send_audio(&mut self, chunk: Vec<u8>) -> Result<(), PipelineError> {
        self.tx
            .send(SttOp::Audio(chunk))
            .await
            .map_err(|_| PipelineError::upstream("stt", "test ingress closed"))
    }

    async fn finish(&mut self) -> Result<(), PipelineError> {
        let _ = self.tx.send(SttOp::Finished).await;
        Ok(())
    }
}

struct FakeDialog {
    tokens_rx: Mutex<Option<mpsc::Receiver<Result<DialogToken, PipelineError>>>>,
    utterances_tx: mpsc::Sender<String>,
    opened: AtomicUsize,
}

#[async_trait]
impl DialogGateway for FakeDialog {
    async fn open_conversation(
        &self,
        _trace_id: &str,
        _session_id: &str,
        _user_id: &str,
    ) -> Result<(Box<dyn UtteranceSink>, TokenStream), PipelineError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        let rx = self
            .tokens_rx
            .lock()
            .take()
            .expect("conversation opened twice");
        let sink = FakeUtteranceSink {
            tx: self.utterances_tx.clone(),
        };
        Ok((Box::new(sink), Box::pin(ReceiverStream::new(rx))))
    }
}

struct FakeUtteranceSink {
    tx: mpsc::Sender<String>,
}

#[async_trait]
impl UtteranceSink for FakeUtteranceSink {
    async fn send_utterance(&mut self, text: &str) -> Result<(), PipelineError> {
        self.tx
            .send(text.to_string())
            .await
            .map_err(|_| PipelineError::upstream("dialog", "conversation stream closed"))
    }
}

/// Scripted behavior for successive synthesis opens.
enum TtsScript {
    /// Emit these chunks, then EOF.
    Chunks(Vec<Vec<u8>>),
    /// Test-controlled stream that stays open until the sender drops.
    Held(mpsc::Receiver<Result<Vec<u8>, PipelineError>>),
    /// The open itself fails (gateway outage).
    FailOpen,
}

struct FakeTts {
    script: Mutex<VecDeque<TtsScript>>,
    requests_tx: mpsc::Sender<String>,
}

#[async_trait]
impl TtsGateway for FakeTts {
    async fn open_synthesis(
        &self,
        _trace_id: &str,
        text: &str,
        _voice_id: &str,
        _sample_rate: u32,
    ) -> Result<AudioStream, PipelineError> {
        let step = self.script.lock().pop_front();
        match step {
            Some(TtsScript::Chunks(chunks)) => {
                let _ = self.requests_tx.send(text.to_string()).await;
                Ok(Box::pin(futures::stream::iter(
                    chunks.into_iter().map(Ok::<_, PipelineError>),
                )))
            }
            Some(TtsScript::Held(rx)) => {
                let _ = self.requests_tx.send(text.to_string()).await;
                Ok(Box::pin(ReceiverStream::new(rx)))
            }
            Some(TtsScript::FailOpen) | None => {
                Err(PipelineError::upstream("tts", "gateway down"))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

struct Harness {
    engine: Arc<CallPipeline>,
    media: Arc<FakeMedia>,
    stt: Arc<FakeStt>,
    dialog: Arc<FakeDialog>,
    capture_tx: mpsc::Sender<Result<Vec<u8>, PipelineError>>,
    transcripts_tx: mpsc::Sender<Result<TranscriptEvent, PipelineError>>,
    tokens_tx: mpsc::Sender<Result<DialogToken, PipelineError>>,
    playback_rx: mpsc::Receiver<PlaybackOp>,
    stt_audio_rx: mpsc::Receiver<SttOp>,
    utterances_rx: mpsc::Receiver<String>,
    tts_requests_rx: mpsc::Receiver<String>,
}

fn harness_with(script: Vec<TtsScript>, config: EngineConfig, stt_fail_open: bool) -> Harness {
    let (capture_tx, capture_rx) = mpsc::channel(32);
    let (playback_tx, playback_rx) = mpsc::channel(64);
    let (transcripts_tx, transcripts_rx) = mpsc::channel(32);
    let (stt_audio_tx, stt_audio_rx) = mpsc::channel(64);
    let (tokens_tx, tokens_rx) = mpsc::channel(32);
    let (utterances_tx, utterances_rx) = mpsc::channel(32);
    let (tts_requests_tx, tts_requests_rx) = mpsc::channel(32);

    let media = Arc::new(FakeMedia {
        capture_rx: Mutex::new(Some(capture_rx)),
        playback_tx,
        warmups: AtomicUsize::new(0),
        captures: AtomicUsize::new(0),
        playbacks: AtomicUsize::new(0),
    });
    let stt = Arc::new(FakeStt {
        transcripts_rx: Mutex::new(Some(transcripts_rx)),
        audio_tx: stt_audio_tx,
        opened: AtomicUsize::new(0),
        fail_open: stt_fail_open,
    });
    let dialog = Arc::new(FakeDialog {
        tokens_rx: Mutex::new(Some(tokens_rx)),
        utterances_tx,
        opened: AtomicUsize::new(0),
    });
    let tts = Arc::new(FakeTts {
        script: Mutex::new(script.into()),
        requests_tx: tts_requests_tx,
    });

    let engine = Arc::new(CallPipeline::new(
        Arc::clone(&media) as Arc<dyn MediaGateway>,
        Arc::clone(&stt) as Arc<dyn SttGateway>,
        Arc::clone(&dialog) as Arc<dyn DialogGateway>,
        tts as Arc<dyn TtsGateway>,
        config,
    ));

    Harness {
        engine,
        media,
        stt,
        dialog,
        capture_tx,
        transcripts_tx,
        tokens_tx,
        playback_rx,
        stt_audio_rx,
        utterances_rx,
        tts_requests_rx,
    }
}

fn harness(script: Vec<TtsScript>) -> Harness {
    harness_with(script, EngineConfig::default(), false)
}

fn session() -> CallSession {
    CallSession::new(
        "call-1",
        "session-1",
        None,
        MediaInfo {
            server_rtp_port: 40_000,
            caller_rtp_addr: "203.0.113.7:40002".to_string(),
        },
    )
}

struct RunningCall {
    handle: CancelHandle,
    events_rx: mpsc::Receiver<PipelineEvent>,
    done: JoinHandle<Result<(), PipelineError>>,
}

fn start(engine: Arc<CallPipeline>) -> RunningCall {
    let (handle, signal) = cancel_pair();
    let (events_tx, events_rx) = mpsc::channel(8);
    let done = tokio::spawn(async move { engine.run(session(), signal, events_tx).await });
    RunningCall {
        handle,
        events_rx,
        done,
    }
}

async fn recv<T>(rx: &mut mpsc::Receiver<T>) -> T {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for channel")
        .expect("channel closed")
}

fn partial(text: &str) -> Result<TranscriptEvent, PipelineError> {
    Ok(TranscriptEvent {
        text: text.to_string(),
        is_final: false,
    })
}

fn final_transcript(text: &str) -> Result<TranscriptEvent, PipelineError> {
    Ok(TranscriptEvent {
        text: text.to_string(),
        is_final: true,
    })
}

fn token(text: &str) -> Result<DialogToken, PipelineError> {
    Ok(DialogToken {
        text: text.to_string(),
        is_final: false,
    })
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn single_turn_synthesizes_one_sentence() {
    let mut h = harness(vec![TtsScript::Chunks(vec![vec![1; 160], vec![2; 160]])]);
    let mut call = start(Arc::clone(&h.engine));

    assert_eq!(recv(&mut call.events_rx).await, PipelineEvent::Running);

    // Caller audio passes through to STT unmodified.
    h.capture_tx.send(Ok(vec![7; 320])).await.unwrap();
    assert_eq!(recv(&mut h.stt_audio_rx).await, SttOp::Audio(vec![7; 320]));

    // Interim hypotheses are never forwarded to dialog.
    h.transcripts_tx.send(partial("me")).await.unwrap();
    h.transcripts_tx.send(partial("merh")).await.unwrap();
    h.transcripts_tx
        .send(final_transcript("merhaba"))
        .await
        .unwrap();
    assert_eq!(recv(&mut h.utterances_rx).await, "merhaba");

    // Tokens buffer until the `?` arrives, then exactly one synthesis runs.
    h.tokens_tx.send(token("Merhaba")).await.unwrap();
    h.tokens_tx.send(token(", nasıl")).await.unwrap();
    h.tokens_tx
        .send(token(" yardımcı olabilirim?"))
        .await
        .unwrap();
    assert_eq!(
        recv(&mut h.tts_requests_rx).await,
        "Merhaba, nasıl yardımcı olabilirim?"
    );

    assert_eq!(recv(&mut h.playback_rx).await, PlaybackOp::Chunk(vec![1; 160]));
    assert_eq!(recv(&mut h.playback_rx).await, PlaybackOp::Chunk(vec![2; 160]));
    assert!(h.tts_requests_rx.try_recv().is_err(), "one synthesis only");

    call.handle.cancel();
    let outcome = call.done.await.unwrap();
    assert!(matches!(outcome, Err(PipelineError::Canceled)));
    assert_eq!(recv(&mut call.events_rx).await, PipelineEvent::Stopped);
}

#[tokio::test(start_paused = true)]
async fn barge_in_silences_playback_but_keeps_streams_open() {
    let (held_tx, held_rx) = mpsc::channel(8);
    let mut h = harness(vec![
        TtsScript::Held(held_rx),
        TtsScript::Chunks(vec![vec![9; 10]]),
    ]);
    let mut call = start(Arc::clone(&h.engine));
    assert_eq!(recv(&mut call.events_rx).await, PipelineEvent::Running);

    // Kick off a synthesis that stays on the air under test control.
    h.tokens_tx
        .send(token("Size nasıl yardımcı olabilirim?"))
        .await
        .unwrap();
    assert_eq!(
        recv(&mut h.tts_requests_rx).await,
        "Size nasıl yardımcı olabilirim?"
    );
    held_tx.send(Ok(vec![1; 100])).await.unwrap();
    assert_eq!(recv(&mut h.playback_rx).await, PlaybackOp::Chunk(vec![1; 100]));

    // A trimmed partial of exactly the threshold length does not barge in.
    h.transcripts_tx.send(partial("dur")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    held_tx.send(Ok(vec![2; 100])).await.unwrap();
    assert_eq!(
        recv(&mut h.playback_rx).await,
        PlaybackOp::Chunk(vec![2; 100]),
        "length == threshold must not interrupt"
    );

    // One char over the threshold silences the bot within a chunk boundary.
    h.transcripts_tx.send(partial("dura")).await.unwrap();
    timeout(Duration::from_secs(5), held_tx.closed())
        .await
        .expect("synthesis was not cancelled");

    // The quartet survives: finals still reach dialog, and the next
    // sentence synthesizes on the same playback stream.
    h.transcripts_tx
        .send(final_transcript("dur artık"))
        .await
        .unwrap();
    assert_eq!(recv(&mut h.utterances_rx).await, "dur artık");

    h.tokens_tx.send(token("Tamam.")).await.unwrap();
    assert_eq!(recv(&mut h.tts_requests_rx).await, "Tamam.");
    assert_eq!(recv(&mut h.playback_rx).await, PlaybackOp::Chunk(vec![9; 10]));

    call.handle.cancel();
    assert!(matches!(
        call.done.await.unwrap(),
        Err(PipelineError::Canceled)
    ));
}

#[tokio::test(start_paused = true)]
async fn oversized_token_flushes_without_punctuation() {
    let mut h = harness(vec![TtsScript::Chunks(vec![vec![1; 8]])]);
    let mut call = start(Arc::clone(&h.engine));
    assert_eq!(recv(&mut call.events_rx).await, PipelineEvent::Running);

    let long = "a".repeat(120);
    h.tokens_tx.send(token(&long)).await.unwrap();
    assert_eq!(recv(&mut h.tts_requests_rx).await, long);

    call.handle.cancel();
    let _ = call.done.await.unwrap();
}

#[tokio::test]
async fn tts_outage_streams_fallback_and_half_closes() {
    let fallback = std::env::temp_dir().join(format!(
        "callflow-fallback-{}.wav",
        std::process::id()
    ));
    std::fs::write(&fallback, vec![0x42u8; 2500]).unwrap();

    let config = EngineConfig {
        fallback_audio_path: fallback.clone(),
        ..EngineConfig::default()
    };
    let mut h = harness_with(vec![TtsScript::FailOpen], config, false);
    let mut call = start(Arc::clone(&h.engine));
    assert_eq!(recv(&mut call.events_rx).await, PipelineEvent::Running);

    h.tokens_tx.send(token("Bir saniye.")).await.unwrap();

    // The announcement streams in fixed-size chunks, then the outbound
    // direction half-closes. The pipeline itself stays up.
    assert_eq!(recv(&mut h.playback_rx).await, PlaybackOp::Chunk(vec![0x42; 1024]));
    assert_eq!(recv(&mut h.playback_rx).await, PlaybackOp::Chunk(vec![0x42; 1024]));
    assert_eq!(recv(&mut h.playback_rx).await, PlaybackOp::Chunk(vec![0x42; 452]));
    assert_eq!(recv(&mut h.playback_rx).await, PlaybackOp::Closed);

    call.handle.cancel();
    assert!(matches!(
        call.done.await.unwrap(),
        Err(PipelineError::Canceled)
    ));

    let _ = std::fs::remove_file(&fallback);
}

#[tokio::test(start_paused = true)]
async fn client_cancel_releases_every_stream() {
    let h = harness(vec![]);
    let mut call = start(Arc::clone(&h.engine));
    assert_eq!(recv(&mut call.events_rx).await, PipelineEvent::Running);

    call.handle.cancel();
    let outcome = call.done.await.unwrap();
    assert!(matches!(outcome, Err(PipelineError::Canceled)));
    assert_eq!(recv(&mut call.events_rx).await, PipelineEvent::Stopped);

    // Workers dropped their stream halves on the way out.
    timeout(Duration::from_secs(5), h.capture_tx.closed())
        .await
        .expect("capture stream not released");
    timeout(Duration::from_secs(5), h.tokens_tx.closed())
        .await
        .expect("dialog stream not released");
}

#[tokio::test(start_paused = true)]
async fn pre_cancelled_request_opens_no_streams() {
    let h = harness(vec![]);
    let (handle, signal) = cancel_pair();
    handle.cancel();
    let (events_tx, mut events_rx) = mpsc::channel(8);

    let outcome = h.engine.run(session(), signal, events_tx).await;
    assert!(matches!(outcome, Err(PipelineError::Canceled)));
    assert_eq!(recv(&mut events_rx).await, PipelineEvent::Stopped);

    assert_eq!(h.media.warmups.load(Ordering::SeqCst), 0);
    assert_eq!(h.media.captures.load(Ordering::SeqCst), 0);
    assert_eq!(h.media.playbacks.load(Ordering::SeqCst), 0);
    assert_eq!(h.stt.opened.load(Ordering::SeqCst), 0);
    assert_eq!(h.dialog.opened.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn handshake_failure_names_the_upstream() {
    let h = harness_with(vec![], EngineConfig::default(), true);
    let (_handle, signal) = cancel_pair();
    let (events_tx, mut events_rx) = mpsc::channel(8);

    let outcome = h.engine.run(session(), signal, events_tx).await;
    match outcome {
        Err(PipelineError::Upstream { name, .. }) => assert_eq!(name, "stt"),
        other => panic!("expected stt upstream error, got {other:?}"),
    }
    assert!(matches!(
        recv(&mut events_rx).await,
        PipelineEvent::Failed(_)
    ));
}

#[tokio::test(start_paused = true)]
async fn worker_error_cancels_the_siblings() {
    let h = harness(vec![]);
    let mut call = start(Arc::clone(&h.engine));
    assert_eq!(recv(&mut call.events_rx).await, PipelineEvent::Running);

    // Kill the dialog input side; the next utterance forward is fatal.
    drop(h.utterances_rx);
    h.transcripts_tx
        .send(final_transcript("merhaba"))
        .await
        .unwrap();

    let outcome = call.done.await.unwrap();
    match outcome {
        Err(PipelineError::Upstream { name, .. }) => assert_eq!(name, "dialog"),
        other => panic!("expected dialog upstream error, got {other:?}"),
    }
    assert!(matches!(
        recv(&mut call.events_rx).await,
        PipelineEvent::Failed(_)
    ));

    // The sibling streams were released too.
    timeout(Duration::from_secs(5), h.capture_tx.closed())
        .await
        .expect("capture stream not released");
}

#[tokio::test(start_paused = true)]
async fn capture_eof_half_closes_transcription() {
    let mut h = harness(vec![]);
    let mut call = start(Arc::clone(&h.engine));
    assert_eq!(recv(&mut call.events_rx).await, PipelineEvent::Running);

    h.capture_tx.send(Ok(vec![1; 10])).await.unwrap();
    assert_eq!(recv(&mut h.stt_audio_rx).await, SttOp::Audio(vec![1; 10]));

    // Dropping the capture sender is upstream EOF.
    drop(h.capture_tx);
    assert_eq!(recv(&mut h.stt_audio_rx).await, SttOp::Finished);

    // The other workers keep running until the call ends.
    h.transcripts_tx
        .send(final_transcript("bitti"))
        .await
        .unwrap();
    assert_eq!(recv(&mut h.utterances_rx).await, "bitti");

    call.handle.cancel();
    let _ = call.done.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn sub_threshold_partial_changes_nothing() {
    let mut h = harness(vec![]);
    let mut call = start(Arc::clone(&h.engine));
    assert_eq!(recv(&mut call.events_rx).await, PipelineEvent::Running);

    // Nothing is speaking and the hypothesis is short: no dialog forward,
    // no synthesis, no playback.
    h.transcripts_tx.send(partial("hm")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(h.utterances_rx.try_recv().is_err());
    assert!(h.tts_requests_rx.try_recv().is_err());
    assert!(h.playback_rx.try_recv().is_err());

    call.handle.cancel();
    let _ = call.done.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn whitespace_final_token_synthesizes_nothing() {
    let mut h = harness(vec![]);
    let mut call = start(Arc::clone(&h.engine));
    assert_eq!(recv(&mut call.events_rx).await, PipelineEvent::Running);

    h.tokens_tx
        .send(Ok(DialogToken {
            text: "   ".to_string(),
            is_final: true,
        }))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(h.tts_requests_rx.try_recv().is_err());

    call.handle.cancel();
    let _ = call.done.await.unwrap();
}

// ---------------------------------------------------------------------------
// SpeakText path
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn speak_text_plays_once_and_closes() {
    let mut h = harness(vec![TtsScript::Chunks(vec![vec![5; 64]])]);
    let (_handle, signal) = cancel_pair();

    let media = MediaInfo {
        server_rtp_port: 0,
        caller_rtp_addr: "203.0.113.7:40002".to_string(),
    };
    h.engine
        .speak_text("call-9", "Hoş geldiniz.", "tr-announcer", &media, signal)
        .await
        .unwrap();

    assert_eq!(recv(&mut h.tts_requests_rx).await, "Hoş geldiniz.");
    assert_eq!(recv(&mut h.playback_rx).await, PlaybackOp::Chunk(vec![5; 64]));
    assert_eq!(recv(&mut h.playback_rx).await, PlaybackOp::Closed);
    assert_eq!(h.media.warmups.load(Ordering::SeqCst), 1);
    assert_eq!(h.media.playbacks.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn speak_text_with_blank_text_is_a_no_op() {
    let h = harness(vec![]);
    let (_handle, signal) = cancel_pair();

    let media = MediaInfo {
        server_rtp_port: 0,
        caller_rtp_addr: String::new(),
    };
    h.engine
        .speak_text("call-9", "   ", "tr-announcer", &media, signal)
        .await
        .unwrap();

    assert_eq!(h.media.playbacks.load(Ordering::SeqCst), 0);
    assert_eq!(h.media.warmups.load(Ordering::SeqCst), 0);
}
