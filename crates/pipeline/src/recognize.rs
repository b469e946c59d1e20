//! Recognize worker: STT → dialog, plus the barge-in trigger.

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::mpsc;

use callflow_core::traits::{TranscriptStream, UtteranceSink};
use callflow_core::{CancelSignal, PipelineError};

use crate::latch::BargeInLatch;

/// Consume transcript events. An interim hypothesis longer than the
/// threshold means the caller started talking over the bot: silence the
/// active synthesis but keep every stream open and keep listening. Final
/// transcripts are forwarded to the dialog service as completed utterances;
/// interim ones never are.
pub(crate) async fn run_recognize(
    mut transcripts: TranscriptStream,
    mut dialog: Box<dyn UtteranceSink>,
    latch: Arc<BargeInLatch>,
    barge_in_min_chars: usize,
    errors: mpsc::Sender<PipelineError>,
    mut cancel: CancelSignal,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            event = transcripts.next() => match event {
                None => return,
                Some(Ok(event)) => {
                    let text = event.text.trim();
                    if event.is_final {
                        tracing::info!(utterance = %text, "caller utterance complete");
                        if let Err(err) = dialog.send_utterance(text).await {
                            let _ = errors.try_send(err);
                            return;
                        }
                    } else if text.chars().count() > barge_in_min_chars && latch.interrupt() {
                        tracing::info!(partial = %text, "barge-in: caller talking, playback silenced");
                    }
                }
                Some(Err(err)) => {
                    let _ = errors.try_send(err);
                    return;
                }
            },
        }
    }
}
