//! Respond worker: dialog tokens → sentence-level synthesis.

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::mpsc;

use callflow_core::traits::{PlaybackSink, TokenStream};
use callflow_core::{CancelSignal, PipelineError};

use crate::latch::BargeInLatch;
use crate::sentence::SentenceBuffer;
use crate::synthesizer::Synthesizer;

/// Accumulate dialog tokens and speak each flushed sentence synchronously,
/// so the caller hears them in the order the dialog produced them. The latch
/// is armed for exactly the duration of each synthesis; a barge-in surfaces
/// as `Canceled` from the synthesizer and is not an error.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn run_respond(
    mut tokens: TokenStream,
    mut playback: Box<dyn PlaybackSink>,
    synthesizer: Arc<Synthesizer>,
    latch: Arc<BargeInLatch>,
    trace_id: String,
    voice_id: String,
    errors: mpsc::Sender<PipelineError>,
    mut cancel: CancelSignal,
) {
    let mut sentences = SentenceBuffer::new();
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            event = tokens.next() => match event {
                None => return,
                Some(Ok(token)) => {
                    let Some(text) = sentences.push(&token.text, token.is_final) else {
                        continue;
                    };
                    tracing::info!(response = %text, "synthesizing dialog sentence");

                    let mut speech_cancel = latch.arm();
                    let spoken = synthesizer
                        .speak(
                            &trace_id,
                            &text,
                            &voice_id,
                            playback.as_mut(),
                            &mut cancel,
                            &mut speech_cancel,
                        )
                        .await;
                    latch.disarm();

                    match spoken {
                        Ok(()) => {}
                        // Barge-in or shutdown; the loop re-checks the signal.
                        Err(PipelineError::Canceled) => {}
                        Err(err) => {
                            let _ = errors.try_send(err);
                            return;
                        }
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
