//! Ingest worker: media capture → STT.

use futures::StreamExt;
use tokio::sync::mpsc;

use callflow_core::traits::{AudioIngress, AudioStream};
use callflow_core::{CancelSignal, PipelineError};

/// Forward inbound PCM frames into the transcription stream, unmodified.
/// Capture EOF half-closes the STT ingress and ends the worker; anything
/// else fatal is reported once and the worker exits.
pub(crate) async fn run_ingest(
    mut capture: AudioStream,
    mut stt_in: Box<dyn AudioIngress>,
    errors: mpsc::Sender<PipelineError>,
    mut cancel: CancelSignal,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            frame = capture.next() => match frame {
                None => {
                    // Caller audio ended; tell STT no more is coming.
                    if let Err(err) = stt_in.finish().await {
                        let _ = errors.try_send(err);
                    }
                    return;
                }
                Some(Ok(chunk)) => {
                    if let Err(err) = stt_in.send_audio(chunk).await {
                        let _ = errors.try_send(err);
                        return;
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
