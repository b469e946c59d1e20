//! Gateway seams for the four upstream collaborators.
//!
//! The pipeline engine is written against these traits; the client crate
//! implements them over tonic streams, and tests implement them over plain
//! channels. Every method that opens a stream takes the trace id so the
//! implementation can attach it as the `x-trace-id` header.

mod dialog;
mod media;
mod stt;
mod tts;

pub use dialog::{DialogGateway, UtteranceSink};
pub use media::{MediaGateway, PlaybackSink};
pub use stt::{AudioIngress, SttGateway};
pub use tts::TtsGateway;

use std::pin::Pin;

use futures::Stream;

use crate::events::{DialogToken, TranscriptEvent};
use crate::PipelineError;

/// Stream of raw PCM chunks from an upstream. Ends (yields `None`) on clean
/// EOF; any non-EOF failure is surfaced as an `Err` item.
pub type AudioStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, PipelineError>> + Send>>;

/// Stream of transcript hypotheses from the STT gateway.
pub type TranscriptStream =
    Pin<Box<dyn Stream<Item = Result<TranscriptEvent, PipelineError>> + Send>>;

/// Stream of incremental response tokens from the dialog service.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<DialogToken, PipelineError>> + Send>>;
