//! Per-call voice pipeline engine
//!
//! For one phone call, this crate splices four upstream streams (media
//! capture, STT, dialog and TTS) into a full-duplex conversational loop:
//! - Ingest forwards caller audio into the transcription stream
//! - Recognize turns final transcripts into dialog utterances and fires
//!   barge-in on interim ones
//! - Respond segments the dialog token stream into sentences and feeds the
//!   synthesizer
//! - The synthesizer pipes TTS audio into outbound playback, cancellable
//!   mid-flight within one chunk boundary

pub mod latch;
pub mod orchestrator;
pub mod sentence;
pub mod synthesizer;

mod ingest;
mod recognize;
mod respond;

pub use latch::BargeInLatch;
pub use orchestrator::{CallPipeline, EngineConfig, PipelineEvent};
pub use sentence::SentenceBuffer;
pub use synthesizer::Synthesizer;
