//! Core types for the callflow voice-dialog service
//!
//! This crate provides the foundations shared by the other crates:
//! - Call session and media addressing types
//! - Transcript and dialog-token events
//! - Gateway traits for the four upstream collaborators
//! - Cooperative cancellation handles
//! - The pipeline error type

pub mod call;
pub mod cancel;
pub mod events;
pub mod traits;

pub use call::{CallSession, MediaInfo};
pub use cancel::{cancel_pair, CancelHandle, CancelSignal};
pub use events::{DialogToken, TranscriptEvent};
pub use traits::{
    AudioIngress, AudioStream, DialogGateway, MediaGateway, PlaybackSink, SttGateway,
    TokenStream, TranscriptStream, TtsGateway, UtteranceSink,
};

use thiserror::Error;

/// Errors surfaced by a pipeline instance.
///
/// A pipeline reports at most one of these per call: workers hand the first
/// fatal error to the orchestrator and exit, and the orchestrator cancels
/// the siblings before returning it.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The request did not carry the media addressing block.
    #[error("media_info is required")]
    MissingMediaInfo,

    /// An upstream stream failed to open, handshake, send or receive.
    #[error("{name} upstream failed: {message}")]
    Upstream { name: &'static str, message: String },

    /// The request was cancelled by the invoking client, or a synthesis was
    /// cut short by barge-in.
    #[error("canceled")]
    Canceled,
}

impl PipelineError {
    /// Shorthand for wrapping an upstream failure with the dependency name.
    pub fn upstream(name: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Upstream {
            name,
            message: err.to_string(),
        }
    }

    /// Cancellation is a clean exit, not a fault.
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }
}
