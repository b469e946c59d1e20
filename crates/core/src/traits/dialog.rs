//! Dialog service seam.

use async_trait::async_trait;

use super::TokenStream;
use crate::PipelineError;

#[async_trait]
pub trait DialogGateway: Send + Sync {
    /// Open a conversation. The implementation sends the Config handshake
    /// (session and user identity) before returning.
    async fn open_conversation(
        &self,
        trace_id: &str,
        session_id: &str,
        user_id: &str,
    ) -> Result<(Box<dyn UtteranceSink>, TokenStream), PipelineError>;
}

/// Input half of a conversation.
#[async_trait]
pub trait UtteranceSink: Send {
    /// Deliver one completed utterance: the text frame and the end-of-input
    /// marker are written back to back, with nothing interleaved.
    async fn send_utterance(&mut self, text: &str) -> Result<(), PipelineError>;
}
