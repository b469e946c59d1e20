//! Dialog service over gRPC.

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::transport::Channel;

use callflow_contracts::dialog::dialog_service_client::DialogServiceClient;
use callflow_contracts::dialog::stream_conversation_request::Payload;
use callflow_contracts::dialog::{ConversationConfig, StreamConversationRequest};
use callflow_core::traits::{DialogGateway, TokenStream, UtteranceSink};
use callflow_core::{DialogToken, PipelineError};

use crate::traced_request;

const UPSTREAM: &str = "dialog";

pub struct GrpcDialogGateway {
    client: DialogServiceClient<Channel>,
}

impl GrpcDialogGateway {
    pub fn new(client: DialogServiceClient<Channel>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DialogGateway for GrpcDialogGateway {
    async fn open_conversation(
        &self,
        trace_id: &str,
        session_id: &str,
        user_id: &str,
    ) -> Result<(Box<dyn UtteranceSink>, TokenStream), PipelineError> {
        let (tx, rx) = mpsc::channel::<StreamConversationRequest>(32);

        // Config handshake is the first frame on the wire.
        tx.send(StreamConversationRequest {
            payload: Some(Payload::Config(ConversationConfig {
                session_id: session_id.to_string(),
                user_id: user_id.to_string(),
            })),
        })
        .await
        .map_err(|_| PipelineError::upstream(UPSTREAM, "conversation channel closed"))?;

        let request = traced_request(ReceiverStream::new(rx), trace_id);
        let responses = self
            .client
            .clone()
            .stream_conversation(request)
            .await
            .map_err(|status| PipelineError::upstream(UPSTREAM, status))?
            .into_inner();

        let tokens: TokenStream = Box::pin(responses.map(|event| {
            event
                .map(|e| DialogToken {
                    text: e.text_response,
                    is_final: e.is_final_response,
                })
                .map_err(|status| PipelineError::upstream(UPSTREAM, status))
        }));

        Ok((Box::new(GrpcUtteranceSink { tx }), tokens))
    }
}

struct GrpcUtteranceSink {
    tx: mpsc::Sender<StreamConversationRequest>,
}

#[async_trait]
impl UtteranceSink for GrpcUtteranceSink {
    async fn send_utterance(&mut self, text: &str) -> Result<(), PipelineError> {
        // The service's contract for "utterance complete, please respond":
        // the text frame immediately followed by the end-of-input marker.
        self.tx
            .send(StreamConversationRequest {
                payload: Some(Payload::TextInput(text.to_string())),
            })
            .await
            .map_err(|_| PipelineError::upstream(UPSTREAM, "conversation stream closed"))?;
        self.tx
            .send(StreamConversationRequest {
                payload: Some(Payload::IsFinalInput(true)),
            })
            .await
            .map_err(|_| PipelineError::upstream(UPSTREAM, "conversation stream closed"))
    }
}
