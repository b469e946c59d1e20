//! STT gateway over gRPC.

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::transport::Channel;

use callflow_contracts::stt::stt_gateway_service_client::SttGatewayServiceClient;
use callflow_contracts::stt::TranscribeStreamRequest;
use callflow_core::traits::{AudioIngress, SttGateway, TranscriptStream};
use callflow_core::{PipelineError, TranscriptEvent};

use crate::traced_request;

const UPSTREAM: &str = "stt";

pub struct GrpcSttGateway {
    client: SttGatewayServiceClient<Channel>,
}

impl GrpcSttGateway {
    pub fn new(client: SttGatewayServiceClient<Channel>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SttGateway for GrpcSttGateway {
    async fn open_transcription(
        &self,
        trace_id: &str,
    ) -> Result<(Box<dyn AudioIngress>, TranscriptStream), PipelineError> {
        let (tx, rx) = mpsc::channel::<TranscribeStreamRequest>(32);

        let request = traced_request(ReceiverStream::new(rx), trace_id);
        let hypotheses = self
            .client
            .clone()
            .transcribe_stream(request)
            .await
            .map_err(|status| PipelineError::upstream(UPSTREAM, status))?
            .into_inner();

        let transcripts: TranscriptStream = Box::pin(hypotheses.map(|event| {
            event
                .map(|e| TranscriptEvent {
                    text: e.partial_transcription,
                    is_final: e.is_final,
                })
                .map_err(|status| PipelineError::upstream(UPSTREAM, status))
        }));

        Ok((Box::new(GrpcAudioIngress { tx: Some(tx) }), transcripts))
    }
}

/// Audio half of the transcription call. Dropping the sender half-closes,
/// which tells the gateway no more audio is coming.
struct GrpcAudioIngress {
    tx: Option<mpsc::Sender<TranscribeStreamRequest>>,
}

#[async_trait]
impl AudioIngress for GrpcAudioIngress {
    async fn send_audio(&mut self, chunk: Vec<u8>) -> Result<(), PipelineError> {
        let Some(tx) = self.tx.as_ref() else {
            return Err(PipelineError::upstream(UPSTREAM, "transcription stream already closed"));
        };
        tx.send(TranscribeStreamRequest { audio_chunk: chunk })
            .await
            .map_err(|_| PipelineError::upstream(UPSTREAM, "transcription stream closed"))
    }

    async fn finish(&mut self) -> Result<(), PipelineError> {
        self.tx = None;
        Ok(())
    }
}
