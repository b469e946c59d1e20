//! TTS gateway over gRPC.

use async_trait::async_trait;
use futures::StreamExt;
use tonic::transport::Channel;

use callflow_contracts::tts::tts_gateway_service_client::TtsGatewayServiceClient;
use callflow_contracts::tts::{AudioConfig, AudioFormat, SynthesizeStreamRequest};
use callflow_core::traits::{AudioStream, TtsGateway};
use callflow_core::PipelineError;

use crate::traced_request;

const UPSTREAM: &str = "tts";

pub struct GrpcTtsGateway {
    client: TtsGatewayServiceClient<Channel>,
}

impl GrpcTtsGateway {
    pub fn new(client: TtsGatewayServiceClient<Channel>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TtsGateway for GrpcTtsGateway {
    async fn open_synthesis(
        &self,
        trace_id: &str,
        text: &str,
        voice_id: &str,
        sample_rate: u32,
    ) -> Result<AudioStream, PipelineError> {
        let request = traced_request(
            SynthesizeStreamRequest {
                text: text.to_string(),
                voice_id: voice_id.to_string(),
                audio_config: Some(AudioConfig {
                    sample_rate_hertz: sample_rate,
                    audio_format: AudioFormat::PcmS16le as i32,
                }),
            },
            trace_id,
        );

        let chunks = self
            .client
            .clone()
            .synthesize_stream(request)
            .await
            .map_err(|status| PipelineError::upstream(UPSTREAM, status))?
            .into_inner();

        Ok(Box::pin(chunks.map(|chunk| {
            chunk
                .map(|c| c.audio_content)
                .map_err(|status| PipelineError::upstream(UPSTREAM, status))
        })))
    }
}
