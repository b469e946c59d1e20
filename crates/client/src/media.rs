//! Media gateway over gRPC.

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tonic::transport::Channel;
use tonic::{Response, Status};

use callflow_contracts::media::media_service_client::MediaServiceClient;
use callflow_contracts::media::{
    PlayAudioRequest, RecordAudioRequest, StreamAudioToCallRequest, StreamAudioToCallResponse,
};
use callflow_core::traits::{AudioStream, MediaGateway, PlaybackSink};
use callflow_core::PipelineError;

use crate::traced_request;

/// Asset the media gateway plays for the NAT warm-up.
const WARMUP_AUDIO_ID: &str = "system/warmup";

const UPSTREAM: &str = "media";

pub struct GrpcMediaGateway {
    client: MediaServiceClient<Channel>,
}

impl GrpcMediaGateway {
    pub fn new(client: MediaServiceClient<Channel>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MediaGateway for GrpcMediaGateway {
    async fn warm_up(&self, trace_id: &str, rtp_addr: &str) -> Result<(), PipelineError> {
        let request = traced_request(
            PlayAudioRequest {
                rtp_addr: rtp_addr.to_string(),
                audio_id: WARMUP_AUDIO_ID.to_string(),
            },
            trace_id,
        );
        self.client
            .clone()
            .play_audio(request)
            .await
            .map_err(|status| PipelineError::upstream(UPSTREAM, status))?;
        Ok(())
    }

    async fn open_capture(
        &self,
        trace_id: &str,
        server_rtp_port: u16,
        sample_rate: u32,
    ) -> Result<AudioStream, PipelineError> {
        let request = traced_request(
            RecordAudioRequest {
                server_rtp_port: u32::from(server_rtp_port),
                target_sample_rate: Some(sample_rate),
            },
            trace_id,
        );
        let frames = self
            .client
            .clone()
            .record_audio(request)
            .await
            .map_err(|status| PipelineError::upstream(UPSTREAM, status))?
            .into_inner();

        Ok(Box::pin(frames.map(|frame| {
            frame
                .map(|f| f.audio_data)
                .map_err(|status| PipelineError::upstream(UPSTREAM, status))
        })))
    }

    async fn open_playback(
        &self,
        trace_id: &str,
        call_id: &str,
    ) -> Result<Box<dyn PlaybackSink>, PipelineError> {
        let (tx, rx) = mpsc::channel::<StreamAudioToCallRequest>(32);

        // Handshake frame goes first on the wire; it only carries the call id.
        tx.send(StreamAudioToCallRequest {
            call_id: call_id.to_string(),
            audio_chunk: Vec::new(),
        })
        .await
        .map_err(|_| PipelineError::upstream(UPSTREAM, "playback channel closed"))?;

        let mut client = self.client.clone();
        let request = traced_request(ReceiverStream::new(rx), trace_id);
        let ack = tokio::spawn(async move { client.stream_audio_to_call(request).await });

        Ok(Box::new(GrpcPlaybackSink {
            tx: Some(tx),
            ack: Some(ack),
        }))
    }
}

/// Outbound playback over a client-streamed call. Dropping the sender
/// half-closes the stream; the spawned call then yields the gateway's ack.
struct GrpcPlaybackSink {
    tx: Option<mpsc::Sender<StreamAudioToCallRequest>>,
    ack: Option<JoinHandle<Result<Response<StreamAudioToCallResponse>, Status>>>,
}

impl GrpcPlaybackSink {
    /// Pull the terminal status out of the spawned call after the stream
    /// broke or was closed.
    async fn take_ack(&mut self) -> Result<(), PipelineError> {
        match self.ack.take() {
            Some(handle) => match handle.await {
                Ok(Ok(_)) => Ok(()),
                Ok(Err(status)) => Err(PipelineError::upstream(UPSTREAM, status)),
                Err(join) => Err(PipelineError::upstream(UPSTREAM, join)),
            },
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PlaybackSink for GrpcPlaybackSink {
    async fn send_audio(&mut self, chunk: Vec<u8>) -> Result<(), PipelineError> {
        let Some(tx) = self.tx.as_ref() else {
            return Err(PipelineError::upstream(UPSTREAM, "playback stream already closed"));
        };
        let frame = StreamAudioToCallRequest {
            call_id: String::new(),
            audio_chunk: chunk,
        };
        if tx.send(frame).await.is_ok() {
            return Ok(());
        }

        // The call terminated under us; surface its status instead of a bare
        // channel error.
        self.tx = None;
        match self.take_ack().await {
            Ok(()) => Err(PipelineError::upstream(UPSTREAM, "playback stream closed by gateway")),
            Err(err) => Err(err),
        }
    }

    async fn close(&mut self) -> Result<(), PipelineError> {
        self.tx = None;
        self.take_ack().await
    }
}
