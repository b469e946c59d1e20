//! gRPC surface: RunPipeline, SpeakText and the legacy unary stubs.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status};

use callflow_contracts::telephony::telephony_action_service_server::TelephonyActionService;
use callflow_contracts::telephony::{
    BridgeCallRequest, BridgeCallResponse, PipelineState, PlayAudioRequest, PlayAudioResponse,
    RunPipelineRequest, RunPipelineResponse, SendTextMessageRequest, SendTextMessageResponse,
    SpeakTextRequest, SpeakTextResponse, StartRecordingRequest, StartRecordingResponse,
    StopRecordingRequest, StopRecordingResponse, TerminateCallRequest, TerminateCallResponse,
};
use callflow_core::{cancel_pair, CallSession, MediaInfo, PipelineError};
use callflow_pipeline::{CallPipeline, PipelineEvent};

pub struct TelephonyServer {
    pipeline: Arc<CallPipeline>,
}

impl TelephonyServer {
    pub fn new(pipeline: Arc<CallPipeline>) -> Self {
        Self { pipeline }
    }
}

/// Narrow the wire-level media block into the engine's form. Absence is a
/// precondition failure, surfaced before any upstream stream is opened.
fn media_info_from(
    proto: Option<callflow_contracts::telephony::MediaInfo>,
) -> Result<MediaInfo, Status> {
    let info = proto.ok_or_else(|| Status::failed_precondition("media_info is required"))?;
    let server_rtp_port = u16::try_from(info.server_rtp_port)
        .map_err(|_| Status::invalid_argument("server_rtp_port out of range"))?;
    Ok(MediaInfo {
        server_rtp_port,
        caller_rtp_addr: info.caller_rtp_addr,
    })
}

fn status_from(err: PipelineError) -> Status {
    match err {
        PipelineError::MissingMediaInfo => Status::failed_precondition(err.to_string()),
        PipelineError::Canceled => Status::cancelled(err.to_string()),
        PipelineError::Upstream { .. } => Status::unavailable(err.to_string()),
    }
}

fn status_frame(state: PipelineState, message: impl Into<String>) -> RunPipelineResponse {
    RunPipelineResponse {
        state: state as i32,
        message: message.into(),
    }
}

#[tonic::async_trait]
impl TelephonyActionService for TelephonyServer {
    type RunPipelineStream = ReceiverStream<Result<RunPipelineResponse, Status>>;

    async fn run_pipeline(
        &self,
        request: Request<RunPipelineRequest>,
    ) -> Result<Response<Self::RunPipelineStream>, Status> {
        let req = request.into_inner();
        let media = media_info_from(req.media_info)?;
        let session = CallSession::new(req.call_id, req.session_id, None, media);
        tracing::info!(call_id = %session.call_id, session_id = %session.session_id, "RunPipeline accepted");

        let (frames_tx, frames_rx) = mpsc::channel(8);
        let (events_tx, mut events_rx) = mpsc::channel(8);
        let (cancel_handle, cancel_signal) = cancel_pair();
        let pipeline = Arc::clone(&self.pipeline);

        tokio::spawn(async move {
            let call =
                tokio::spawn(async move { pipeline.run(session, cancel_signal, events_tx).await });

            // Relay engine events as status frames; a client that drops the
            // response stream cancels the whole call.
            let mut client_gone = false;
            loop {
                tokio::select! {
                    event = events_rx.recv() => match event {
                        Some(event) => {
                            let frame = match event {
                                PipelineEvent::Running => {
                                    status_frame(PipelineState::Running, "pipeline running")
                                }
                                PipelineEvent::Stopped => {
                                    status_frame(PipelineState::Stopped, "pipeline stopped")
                                }
                                PipelineEvent::Failed(message) => {
                                    status_frame(PipelineState::Error, message)
                                }
                            };
                            if frames_tx.send(Ok(frame)).await.is_err() && !client_gone {
                                client_gone = true;
                                cancel_handle.cancel();
                            }
                        }
                        None => break,
                    },
                    _ = frames_tx.closed(), if !client_gone => {
                        client_gone = true;
                        cancel_handle.cancel();
                    }
                }
            }

            let _ = call.await;
        });

        Ok(Response::new(ReceiverStream::new(frames_rx)))
    }

    async fn speak_text(
        &self,
        request: Request<SpeakTextRequest>,
    ) -> Result<Response<SpeakTextResponse>, Status> {
        let req = request.into_inner();
        let media = media_info_from(req.media_info)?;
        tracing::info!(call_id = %req.call_id, "SpeakText accepted");

        let (cancel_handle, cancel_signal) = cancel_pair();
        let result = self
            .pipeline
            .speak_text(&req.call_id, &req.text, &req.voice_id, &media, cancel_signal)
            .await;
        drop(cancel_handle);

        match result {
            Ok(()) => Ok(Response::new(SpeakTextResponse {
                success: true,
                message: "ok".to_string(),
            })),
            Err(err) => {
                tracing::warn!(call_id = %req.call_id, error = %err, "SpeakText failed");
                Err(status_from(err))
            }
        }
    }

    // Legacy surface: acknowledged without effect.

    async fn play_audio(
        &self,
        _request: Request<PlayAudioRequest>,
    ) -> Result<Response<PlayAudioResponse>, Status> {
        Ok(Response::new(PlayAudioResponse {
            success: true,
            message: String::new(),
        }))
    }

    async fn terminate_call(
        &self,
        _request: Request<TerminateCallRequest>,
    ) -> Result<Response<TerminateCallResponse>, Status> {
        Ok(Response::new(TerminateCallResponse { success: true }))
    }

    async fn send_text_message(
        &self,
        _request: Request<SendTextMessageRequest>,
    ) -> Result<Response<SendTextMessageResponse>, Status> {
        Ok(Response::new(SendTextMessageResponse { success: true }))
    }

    async fn start_recording(
        &self,
        _request: Request<StartRecordingRequest>,
    ) -> Result<Response<StartRecordingResponse>, Status> {
        Ok(Response::new(StartRecordingResponse { success: true }))
    }

    async fn stop_recording(
        &self,
        _request: Request<StopRecordingRequest>,
    ) -> Result<Response<StopRecordingResponse>, Status> {
        Ok(Response::new(StopRecordingResponse {
            success: true,
            recording_uri: String::new(),
        }))
    }

    async fn bridge_call(
        &self,
        _request: Request<BridgeCallRequest>,
    ) -> Result<Response<BridgeCallResponse>, Status> {
        Ok(Response::new(BridgeCallResponse { success: true }))
    }
}
