//! Generated gRPC contracts for the callflow service.
//!
//! One module per protobuf package: the served telephony surface plus the
//! four upstream gateways and the SIP signaling service.

#[allow(clippy::all)]
pub mod telephony {
    tonic::include_proto!("callflow.telephony.v1");
}

#[allow(clippy::all)]
pub mod media {
    tonic::include_proto!("callflow.media.v1");
}

#[allow(clippy::all)]
pub mod stt {
    tonic::include_proto!("callflow.stt.v1");
}

#[allow(clippy::all)]
pub mod dialog {
    tonic::include_proto!("callflow.dialog.v1");
}

#[allow(clippy::all)]
pub mod tts {
    tonic::include_proto!("callflow.tts.v1");
}

#[allow(clippy::all)]
pub mod sip {
    tonic::include_proto!("callflow.sip.v1");
}
