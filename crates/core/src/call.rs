//! Call session identity and media addressing.

/// Media addressing for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaInfo {
    /// Server-side RTP port the media gateway captures caller audio from.
    pub server_rtp_port: u16,
    /// Caller's RTP address for the NAT warm-up. Empty when unknown.
    pub caller_rtp_addr: String,
}

/// One call's identity, fixed for the lifetime of the pipeline.
///
/// The call id is caller-assigned and opaque; the session id doubles as the
/// trace correlation id propagated to every upstream dependency.
#[derive(Debug, Clone)]
pub struct CallSession {
    pub call_id: String,
    pub session_id: String,
    /// Dialog-level user identity, when the caller supplied one.
    pub user_id: Option<String>,
    pub media: MediaInfo,
}

impl CallSession {
    pub fn new(
        call_id: impl Into<String>,
        session_id: impl Into<String>,
        user_id: Option<String>,
        media: MediaInfo,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            session_id: session_id.into(),
            user_id,
            media,
        }
    }

    /// The value sent as `x-trace-id` on every upstream call.
    pub fn trace_id(&self) -> &str {
        &self.session_id
    }
}
