//! Events flowing between the pipeline workers.

/// One transcript hypothesis from the STT gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEvent {
    /// Interim or final transcript text.
    pub text: String,
    /// True once the hypothesis is committed and will not be revised.
    pub is_final: bool,
}

/// One incremental token from the dialog service's response stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogToken {
    /// Incremental response text; may be empty.
    pub text: String,
    /// Marks the end of the dialog turn.
    pub is_final: bool,
}
