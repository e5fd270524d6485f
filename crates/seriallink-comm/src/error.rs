/// Errors that can occur in frame-assembler and discovery operations.
#[derive(Debug, thiserror::Error)]
pub enum CommError {
    /// Transport-level error (open/read/write on the serial device).
    #[error("transport error: {0}")]
    Transport(#[from] seriallink_transport::TransportError),

    /// Frame-level error surfaced on the send path.
    #[error("frame error: {0}")]
    Frame(#[from] seriallink_frame::FrameError),

    /// Discovery was handed nothing to probe.
    #[error("no candidate ports to probe")]
    NoCandidates,
}

pub type Result<T> = std::result::Result<T, CommError>;
