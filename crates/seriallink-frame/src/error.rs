/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The candidate bytes do not form a well-delimited, well-escaped frame.
    #[error("malformed frame: {0}")]
    Framing(&'static str),

    /// The frame checksum does not match the body (only raised when
    /// verification is enabled).
    #[error("checksum mismatch (computed {computed:#06x}, received {received:#06x})")]
    Crc { computed: u16, received: u16 },

    /// The frame body is shorter than the fixed message header.
    #[error("truncated header ({len} bytes, expected at least 9)")]
    TruncatedHeader { len: usize },

    /// The header's length field disagrees with the payload bytes present.
    #[error("length field mismatch (declared {declared}, received {actual})")]
    LengthMismatch { declared: usize, actual: usize },

    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;
