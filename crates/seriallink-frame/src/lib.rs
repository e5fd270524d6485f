//! HDLC byte-stuffed framing for point-to-point serial links.
//!
//! This is the core value-add layer of seriallink. Every message travels as:
//! - A FLAG (0x7E) delimiter on each side for stream synchronization
//! - A byte-stuffed body (FLAG, ESC and control bytes escaped as `ESC, b ^ 0x20`)
//! - A CRC-16/X25 trailer over the unstuffed body, least-significant byte first
//!
//! Inside the frame body sits a 9-byte big-endian message header followed by
//! the payload. No partial reads, no buffer management in user code.

pub mod codec;
pub mod crc;
pub mod error;
pub mod message;

pub use crate::codec::{decode_frame, encode_frame, Deframer, CRC_SIZE, ESC, ESC_MASK, FLAG};
pub use crate::crc::crc16;
pub use crate::error::{FrameError, Result};
pub use crate::message::{Command, Message, HEADER_SIZE};
