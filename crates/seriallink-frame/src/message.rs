use std::fmt;

use bytes::Bytes;

use crate::error::{FrameError, Result};

/// Fixed message header: command (2) + id (1) + fragments (2) + fragment (2)
/// + length (2) = 9 bytes, all multi-byte fields big-endian.
pub const HEADER_SIZE: usize = 9;

/// Message purpose carried in the header's command field.
///
/// The reserved values are decoded to named variants once at the boundary;
/// everything else is application-defined and kept as [`Command::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Ack,
    Nak,
    Ping,
    Raw,
    Other(u16),
}

impl Command {
    pub fn as_u16(self) -> u16 {
        match self {
            Command::Ack => 0x01,
            Command::Nak => 0x02,
            Command::Ping => 0x03,
            Command::Raw => 0x04,
            Command::Other(value) => value,
        }
    }
}

impl From<u16> for Command {
    fn from(value: u16) -> Self {
        match value {
            0x01 => Command::Ack,
            0x02 => Command::Nak,
            0x03 => Command::Ping,
            0x04 => Command::Raw,
            other => Command::Other(other),
        }
    }
}

impl From<Command> for u16 {
    fn from(command: Command) -> Self {
        command.as_u16()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Ack => write!(f, "ack"),
            Command::Nak => write!(f, "nak"),
            Command::Ping => write!(f, "ping"),
            Command::Raw => write!(f, "raw"),
            Command::Other(value) => write!(f, "{value:#06x}"),
        }
    }
}

/// The logical unit carried inside one frame.
///
/// `fragments`/`fragment` are reserved for a future multi-frame protocol;
/// the link layer sends everything as a single fragment and drops inbound
/// messages that claim otherwise. The wire `length` field is derived from
/// the payload, so `length == payload.len()` holds by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub command: Command,
    pub id: u8,
    pub fragments: u16,
    pub fragment: u16,
    pub payload: Bytes,
}

impl Message {
    /// Create a single-fragment message with id 0.
    pub fn new(command: Command, payload: impl Into<Bytes>) -> Self {
        Self {
            command,
            id: 0,
            fragments: 1,
            fragment: 0,
            payload: payload.into(),
        }
    }

    /// Set the caller-defined correlation tag.
    pub fn with_id(mut self, id: u8) -> Self {
        self.id = id;
        self
    }

    /// An empty-payload ping.
    pub fn ping() -> Self {
        Self::new(Command::Ping, Bytes::new())
    }

    /// The unstuffed wire size of this message (header + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }

    /// Encode the fixed header. The payload is appended separately by the
    /// codec since its length is variable and already recorded here.
    pub fn header_bytes(&self) -> Result<[u8; HEADER_SIZE]> {
        let length = u16::try_from(self.payload.len()).map_err(|_| {
            FrameError::PayloadTooLarge {
                size: self.payload.len(),
                max: u16::MAX as usize,
            }
        })?;

        let mut header = [0u8; HEADER_SIZE];
        header[0..2].copy_from_slice(&self.command.as_u16().to_be_bytes());
        header[2] = self.id;
        header[3..5].copy_from_slice(&self.fragments.to_be_bytes());
        header[5..7].copy_from_slice(&self.fragment.to_be_bytes());
        header[7..9].copy_from_slice(&length.to_be_bytes());
        Ok(header)
    }

    /// Reconstruct a message from an unstuffed frame body.
    pub fn decode(body: &[u8]) -> Result<Self> {
        if body.len() < HEADER_SIZE {
            return Err(FrameError::TruncatedHeader { len: body.len() });
        }

        let command = u16::from_be_bytes([body[0], body[1]]);
        let id = body[2];
        let fragments = u16::from_be_bytes([body[3], body[4]]);
        let fragment = u16::from_be_bytes([body[5], body[6]]);
        let declared = u16::from_be_bytes([body[7], body[8]]) as usize;

        let payload = &body[HEADER_SIZE..];
        if payload.len() != declared {
            return Err(FrameError::LengthMismatch {
                declared,
                actual: payload.len(),
            });
        }

        Ok(Self {
            command: command.into(),
            id,
            fragments,
            fragment,
            payload: Bytes::copy_from_slice(payload),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_layout_is_big_endian() {
        let msg = Message {
            command: Command::Other(0x1234),
            id: 0xAB,
            fragments: 0x0102,
            fragment: 0x0304,
            payload: Bytes::from_static(b"xy"),
        };
        let header = msg.header_bytes().unwrap();
        assert_eq!(
            header,
            [0x12, 0x34, 0xAB, 0x01, 0x02, 0x03, 0x04, 0x00, 0x02]
        );
    }

    #[test]
    fn roundtrip_preserves_all_fields() {
        let msg = Message::new(Command::Ping, Bytes::from_static(b"hello")).with_id(42);
        let mut body = msg.header_bytes().unwrap().to_vec();
        body.extend_from_slice(&msg.payload);
        let decoded = Message::decode(&body).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn roundtrip_empty_payload() {
        let msg = Message::ping();
        let body = msg.header_bytes().unwrap().to_vec();
        let decoded = Message::decode(&body).unwrap();
        assert_eq!(decoded.command, Command::Ping);
        assert_eq!(decoded.fragments, 1);
        assert_eq!(decoded.fragment, 0);
        assert!(decoded.payload.is_empty());
    }

    #[test]
    fn truncated_header_rejected() {
        let err = Message::decode(&[0x00; 8]).unwrap_err();
        assert!(matches!(err, FrameError::TruncatedHeader { len: 8 }));
    }

    #[test]
    fn length_mismatch_rejected() {
        let msg = Message::new(Command::Ack, Bytes::from_static(b"abcd"));
        let mut body = msg.header_bytes().unwrap().to_vec();
        body.extend_from_slice(b"abc"); // one byte short of the declared 4
        let err = Message::decode(&body).unwrap_err();
        assert!(matches!(
            err,
            FrameError::LengthMismatch {
                declared: 4,
                actual: 3
            }
        ));
    }

    #[test]
    fn command_u16_conversions() {
        assert_eq!(Command::from(0x01), Command::Ack);
        assert_eq!(Command::from(0x02), Command::Nak);
        assert_eq!(Command::from(0x03), Command::Ping);
        assert_eq!(Command::from(0x04), Command::Raw);
        assert_eq!(Command::from(0x1000), Command::Other(0x1000));
        assert_eq!(u16::from(Command::Other(0x1000)), 0x1000);
        assert_eq!(Command::Ping.as_u16(), 0x03);
    }

    #[test]
    fn oversized_payload_rejected_at_header() {
        let msg = Message::new(Command::Raw, vec![0u8; u16::MAX as usize + 1]);
        let err = msg.header_bytes().unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { .. }));
    }
}
