use bytes::{BufMut, BytesMut};
use tracing::debug;

use crate::crc::{crc16, X25};
use crate::error::{FrameError, Result};

/// Frame delimiter. Never appears unescaped between the two delimiters.
pub const FLAG: u8 = 0x7E;

/// Escape marker. The following byte is transmitted XORed with [`ESC_MASK`].
pub const ESC: u8 = 0x7D;

/// XOR mask applied to escaped bytes.
pub const ESC_MASK: u8 = 0x20;

/// Size of the CRC trailer inside the unstuffed body.
pub const CRC_SIZE: usize = 2;

fn needs_escape(b: u8) -> bool {
    b == FLAG || b == ESC || b < 0x20
}

fn put_stuffed(dst: &mut BytesMut, b: u8) {
    if needs_escape(b) {
        dst.put_u8(ESC);
        dst.put_u8(b ^ ESC_MASK);
    } else {
        dst.put_u8(b);
    }
}

/// Encode one frame into `dst`.
///
/// The CRC is computed over `header ‖ payload` and appended least-significant
/// byte first, then the whole body is byte-stuffed and wrapped in FLAGs.
/// Transmission always carries a CRC regardless of whether the local receive
/// side verifies it.
pub fn encode_frame(header: &[u8], payload: &[u8], dst: &mut BytesMut) {
    let mut digest = X25.digest();
    digest.update(header);
    digest.update(payload);
    let fcs = digest.finalize();

    // Worst case every body byte is escaped.
    dst.reserve(2 * (header.len() + payload.len() + CRC_SIZE) + 2);
    dst.put_u8(FLAG);
    for &b in header.iter().chain(payload.iter()) {
        put_stuffed(dst, b);
    }
    for b in fcs.to_le_bytes() {
        put_stuffed(dst, b);
    }
    dst.put_u8(FLAG);
}

/// Decode one complete frame.
///
/// `candidate` must start and end with FLAG and hold at least one body byte.
/// Returns the unstuffed body with the CRC trailer stripped. When
/// `verify_crc` is false the received CRC is accepted unconditionally.
pub fn decode_frame(candidate: &[u8], verify_crc: bool) -> Result<Vec<u8>> {
    if candidate.len() < 3
        || candidate[0] != FLAG
        || candidate[candidate.len() - 1] != FLAG
    {
        return Err(FrameError::Framing("not a complete frame"));
    }

    let mut body = Vec::with_capacity(candidate.len() - 2);
    let mut bytes = candidate[1..candidate.len() - 1].iter();
    while let Some(&b) = bytes.next() {
        match b {
            FLAG => return Err(FrameError::Framing("flag inside frame body")),
            ESC => match bytes.next() {
                Some(&escaped) => body.push(escaped ^ ESC_MASK),
                None => return Err(FrameError::Framing("escape at end of frame body")),
            },
            _ => body.push(b),
        }
    }

    strip_crc(body, verify_crc)
}

fn strip_crc(mut body: Vec<u8>, verify_crc: bool) -> Result<Vec<u8>> {
    if body.len() < CRC_SIZE {
        return Err(FrameError::Framing("frame body shorter than checksum"));
    }
    let received = u16::from_le_bytes([body[body.len() - 2], body[body.len() - 1]]);
    body.truncate(body.len() - CRC_SIZE);
    if verify_crc {
        let computed = crc16(&body);
        if computed != received {
            return Err(FrameError::Crc { computed, received });
        }
    }
    Ok(body)
}

/// Incremental HDLC deframer.
///
/// Feed arbitrary byte chunks from the wire; complete, validated frame bodies
/// come out in order. Malformed or checksum-failed frames are dropped and the
/// scanner resynchronizes on the next FLAG — receive-side errors never reach
/// the caller.
#[derive(Debug)]
pub struct Deframer {
    buf: Vec<u8>,
    esc: bool,
    max_body_len: usize,
    verify_crc: bool,
    dropped: u64,
}

impl Deframer {
    /// `max_body_len` bounds the unstuffed body (header + payload + CRC);
    /// anything longer is discarded before it can exhaust memory.
    pub fn new(max_body_len: usize, verify_crc: bool) -> Self {
        Self {
            buf: Vec::with_capacity(max_body_len.min(4096)),
            esc: false,
            max_body_len,
            verify_crc,
            dropped: 0,
        }
    }

    /// Consume a chunk of wire bytes, returning any frame bodies it completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        for &b in chunk {
            if b == FLAG {
                if !self.buf.is_empty() || self.esc {
                    if let Some(body) = self.finish() {
                        out.push(body);
                    }
                }
                continue;
            }

            if self.esc {
                self.esc = false;
                self.push_byte(b ^ ESC_MASK);
            } else if b == ESC {
                self.esc = true;
            } else {
                self.push_byte(b);
            }
        }
        out
    }

    /// Frames dropped so far (malformed, checksum-failed, or oversized).
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    fn push_byte(&mut self, b: u8) {
        if self.buf.len() < self.max_body_len {
            self.buf.push(b);
        } else {
            debug!(max = self.max_body_len, "frame body over limit, discarding");
            self.drop_frame();
        }
    }

    fn finish(&mut self) -> Option<Vec<u8>> {
        let body = std::mem::take(&mut self.buf);
        if self.esc {
            self.esc = false;
            debug!("dangling escape before flag, dropping frame");
            self.dropped += 1;
            return None;
        }
        match strip_crc(body, self.verify_crc) {
            Ok(body) => Some(body),
            Err(err) => {
                debug!(%err, "dropping frame");
                self.dropped += 1;
                None
            }
        }
    }

    fn drop_frame(&mut self) {
        self.buf.clear();
        self.esc = false;
        self.dropped += 1;
    }
}
