use std::collections::VecDeque;
use std::time::{Duration, Instant};

use bytes::{Bytes, BytesMut};
use seriallink_frame::{encode_frame, Command, Deframer, FrameError, Message};
use seriallink_transport::Transport;
use tracing::{debug, trace};

use crate::config::LinkConfig;
use crate::error::Result;

/// How many bytes one transport read may return at most. Serial drivers
/// rarely buffer more than a few KiB, and the deframer re-chunks anyway.
const READ_CHUNK_SIZE: usize = 1024;

/// Frame assembler bound to one transport handle.
///
/// Owns the transport exclusively for its lifetime — the handle is released
/// when the `Comm` is dropped, on every exit path. Reads accumulate into an
/// internal deframer until a complete frame appears or the deadline passes;
/// writes always go out as a single transport call carrying the whole frame.
pub struct Comm<T: Transport> {
    link: T,
    deframer: Deframer,
    rx_queue: VecDeque<Vec<u8>>,
    config: LinkConfig,
}

impl<T: Transport> Comm<T> {
    pub fn new(link: T, config: LinkConfig) -> Self {
        let deframer = Deframer::new(config.max_body_len(), config.crc_enabled);
        Self {
            link,
            deframer,
            rx_queue: VecDeque::new(),
            config,
        }
    }

    /// Frame and send a message, returning the wire byte count.
    ///
    /// The payload bound is enforced here, before any bytes move — an
    /// oversized payload is a caller error, not a link fault.
    pub fn write_message(&mut self, msg: &Message) -> Result<usize> {
        if msg.payload.len() > self.config.max_payload {
            return Err(FrameError::PayloadTooLarge {
                size: msg.payload.len(),
                max: self.config.max_payload,
            }
            .into());
        }

        let header = msg.header_bytes()?;
        let mut frame = BytesMut::new();
        encode_frame(&header, &msg.payload, &mut frame);
        let written = self.link.write(&frame)?;
        trace!(command = %msg.command, bytes = written, "sent frame");
        Ok(written)
    }

    /// Wrap raw bytes in a `Raw` message with default header fields and send.
    pub fn write(&mut self, payload: &[u8]) -> Result<usize> {
        let msg = Message::new(Command::Raw, Bytes::copy_from_slice(payload));
        self.write_message(&msg)
    }

    /// Next complete frame body within `timeout`, or `None` when it elapses.
    ///
    /// Malformed and checksum-failed frames are dropped inside the deframer
    /// and the wait continues; only transport failures surface as errors.
    pub fn read(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>> {
        if let Some(body) = self.rx_queue.pop_front() {
            return Ok(Some(body));
        }

        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(None);
            }

            let chunk = self.link.read_available(READ_CHUNK_SIZE, remaining)?;
            if chunk.is_empty() {
                continue;
            }

            let mut bodies = self.deframer.feed(&chunk);
            if bodies.is_empty() {
                continue;
            }
            let first = bodies.remove(0);
            self.rx_queue.extend(bodies);
            return Ok(Some(first));
        }
    }

    /// Next parsed message within `timeout`, or `None` when it elapses.
    ///
    /// Bodies that fail to parse are dropped and the wait continues, as are
    /// messages advertising more than one fragment — reassembly is not part
    /// of this protocol and such input is rejected rather than misread.
    pub fn read_message(&mut self, timeout: Duration) -> Result<Option<Message>> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(None);
            }

            let Some(body) = self.read(remaining)? else {
                return Ok(None);
            };
            match Message::decode(&body) {
                Ok(msg) if msg.fragments > 1 => {
                    debug!(
                        fragments = msg.fragments,
                        "dropping multi-fragment message, reassembly unsupported"
                    );
                }
                Ok(msg) => return Ok(Some(msg)),
                Err(err) => debug!(%err, "dropping unparseable frame body"),
            }
        }
    }

    /// The configuration this assembler was built with.
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Borrow the underlying transport.
    pub fn get_ref(&self) -> &T {
        &self.link
    }

    /// Consume the assembler and return the transport.
    pub fn into_inner(self) -> T {
        self.link
    }
}
