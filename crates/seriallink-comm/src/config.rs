use std::time::Duration;

use seriallink_frame::{CRC_SIZE, HEADER_SIZE};

/// Link-wide settings shared by the frame assembler and discovery.
///
/// One explicit value passed to constructors — the codec itself carries no
/// defaults. `max_payload` must fit the header's u16 length field
/// (1..=65535); the CLI validates that at the configuration boundary.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Serial line rate.
    pub baudrate: u32,
    /// Upper bound for one blocking read and for each discovery probe.
    pub timeout: Duration,
    /// Verify the CRC of received frames. Transmission always appends one.
    pub crc_enabled: bool,
    /// Maximum payload size accepted on the send path, in bytes.
    pub max_payload: usize,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            baudrate: 115_200,
            timeout: Duration::from_secs(1),
            crc_enabled: false,
            max_payload: 4096,
        }
    }
}

impl LinkConfig {
    /// Largest unstuffed frame body this configuration can produce:
    /// header + payload + CRC trailer. Used to cap the receive buffer.
    pub fn max_body_len(&self) -> usize {
        HEADER_SIZE + self.max_payload + CRC_SIZE
    }
}
