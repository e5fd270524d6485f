use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use serialport::SerialPort;
use tracing::debug;

use crate::error::{Result, TransportError};
use crate::traits::Transport;

/// A serial device opened for exclusive use by one frame assembler.
///
/// The OS handle is released when the stream is dropped.
pub struct SerialStream {
    port: Box<dyn SerialPort>,
    name: String,
}

impl SerialStream {
    /// Open `port` at `baudrate` with the given read timeout.
    ///
    /// 8N1, no flow control — the serialport crate's defaults, which match
    /// the USB-UART bridges this protocol targets.
    pub fn open(port: &str, baudrate: u32, timeout: Duration) -> Result<Self> {
        let handle = serialport::new(port, baudrate)
            .timeout(timeout)
            .open()
            .map_err(|source| TransportError::Open {
                port: port.to_string(),
                source,
            })?;
        debug!(port, baudrate, "opened serial port");
        Ok(Self {
            port: handle,
            name: port.to_string(),
        })
    }

    /// The device path this stream was opened on.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Transport for SerialStream {
    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        self.port.write_all(bytes)?;
        self.port.flush()?;
        Ok(bytes.len())
    }

    fn read_available(&mut self, max_len: usize, timeout: Duration) -> Result<Vec<u8>> {
        self.port.set_timeout(timeout)?;

        // Drain what the driver already buffered, or wait for at least one byte.
        let pending = self.port.bytes_to_read()? as usize;
        let want = pending.clamp(1, max_len.max(1));
        let mut chunk = vec![0u8; want];
        match self.port.read(&mut chunk) {
            Ok(n) => {
                chunk.truncate(n);
                Ok(chunk)
            }
            Err(err)
                if matches!(
                    err.kind(),
                    ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                ) =>
            {
                Ok(Vec::new())
            }
            Err(err) => Err(TransportError::Io(err)),
        }
    }
}

impl std::fmt::Debug for SerialStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialStream")
            .field("port", &self.name)
            .finish()
    }
}
