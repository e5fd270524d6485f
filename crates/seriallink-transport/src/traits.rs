use std::time::Duration;

use crate::error::Result;

/// A point-to-point byte stream with bounded reads.
///
/// One frame assembler owns one transport for its lifetime; the handle is
/// released when the owner is dropped, so there is no explicit close. Every
/// read is bounded by the supplied timeout — implementations must never
/// block indefinitely.
pub trait Transport {
    /// Write the whole buffer, returning the byte count written.
    fn write(&mut self, bytes: &[u8]) -> Result<usize>;

    /// Read whatever is available, up to `max_len` bytes, waiting at most
    /// `timeout`. An empty vec means the timeout elapsed with nothing to
    /// read — that is not an error.
    fn read_available(&mut self, max_len: usize, timeout: Duration) -> Result<Vec<u8>>;
}
