use std::time::Duration;

use seriallink_frame::Message;
use seriallink_transport::{Transport, TransportError};
use tracing::{debug, info};

use crate::comm::Comm;
use crate::config::LinkConfig;
use crate::error::{CommError, Result};

/// Probe `candidates` in the order supplied and return the first one whose
/// peer answers a ping.
///
/// Each candidate is opened through `factory`, probed, and closed before the
/// next is touched — discovery latency is the sum of per-candidate timeouts.
/// Open and I/O failures on a candidate skip it; any parseable response
/// message, whatever its command, counts as liveness. A silent bus yields
/// `Ok(None)`; only an empty candidate list is an error.
pub fn discover<T, F>(candidates: &[String], mut factory: F, config: &LinkConfig) -> Result<Option<String>>
where
    T: Transport,
    F: FnMut(&str, u32, Duration) -> std::result::Result<T, TransportError>,
{
    if candidates.is_empty() {
        return Err(CommError::NoCandidates);
    }

    for candidate in candidates {
        debug!(port = %candidate, "probing candidate");
        let link = match factory(candidate, config.baudrate, config.timeout) {
            Ok(link) => link,
            Err(err) => {
                debug!(port = %candidate, %err, "open failed, skipping");
                continue;
            }
        };

        if probe(Comm::new(link, config.clone()), config.timeout) {
            info!(port = %candidate, "peer responded");
            return Ok(Some(candidate.clone()));
        }
    }

    Ok(None)
}

/// One ping exchange. Consumes the assembler so the transport is released
/// before the caller moves on, whatever happened on the wire.
fn probe<T: Transport>(mut comm: Comm<T>, timeout: Duration) -> bool {
    if let Err(err) = comm.write_message(&Message::ping()) {
        debug!(%err, "ping write failed");
        return false;
    }
    match comm.read_message(timeout) {
        Ok(Some(_)) => true,
        Ok(None) => false,
        Err(err) => {
            debug!(%err, "probe read failed");
            false
        }
    }
}
