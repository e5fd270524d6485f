//! Serial byte-stream transport for seriallink.
//!
//! This is the lowest layer: a [`Transport`] trait with bounded reads, and
//! the production [`SerialStream`] implementation over an OS serial device.
//! The framing and discovery layers build on the trait and never touch
//! devices directly; enumeration helpers here are for callers assembling a
//! candidate list.

pub mod error;
pub mod ports;
pub mod serial;
pub mod traits;

pub use crate::error::{Result, TransportError};
pub use crate::ports::{candidate_ports, detected_ports, PortInfo};
pub use crate::serial::SerialStream;
pub use crate::traits::Transport;
