//! Transport Module
//!
//! Byte-oriented duplex channel to the instrument.
//!
//! ## Contract
//! - One call = write the whole request, then read one reply line
//! - Line framing (output terminator, input terminator) belongs to the transport
//! - The reply is copied into a caller-owned fixed buffer
//! - Connection setup happens once, outside the poll loop; no reconnects
//!
//! Any non-success (timeout, disconnect, short write) is reported as
//! `IdsError::Transport`.

mod tcp;
mod mock;

use std::time::Duration;

use crate::error::Result;

pub use tcp::TcpTransport;
pub use mock::{MockReply, MockTransport, RecordedRequest};

/// Line terminator used in both directions
pub const LINE_TERMINATOR: u8 = b'\n';

/// Why a read stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EomReason {
    /// The line terminator was seen
    Terminator,
    /// The reply buffer filled up before the terminator; the reply is truncated
    BufferFull,
}

/// Outcome of one successful write-then-read exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exchange {
    /// Bytes of the request accepted by the channel (terminator excluded)
    pub bytes_written: usize,

    /// Bytes copied into the reply buffer (terminator excluded)
    pub bytes_read: usize,

    /// Why reading stopped
    pub eom: EomReason,
}

/// A duplex channel supporting "write N bytes, then read until terminator or timeout"
pub trait Transport: Send {
    /// Write `request`, then read one reply line into `reply`
    fn write_read(&mut self, request: &[u8], reply: &mut [u8], timeout: Duration)
        -> Result<Exchange>;

    /// Human-readable peer name for logging
    fn peer(&self) -> &str {
        "instrument"
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write_read(&mut self, request: &[u8], reply: &mut [u8], timeout: Duration)
        -> Result<Exchange> {
        (**self).write_read(request, reply, timeout)
    }

    fn peer(&self) -> &str {
        (**self).peer()
    }
}
