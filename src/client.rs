//! RPC Client
//!
//! One synchronous request/reply round-trip at a time over a `Transport`.
//!
//! ## Error surfaces
//! - `call` returns every failure as an `IdsError`
//! - `call_typed` folds every failure into `None` after logging it, so a
//!   single bad field never aborts the rest of a poll cycle

use std::time::Duration;

use bytes::BytesMut;
use serde_json::Value;

use crate::config::Config;
use crate::error::{IdsError, Result};
use crate::protocol::{decode_reply, encode, method, Reply, ResultShape, TypedResult};
use crate::transport::{EomReason, Transport};

/// Request/reply client bound to one transport
pub struct RpcClient<T: Transport> {
    /// Channel to the instrument (owned, never replaced)
    transport: T,

    /// Fixed-size reply buffer
    in_buffer: BytesMut,

    /// Request size limit (bytes); equal to the reply buffer capacity
    capacity: usize,

    /// Timeout for one exchange
    timeout: Duration,
}

impl<T: Transport> RpcClient<T> {
    /// Create a client using the buffer size and timeout from `config`
    pub fn new(transport: T, config: &Config) -> Self {
        Self {
            transport,
            in_buffer: BytesMut::zeroed(config.buffer_size),
            capacity: config.buffer_size,
            timeout: config.io_timeout,
        }
    }

    /// Create a client with default buffer size and timeout
    pub fn with_defaults(transport: T) -> Self {
        Self::new(transport, &Config::default())
    }

    /// Perform one round-trip
    ///
    /// 1. Encode (fails with `EncodingTooLarge` before any I/O)
    /// 2. Write-then-read against the transport
    /// 3. Decode the reply
    pub fn call(&mut self, method: &str, params: Option<&Value>) -> Result<Reply> {
        let request = encode(method, params, self.capacity)?;

        tracing::debug!(
            "-> {} {}",
            self.transport.peer(),
            String::from_utf8_lossy(&request)
        );

        let exchange = self
            .transport
            .write_read(&request, &mut self.in_buffer[..], self.timeout)?;

        if exchange.bytes_written != request.len() {
            return Err(IdsError::Transport(format!(
                "short write: {} of {} bytes",
                exchange.bytes_written,
                request.len()
            )));
        }

        let raw = &self.in_buffer[..exchange.bytes_read];
        tracing::debug!(
            "<- {} {}",
            self.transport.peer(),
            String::from_utf8_lossy(raw)
        );

        if exchange.eom == EomReason::BufferFull {
            tracing::debug!(
                "Reply to {} truncated at {} bytes",
                method,
                exchange.bytes_read
            );
        }

        decode_reply(raw)
    }

    /// Perform a round-trip and project the result into `shape`
    pub fn try_call_typed(
        &mut self,
        method: &str,
        params: Option<&Value>,
        shape: ResultShape,
    ) -> Result<TypedResult> {
        let reply = self.call(method, params)?;

        let Some(result) = reply.result else {
            if let Some(error) = reply.error {
                tracing::debug!("{} returned error {}", method, error);
            }
            return Err(IdsError::NoResultField);
        };

        shape.project(&result)
    }

    /// Best-effort typed call: `None` on any failure
    pub fn call_typed(&mut self, method: &str, shape: ResultShape) -> Option<TypedResult> {
        self.call_typed_with(method, None, shape)
    }

    /// Best-effort typed call with params
    pub fn call_typed_with(
        &mut self,
        method: &str,
        params: Option<&Value>,
        shape: ResultShape,
    ) -> Option<TypedResult> {
        match self.try_call_typed(method, params, shape) {
            Ok(result) => Some(result),
            Err(e) if e.is_recoverable() => {
                tracing::warn!("{} failed: {}", method, e);
                None
            }
            Err(e) => {
                tracing::error!("{} rejected: {}", method, e);
                None
            }
        }
    }

    // =========================================================================
    // Instrument getters
    // =========================================================================

    /// Displacement of all axes
    pub fn axes_displacement(&mut self) -> Option<[i64; 3]> {
        self.call_typed(method::AXES_DISPLACEMENT, ResultShape::StatusTriple)
            .and_then(|r| r.values())
    }

    /// Absolute positions of all axes
    pub fn absolute_positions(&mut self) -> Option<[i64; 3]> {
        self.call_typed(method::ABSOLUTE_POSITIONS, ResultShape::StatusTriple)
            .and_then(|r| r.values())
    }

    /// Reference positions of all axes
    pub fn reference_positions(&mut self) -> Option<[i64; 3]> {
        self.call_typed(method::REFERENCE_POSITIONS, ResultShape::StatusTriple)
            .and_then(|r| r.values())
    }

    /// Whether a measurement is running
    pub fn measurement_enabled(&mut self) -> Option<bool> {
        self.call_typed(method::MEASUREMENT_ENABLED, ResultShape::IntPair)
            .and_then(|r| r.flag())
    }

    /// Displacement of a single axis
    pub fn axis_displacement(&mut self, axis: usize) -> Option<i64> {
        self.single_axis(method::AXIS_DISPLACEMENT, axis)
    }

    /// Absolute position of a single axis
    pub fn absolute_position(&mut self, axis: usize) -> Option<i64> {
        self.single_axis(method::ABSOLUTE_POSITION, axis)
    }

    fn single_axis(&mut self, name: &str, axis: usize) -> Option<i64> {
        if axis >= method::NUM_AXES {
            tracing::warn!("{}: axis {} out of range", name, axis);
            return None;
        }
        let params = serde_json::json!([axis]);
        self.call_typed_with(name, Some(&params), ResultShape::IntPair)
            .and_then(|r| r.second())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get the request size limit
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the exchange timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
