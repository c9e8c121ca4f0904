//! Mock Transport
//!
//! Scripted in-memory instrument for tests and dry runs.
//!
//! Replies are keyed by method name and persist until replaced, so one
//! script serves every poll cycle. Every request is recorded with the time
//! it was received. Clones share the same script and log, which lets a test
//! keep a handle after moving the transport into a poller.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::{IdsError, Result};
use crate::protocol::{Reply, REQUEST_ID};
use super::{EomReason, Exchange, Transport};

/// What the mock answers for a method
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// Raw reply line (without terminator)
    Line(Vec<u8>),
    /// Fail the exchange as a transport error
    Fail(String),
}

/// A request seen by the mock
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Method name, empty if the request did not parse
    pub method: String,
    pub params: Option<Value>,
    pub bytes: Vec<u8>,
    pub at: Instant,
}

#[derive(Default)]
struct MockState {
    replies: HashMap<String, MockReply>,
    requests: Vec<RecordedRequest>,
    latency: Duration,
}

/// Scripted transport
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method` with a raw reply line
    pub fn reply(&self, method: &str, line: impl Into<Vec<u8>>) {
        self.state
            .lock()
            .replies
            .insert(method.to_string(), MockReply::Line(line.into()));
    }

    /// Answer `method` with `{"jsonrpc":"2.0","id":1,"result":<result>}`
    pub fn reply_result(&self, method: &str, result: Value) {
        let reply = Reply::ok(result).with_id(REQUEST_ID);
        self.reply(method, reply.to_value().to_string());
    }

    /// Answer `method` with `{"jsonrpc":"2.0","id":1,"error":<error>}`
    pub fn reply_error(&self, method: &str, error: Value) {
        let reply = Reply::error(error).with_id(REQUEST_ID);
        self.reply(method, reply.to_value().to_string());
    }

    /// Fail every exchange for `method` at the transport level
    pub fn fail(&self, method: &str, reason: &str) {
        self.state
            .lock()
            .replies
            .insert(method.to_string(), MockReply::Fail(reason.to_string()));
    }

    /// Delay every exchange, simulating a slow instrument
    pub fn set_latency(&self, latency: Duration) {
        self.state.lock().latency = latency;
    }

    /// All requests received so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().requests.len()
    }

    /// Number of requests received for `method`
    pub fn calls_to(&self, method: &str) -> usize {
        self.state
            .lock()
            .requests
            .iter()
            .filter(|r| r.method == method)
            .count()
    }
}

impl Transport for MockTransport {
    fn write_read(&mut self, request: &[u8], reply: &mut [u8], _timeout: Duration)
        -> Result<Exchange> {
        let parsed: Option<Value> = serde_json::from_slice(request).ok();
        let method = parsed
            .as_ref()
            .and_then(|v| v.get("method"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let params = parsed.as_ref().and_then(|v| v.get("params")).cloned();

        let (answer, latency) = {
            let mut state = self.state.lock();
            state.requests.push(RecordedRequest {
                method: method.clone(),
                params,
                bytes: request.to_vec(),
                at: Instant::now(),
            });
            (state.replies.get(&method).cloned(), state.latency)
        };

        if !latency.is_zero() {
            thread::sleep(latency);
        }

        let line = match answer {
            Some(MockReply::Line(line)) => line,
            Some(MockReply::Fail(reason)) => return Err(IdsError::Transport(reason)),
            None => {
                return Err(IdsError::Transport(format!(
                    "no scripted reply for '{}'",
                    method
                )))
            }
        };

        let bytes_read = line.len().min(reply.len());
        reply[..bytes_read].copy_from_slice(&line[..bytes_read]);

        Ok(Exchange {
            bytes_written: request.len(),
            bytes_read,
            eom: if line.len() > reply.len() {
                EomReason::BufferFull
            } else {
                EomReason::Terminator
            },
        })
    }

    fn peer(&self) -> &str {
        "mock"
    }
}
