//! Configuration for idspoll
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use crate::error::{IdsError, Result};

/// Capacity of the request and reply buffers (bytes)
pub const IO_BUFFER_SIZE: usize = 512;

/// Timeout for one write-then-read exchange (seconds)
pub const IO_TIMEOUT_SECS: f64 = 1.0;

/// Lowest poll period the engine will honour (seconds)
pub const POLL_PERIOD_MIN: f64 = 0.01;

/// Poll period used when none is configured (seconds)
pub const DEFAULT_POLL_PERIOD: f64 = 0.1;

/// Main configuration for a poller instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Transport Configuration
    // -------------------------------------------------------------------------
    /// Instrument address (host:port) used by the TCP transport
    pub endpoint: String,

    /// Timeout for one write-then-read exchange
    pub io_timeout: Duration,

    /// Capacity of the request and reply buffers (bytes).
    /// Requests serializing to this size or more are rejected before I/O.
    pub buffer_size: usize,

    // -------------------------------------------------------------------------
    // Polling Configuration
    // -------------------------------------------------------------------------
    /// Initial delay between poll cycles (seconds)
    pub poll_period: f64,

    /// Floor applied to the poll period each time it is read (seconds)
    pub poll_period_min: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: "127.0.0.1:9090".to_string(),
            io_timeout: Duration::from_secs_f64(IO_TIMEOUT_SECS),
            buffer_size: IO_BUFFER_SIZE,
            poll_period: DEFAULT_POLL_PERIOD,
            poll_period_min: POLL_PERIOD_MIN,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(IdsError::Config("buffer_size must be non-zero".to_string()));
        }
        if self.io_timeout.is_zero() {
            return Err(IdsError::Config("io_timeout must be non-zero".to_string()));
        }
        let floor = Duration::try_from_secs_f64(self.poll_period_min);
        if floor.map_or(true, |floor| floor.is_zero()) {
            return Err(IdsError::Config(format!(
                "poll_period_min must be a positive number of seconds Duration can hold, got {}",
                self.poll_period_min
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the instrument endpoint (host:port)
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Set the exchange timeout
    pub fn io_timeout(mut self, timeout: Duration) -> Self {
        self.config.io_timeout = timeout;
        self
    }

    /// Set the request/reply buffer capacity (in bytes)
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.config.buffer_size = size;
        self
    }

    /// Set the initial poll period (in seconds)
    pub fn poll_period(mut self, seconds: f64) -> Self {
        self.config.poll_period = seconds;
        self
    }

    /// Set the poll period floor (in seconds)
    pub fn poll_period_min(mut self, seconds: f64) -> Self {
        self.config.poll_period_min = seconds;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
