//! # idspoll
//!
//! Background client for a displacement-measuring interferometer:
//! - Line-delimited JSON-RPC request/reply codec
//! - Strictly serial round-trips with a fixed timeout
//! - Poll loop refreshing a small set of named values
//! - Stale-on-failure value cache behind a single lock
//! - Suspend/resume and adjustable cadence at runtime
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Control Surface                           │
//! │        (suspend / resume / period / read by name)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  one coarse lock
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Poll Engine                              │
//! │           (worker thread, cycle state machine)               │
//! └──────────┬─────────────────────────────────┬────────────────┘
//!            │                                 │
//!            ▼                                 ▼
//!   ┌─────────────────┐               ┌─────────────────┐
//!   │   RPC Client    │               │   Value Cache   │
//!   │ (encode/decode) │               │  (snapshots)    │
//!   └────────┬────────┘               └─────────────────┘
//!            │
//!            ▼
//!   ┌─────────────────┐
//!   │    Transport    │
//!   │ (write → line)  │
//!   └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod transport;
pub mod client;
pub mod cache;
pub mod poller;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{IdsError, Result};
pub use config::Config;
pub use client::RpcClient;
pub use cache::{Field, Reading, Snapshot};
pub use poller::{ControlSurface, Poller, PollerHandle, PollerState};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of idspoll
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
