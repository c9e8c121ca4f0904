//! Protocol Module
//!
//! Defines the JSON-RPC wire protocol spoken by the instrument.
//!
//! ## Protocol Format (line-delimited JSON-RPC 2.0)
//!
//! ### Request Format
//! ```text
//! {"jsonrpc":"2.0","id":1,"method":"<method>","params":<value>}\n
//! ```
//! `params` is omitted when there are none. The id is constant: exactly one
//! request is ever outstanding, so it carries no correlation information.
//!
//! ### Reply Format
//! ```text
//! {"jsonrpc":"2.0","id":1,"result":<value>}\n
//! {"jsonrpc":"2.0","id":1,"error":<value>}\n
//! ```
//!
//! ### Result Shapes
//! - `[status, a0, a1, a2]`: per-axis triples (displacement, positions)
//! - `[status, flag]`: measurement-enabled
//! - `[a0, a1, a2]`, `true`/`false`: accepted for completeness

pub mod method;
mod request;
mod reply;
mod shape;
mod codec;

pub use request::{Request, JSONRPC_VERSION, REQUEST_ID};
pub use reply::Reply;
pub use shape::{ResultShape, TypedResult};
pub use codec::{encode_request, encode, decode_reply};
