//! fcgi-purge Protocol Types
//!
//! Defines the JSON RPC envelope spoken between an operator front end and
//! the purge worker.

pub mod error;
pub mod request;
pub mod response;
pub mod ops;

pub use error::{ErrorCode, RpcError};
pub use request::{AuthContext, RpcRequest};
pub use response::RpcResponse;

/// Minimum protocol version supported by this implementation.
pub const PROTOCOL_MIN: i32 = 1;

/// Maximum protocol version supported by this implementation.
pub const PROTOCOL_MAX: i32 = 1;
