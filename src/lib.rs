//! fcgi-purge - FastCGI cache invalidation
//!
//! Operator-side crate: configuration, logging, and an in-process client
//! over the `purge-worker` control surface.

pub mod client;
pub mod config;
pub mod logging;

pub use client::{invalidation_of, ExitKind, LocalClient};
pub use config::{ConfigSource, LogConfig, LogFormat, PurgeConfig};
pub use purge_protocol::ops::{InvalidationResponse, InvalidationStatus};
pub use purge_protocol::{RpcRequest, RpcResponse};
pub use purge_worker::{ControlSurface, InvalidationResult, KeyDeriver, RpcHandler};
