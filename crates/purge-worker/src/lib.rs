//! fcgi-purge Worker
//!
//! Invalidation core for a FastCGI page cache plus the RPC front door that
//! exposes it.
//!
//! This crate can be used in two modes:
//! - **Standalone binary**: `purge-worker rpc`, one JSON request per run
//! - **In-process library**: embed [`ControlSurface`] directly, or drive an
//!   [`RpcHandler`] with already parsed requests

pub mod cache;
pub mod config;
pub mod guard;
pub mod handlers;
pub mod rpc;
pub mod surface;

pub use cache::{
    BulkInvalidator, CacheKey, EntryInvalidator, EntryRemover, FsRemover, InvalidationResult,
    KeyDeriver, KeyError, MemoryObjectCache, ObjectCache, ObjectCacheInvalidator, PurgeStats,
    CACHE_METHOD,
};
pub use config::{ConfigError, WorkerConfig, DEFAULT_CACHE_ROOT};
pub use guard::{AccessPolicy, RequestGuard};
pub use rpc::RpcHandler;
pub use surface::ControlSurface;
