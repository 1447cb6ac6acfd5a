//! FastCGI cache invalidation
//!
//! The page cache lives on disk under a single root, one file per cached
//! response:
//!
//! ```text
//! <cache_root>/<d[-1]>/<d[-3..-1]>/<d>      d = md5("<scheme>GET<host><path>")
//! ```
//!
//! This layout is shared with the web server that writes the cache and must
//! not drift from it.
//!
//! ## Invalidators
//!
//! - [`EntryInvalidator`]: removes the one file a URL maps to
//! - [`BulkInvalidator`]: empties the whole root, child-first, best-effort
//! - [`ObjectCacheInvalidator`]: flushes an optional in-memory object cache
//!
//! None of them return errors. Every failure is folded into an
//! [`InvalidationResult`]. No locking is done against the cache writer; a
//! file can reappear right after it was removed.

mod entry;
mod key;
mod object;
mod purge;

pub use entry::EntryInvalidator;
pub use key::{CacheKey, KeyDeriver, KeyError, CACHE_METHOD};
pub use object::{MemoryObjectCache, ObjectCache, ObjectCacheInvalidator};
pub use purge::{BulkInvalidator, EntryRemover, FsRemover, PurgeStats};

use purge_protocol::ops::InvalidationStatus;

/// Outcome of one invalidation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidationResult {
    /// Everything that was asked for is gone.
    Success,
    /// The target cache file, or the cache root, does not exist.
    NotFound,
    /// A bulk purge could not remove at least one entry.
    PartialFailure,
    /// The requested cache facility is not available here.
    Disabled,
    /// The URL could not be turned into a cache key.
    InvalidInput,
    /// A single removal or flush failed for a reason other than absence.
    IoFailure,
}

impl InvalidationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Wire representation.
    pub fn status(&self) -> InvalidationStatus {
        match self {
            Self::Success => InvalidationStatus::Success,
            Self::NotFound => InvalidationStatus::NotFound,
            Self::PartialFailure => InvalidationStatus::PartialFailure,
            Self::Disabled => InvalidationStatus::Disabled,
            Self::InvalidInput => InvalidationStatus::InvalidInput,
            Self::IoFailure => InvalidationStatus::IoFailure,
        }
    }
}
