//! Object cache flushing.
//!
//! The object cache is a process-wide key/value store that is unrelated to
//! the page cache on disk. It can only be flushed as a whole. Whether one
//! exists depends on the runtime, so it is injected as an optional handle.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use super::InvalidationResult;

/// The one capability the invalidator needs from an object cache.
pub trait ObjectCache: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Drop every entry. All-or-nothing; returns whether it succeeded.
    fn flush(&self) -> bool;
}

/// In-process object cache.
#[derive(Debug, Default)]
pub struct MemoryObjectCache {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryObjectCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> bool {
        match self.entries.lock() {
            Ok(mut entries) => {
                entries.insert(key.into(), value.into());
                true
            }
            Err(_) => false,
        }
    }

    pub fn delete(&self, key: &str) -> bool {
        match self.entries.lock() {
            Ok(mut entries) => entries.remove(key).is_some(),
            Err(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObjectCache for MemoryObjectCache {
    fn name(&self) -> &str {
        "memory"
    }

    fn flush(&self) -> bool {
        // Poisoned contents get cleared too.
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.clear();
        true
    }
}

/// Flushes the object cache, if there is one.
#[derive(Clone, Default)]
pub struct ObjectCacheInvalidator {
    cache: Option<Arc<dyn ObjectCache>>,
}

impl fmt::Debug for ObjectCacheInvalidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectCacheInvalidator")
            .field("cache", &self.cache.as_ref().map(|c| c.name().to_string()))
            .finish()
    }
}

impl ObjectCacheInvalidator {
    pub fn new(cache: Option<Arc<dyn ObjectCache>>) -> Self {
        Self { cache }
    }

    /// An invalidator with no object cache behind it.
    pub fn disabled() -> Self {
        Self { cache: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.cache.is_some()
    }

    pub fn invalidate(&self) -> InvalidationResult {
        let Some(cache) = &self.cache else {
            tracing::info!("object cache is not enabled");
            return InvalidationResult::Disabled;
        };

        if cache.flush() {
            tracing::info!(backend = cache.name(), "object cache flushed");
            InvalidationResult::Success
        } else {
            tracing::warn!(backend = cache.name(), "object cache flush failed");
            InvalidationResult::IoFailure
        }
    }
}
