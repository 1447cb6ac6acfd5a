//! Control surface
//!
//! The three entry points a front end calls once it has authenticated and
//! authorized the request. See [`crate::guard`] for the checks the RPC
//! handler runs first.

use std::sync::Arc;

use crate::cache::{
    BulkInvalidator, EntryInvalidator, InvalidationResult, KeyDeriver, ObjectCache,
    ObjectCacheInvalidator, PurgeStats,
};
use crate::config::WorkerConfig;

/// Wires the invalidators to one configuration.
#[derive(Debug, Clone)]
pub struct ControlSurface {
    entries: EntryInvalidator,
    bulk: BulkInvalidator,
    objects: ObjectCacheInvalidator,
}

impl ControlSurface {
    /// Build from configuration alone. No object cache is attached, so
    /// `clear_object` reports `disabled`.
    pub fn new(config: &WorkerConfig) -> Self {
        Self::with_object_cache(config, None)
    }

    /// Build from configuration with an externally owned object cache.
    pub fn with_object_cache(config: &WorkerConfig, object_cache: Option<Arc<dyn ObjectCache>>) -> Self {
        Self {
            entries: EntryInvalidator::new(KeyDeriver::new(&config.cache_root)),
            bulk: BulkInvalidator::new(&config.cache_root),
            objects: ObjectCacheInvalidator::new(object_cache),
        }
    }

    pub fn on_request_clear_one(&self, url: &str) -> InvalidationResult {
        self.entries.invalidate(url)
    }

    pub fn on_request_clear_all(&self) -> InvalidationResult {
        self.clear_all_with_stats()
            .map_or(InvalidationResult::NotFound, |stats| stats.result())
    }

    /// `on_request_clear_all`, keeping the purge counters. `None` when the
    /// cache root does not exist.
    pub fn clear_all_with_stats(&self) -> Option<PurgeStats> {
        self.bulk.purge()
    }

    pub fn on_request_clear_object_cache(&self) -> InvalidationResult {
        self.objects.invalidate()
    }

    pub fn entries(&self) -> &EntryInvalidator {
        &self.entries
    }

    pub fn bulk(&self) -> &BulkInvalidator {
        &self.bulk
    }

    pub fn objects(&self) -> &ObjectCacheInvalidator {
        &self.objects
    }
}
