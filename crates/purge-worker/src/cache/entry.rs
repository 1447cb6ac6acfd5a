//! Single-entry invalidation.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::key::KeyDeriver;
use super::InvalidationResult;

/// Removes the cache file for one URL.
#[derive(Debug, Clone)]
pub struct EntryInvalidator {
    deriver: KeyDeriver,
}

impl EntryInvalidator {
    pub fn new(deriver: KeyDeriver) -> Self {
        Self { deriver }
    }

    pub fn deriver(&self) -> &KeyDeriver {
        &self.deriver
    }

    /// Where `url` would be cached, if it parses.
    pub fn locate(&self, url: &str) -> Option<PathBuf> {
        self.deriver.derive(url).ok()
    }

    /// Drop the cached response for `url`.
    ///
    /// Removing one file is atomic, so there is no partial state. A file
    /// that vanishes between the existence check and the unlink counts as
    /// not found.
    pub fn invalidate(&self, url: &str) -> InvalidationResult {
        let path = match self.deriver.derive(url) {
            Ok(path) => path,
            Err(e) => {
                tracing::info!(error = %e, "rejected cache purge for invalid URL");
                return InvalidationResult::InvalidInput;
            }
        };

        tracing::debug!(url, path = %path.display(), "derived cache file");

        if fs::symlink_metadata(&path).is_err() {
            tracing::info!(url, "cache file does not exist");
            return InvalidationResult::NotFound;
        }

        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!(url, path = %path.display(), "cache entry cleared");
                InvalidationResult::Success
            }
            Err(e) if e.kind() == ErrorKind::NotFound => InvalidationResult::NotFound,
            Err(e) => {
                tracing::warn!(url, path = %path.display(), error = %e, "failed to clear cache entry");
                InvalidationResult::IoFailure
            }
        }
    }
}
