//! Bulk cache purge
//!
//! Empties the cache root while leaving the root directory itself in place:
//! - Child-first walk, so each directory is already empty when removed
//! - Links are never followed; a symlink is removed like a file
//! - Best-effort: a failed removal is recorded and the walk continues
//! - An entry that vanished before we reached it is not a failure
//!
//! Entries are classified from the directory listing at the moment they
//! are visited. The cache writer may create or replace entries during a
//! purge; that race is accepted.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use purge_protocol::ops::PurgeSummary;
use walkdir::WalkDir;

use super::InvalidationResult;

/// Removes single filesystem entries on behalf of a purge.
pub trait EntryRemover {
    fn remove_file(&self, path: &Path) -> io::Result<()>;
    fn remove_dir(&self, path: &Path) -> io::Result<()>;
}

/// Removes entries from the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRemover;

impl EntryRemover for FsRemover {
    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir(path)
    }
}

/// Result of a purge run.
#[derive(Debug, Clone, Default)]
pub struct PurgeStats {
    /// Files (and links, sockets, ...) removed
    pub files_removed: u64,
    /// Directories removed
    pub dirs_removed: u64,
    /// Entries already gone when we tried to remove them
    pub vanished: u64,
    /// Errors encountered (non-fatal)
    pub errors: Vec<String>,
}

impl PurgeStats {
    pub fn result(&self) -> InvalidationResult {
        if self.errors.is_empty() {
            InvalidationResult::Success
        } else {
            InvalidationResult::PartialFailure
        }
    }

    pub fn summary(&self) -> PurgeSummary {
        PurgeSummary {
            files_removed: self.files_removed,
            dirs_removed: self.dirs_removed,
            vanished: self.vanished,
            failures: self.errors.len() as u64,
        }
    }

    fn record_failure(&mut self, path: &Path, error: impl std::fmt::Display) {
        tracing::warn!(path = %path.display(), error = %error, "failed to remove cache entry");
        self.errors
            .push(format!("Failed to delete {}: {}", path.display(), error));
    }
}

/// Removes every entry under the cache root.
#[derive(Debug, Clone)]
pub struct BulkInvalidator<R = FsRemover> {
    cache_root: PathBuf,
    remover: R,
}

impl BulkInvalidator<FsRemover> {
    pub fn new(cache_root: impl Into<PathBuf>) -> Self {
        Self::with_remover(cache_root, FsRemover)
    }
}

impl<R: EntryRemover> BulkInvalidator<R> {
    /// Create a purger that removes entries through `remover`.
    pub fn with_remover(cache_root: impl Into<PathBuf>, remover: R) -> Self {
        Self {
            cache_root: cache_root.into(),
            remover,
        }
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    /// Purge the cache root and collapse the outcome.
    pub fn invalidate_all(&self) -> InvalidationResult {
        match self.purge() {
            Some(stats) => stats.result(),
            None => InvalidationResult::NotFound,
        }
    }

    /// Purge the cache root.
    ///
    /// Returns `None` without touching anything when the root is missing or
    /// is not a directory.
    pub fn purge(&self) -> Option<PurgeStats> {
        let root = &self.cache_root;
        match fs::metadata(root) {
            Ok(meta) if meta.is_dir() => {}
            _ => {
                tracing::info!(root = %root.display(), "cache root does not exist");
                return None;
            }
        }

        let mut stats = PurgeStats::default();

        let walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .contents_first(true);

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    if e.io_error().map(|io| io.kind()) == Some(ErrorKind::NotFound) {
                        stats.vanished += 1;
                    } else {
                        let path = e.path().unwrap_or(root.as_path()).to_path_buf();
                        stats.record_failure(&path, e);
                    }
                    continue;
                }
            };

            let path = entry.path();
            let is_dir = entry.file_type().is_dir();
            let removed = if is_dir {
                self.remover.remove_dir(path)
            } else {
                self.remover.remove_file(path)
            };

            match removed {
                Ok(()) if is_dir => stats.dirs_removed += 1,
                Ok(()) => stats.files_removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => stats.vanished += 1,
                Err(e) => stats.record_failure(path, e),
            }
        }

        tracing::info!(
            root = %root.display(),
            files = stats.files_removed,
            dirs = stats.dirs_removed,
            vanished = stats.vanished,
            failures = stats.errors.len(),
            "cache purge finished"
        );

        Some(stats)
    }
}
