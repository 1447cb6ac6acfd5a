//! Cache invalidation contract tests
//!
//! Exercises key derivation, single-entry removal, bulk purge and object
//! cache flushing against real temporary cache trees.

mod fixtures;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fixtures::{shard, write_entry, CacheFixture, SEEDED};
use purge_worker::{
    BulkInvalidator, ControlSurface, EntryInvalidator, EntryRemover, InvalidationResult,
    KeyDeriver, MemoryObjectCache, ObjectCache, ObjectCacheInvalidator,
};

// =============================================================================
// Key derivation
// =============================================================================

#[test]
fn test_derive_matches_md5_of_scheme_get_host_path() {
    let root = Path::new("/var/cache/fastcgi");
    let deriver = KeyDeriver::new(root);

    let raw = "httpGETexample.com/foo";
    let digest = format!("{:x}", md5::compute(raw));
    let expected = root
        .join(&digest[digest.len() - 1..])
        .join(&digest[digest.len() - 3..digest.len() - 1])
        .join(&digest);

    assert_eq!(deriver.derive("http://example.com/foo").unwrap(), expected);
    assert_eq!(
        expected,
        PathBuf::from("/var/cache/fastcgi/c/e8/c04e411e46a667752902e3e2da376e8c")
    );
}

#[test]
fn test_derive_seeded_fixtures() {
    let root = Path::new("/cache");
    let deriver = KeyDeriver::new(root);
    for (url, key) in SEEDED {
        assert_eq!(deriver.derive(url).unwrap(), shard(root, key), "{}", url);
    }
}

#[test]
fn test_derive_is_deterministic_across_instances() {
    let a = KeyDeriver::new("/cache").derive("https://example.org/a?b=c").unwrap();
    let b = KeyDeriver::new("/cache").derive("https://example.org/a").unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_derive_rejects_garbage() {
    let deriver = KeyDeriver::new("/cache");
    assert!(deriver.derive("not a url").is_err());
    assert!(deriver.derive("").is_err());
    assert!(deriver.derive("/relative/path").is_err());
}

// =============================================================================
// Single entry
// =============================================================================

#[test]
fn test_single_entry_lifecycle() {
    let fixture = CacheFixture::new();
    let inv = EntryInvalidator::new(KeyDeriver::new(fixture.root()));
    let target = &fixture.entries[0];

    assert_eq!(inv.invalidate("http://example.com/foo"), InvalidationResult::Success);
    assert!(!target.exists());
    assert_eq!(inv.invalidate("http://example.com/foo"), InvalidationResult::NotFound);

    // Neighbours untouched.
    assert!(fixture.entries[1].exists());
    assert!(fixture.entries[2].exists());
}

#[test]
fn test_single_entry_keyed_on_raw_path() {
    let fixture = CacheFixture::new();
    let raw = write_entry(fixture.root(), "9ca3099c95db9352aa4f0c97d04a386c");
    let collapsed = write_entry(fixture.root(), &format!("{:x}", md5::compute("httpGETexample.com/b")));
    let inv = EntryInvalidator::new(KeyDeriver::new(fixture.root()));

    assert_eq!(inv.invalidate("http://example.com/a/../b"), InvalidationResult::Success);
    assert!(!raw.exists());
    assert!(collapsed.exists());
}

#[test]
fn test_single_entry_not_cached() {
    let fixture = CacheFixture::new();
    let inv = EntryInvalidator::new(KeyDeriver::new(fixture.root()));
    assert_eq!(inv.invalidate("http://example.com/never-cached"), InvalidationResult::NotFound);
}

#[test]
fn test_single_entry_without_cache_root() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let inv = EntryInvalidator::new(KeyDeriver::new(temp_dir.path().join("missing")));
    assert_eq!(inv.invalidate("http://example.com/foo"), InvalidationResult::NotFound);
}

// =============================================================================
// Bulk purge
// =============================================================================

#[test]
fn test_purge_empties_root_and_keeps_it() {
    let fixture = CacheFixture::new();
    write_entry(&fixture.root().join("nested/deeper"), "0123456789abcdef0123456789abcdef");

    let purger = BulkInvalidator::new(fixture.root());
    assert_eq!(purger.invalidate_all(), InvalidationResult::Success);
    assert!(fixture.root().is_dir());
    assert!(fixture.is_empty());

    // Nothing left: second run is a trivial success.
    let stats = purger.purge().unwrap();
    assert_eq!(stats.files_removed + stats.dirs_removed, 0);
    assert_eq!(stats.result(), InvalidationResult::Success);
}

/// Denies removal of anything below one directory.
struct DenyUnder(PathBuf);

impl EntryRemover for DenyUnder {
    fn remove_file(&self, path: &Path) -> io::Result<()> {
        if path.starts_with(&self.0) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        fs::remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir(path)
    }
}

#[test]
fn test_purge_partial_failure_removes_everything_else() {
    let fixture = CacheFixture::new();
    let locked_dir = fixture.root().join("7");

    let purger = BulkInvalidator::with_remover(fixture.root(), DenyUnder(locked_dir.clone()));
    let stats = purger.purge().unwrap();

    assert_eq!(stats.result(), InvalidationResult::PartialFailure);
    assert!(fixture.entries[1].exists(), "denied entry survives");
    assert!(!fixture.entries[0].exists());
    assert!(!fixture.entries[2].exists());
    assert!(!fixture.root().join("c").exists());
    assert!(!fixture.root().join("6").exists());
    assert!(locked_dir.exists());
    assert!(!stats.errors.is_empty());
}

#[test]
fn test_purge_missing_root() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let purger = BulkInvalidator::new(temp_dir.path().join("fastcgi"));
    assert_eq!(purger.invalidate_all(), InvalidationResult::NotFound);
}

#[cfg(unix)]
#[test]
fn test_purge_with_real_permission_denial() {
    use std::os::unix::fs::PermissionsExt;

    let fixture = CacheFixture::new();
    let locked = fixture.root().join("7/bb");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

    // Privileged users ignore directory permissions.
    let scratch = locked.join(".writable");
    if fs::write(&scratch, "").is_ok() {
        fs::remove_file(&scratch).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let purger = BulkInvalidator::new(fixture.root());
    let result = purger.invalidate_all();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(result, InvalidationResult::PartialFailure);
    assert!(fixture.entries[1].exists());
    assert!(!fixture.entries[0].exists());
    assert!(!fixture.entries[2].exists());
}

// =============================================================================
// Object cache
// =============================================================================

#[test]
fn test_object_cache_disabled_and_enabled() {
    assert_eq!(ObjectCacheInvalidator::disabled().invalidate(), InvalidationResult::Disabled);

    let cache = Arc::new(MemoryObjectCache::new());
    cache.set("alloptions", "serialized");
    let inv = ObjectCacheInvalidator::new(Some(cache.clone() as Arc<dyn ObjectCache>));
    assert_eq!(inv.invalidate(), InvalidationResult::Success);
    assert!(cache.is_empty());
}

// =============================================================================
// Control surface
// =============================================================================

#[test]
fn test_control_surface_entry_points() {
    let fixture = CacheFixture::new();
    let surface = ControlSurface::new(&fixture.worker_config());

    assert_eq!(
        surface.on_request_clear_one("https://example.com/blog/hello-world/"),
        InvalidationResult::Success
    );
    assert_eq!(surface.on_request_clear_one("::"), InvalidationResult::InvalidInput);
    assert_eq!(surface.on_request_clear_object_cache(), InvalidationResult::Disabled);
    assert_eq!(surface.on_request_clear_all(), InvalidationResult::Success);
    assert!(fixture.is_empty());
}
