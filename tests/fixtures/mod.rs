//! Test fixtures for cache invalidation tests
//!
//! Builds FastCGI-style cache trees in temporary directories, laid out the
//! way the web server writes them.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use fcgi_purge::PurgeConfig;
use purge_worker::{AccessPolicy, WorkerConfig};
use tempfile::TempDir;

pub const SECRET: &str = "fixture-secret";
pub const ADMIN: &str = "admin";

/// URLs seeded into every fixture cache, with their md5 keys.
pub const SEEDED: [(&str, &str); 3] = [
    ("http://example.com/foo", "c04e411e46a667752902e3e2da376e8c"),
    ("http://example.com/", "ddf158b292edfaa14788b3f19a50ebb7"),
    (
        "https://example.com/blog/hello-world/",
        "5b0fd710371382f0ce2bd9478ec6db46",
    ),
];

/// Sharded location of `key` under `root`.
pub fn shard(root: &Path, key: &str) -> PathBuf {
    root.join(&key[31..]).join(&key[29..31]).join(key)
}

/// Write a cache file for `key`.
pub fn write_entry(root: &Path, key: &str) -> PathBuf {
    let path = shard(root, key);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, format!("KEY: {}\n\n<html>cached</html>", key)).unwrap();
    path
}

/// A temporary cache root populated with [`SEEDED`] entries.
pub struct CacheFixture {
    pub temp_dir: TempDir,
    pub entries: Vec<PathBuf>,
}

impl CacheFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let entries = SEEDED
            .iter()
            .map(|(_, key)| write_entry(temp_dir.path(), key))
            .collect();
        Self { temp_dir, entries }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn worker_config(&self) -> WorkerConfig {
        WorkerConfig {
            cache_root: self.root().to_path_buf(),
            access: AccessPolicy::new(SECRET, vec![ADMIN.to_string()]),
            ..WorkerConfig::default()
        }
    }

    pub fn purge_config(&self) -> PurgeConfig {
        PurgeConfig {
            worker: self.worker_config(),
            principal: ADMIN.to_string(),
            ..PurgeConfig::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        fs::read_dir(self.root()).unwrap().next().is_none()
    }
}
