//! Cache key derivation
//!
//! Mirrors the web server's `fastcgi_cache_key "$scheme$request_method$host$request_uri"`
//! with the method pinned to `GET`, hashed with MD5 and sharded two levels
//! deep by the tail of the digest (`levels=1:2`).

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

/// Request method baked into every key. Only GET responses are cached, so
/// a purge never needs any other method.
pub const CACHE_METHOD: &str = "GET";

/// Errors from turning a URL into a cache key.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("URL '{0}' has no host")]
    MissingHost(String),
}

/// A 32-character lowercase hex MD5 digest identifying one cached response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Length of a key in hex characters.
    pub const LEN: usize = 32;

    /// Compute the key for a request tuple.
    pub fn compute(scheme: &str, host: &str, path: &str) -> Self {
        let raw = format!("{}{}{}{}", scheme, CACHE_METHOD, host, path);
        Self(format!("{:x}", md5::compute(raw.as_bytes())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First-level shard directory: the last hex character.
    pub fn level1(&self) -> &str {
        &self.0[Self::LEN - 1..]
    }

    /// Second-level shard directory: the two characters before the last.
    pub fn level2(&self) -> &str {
        &self.0[Self::LEN - 3..Self::LEN - 1]
    }

    /// Location of this key's cache file under `root`.
    pub fn shard_path(&self, root: &Path) -> PathBuf {
        root.join(self.level1()).join(self.level2()).join(&self.0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps URLs to cache file paths under a fixed root. Never touches the disk.
#[derive(Debug, Clone)]
pub struct KeyDeriver {
    cache_root: PathBuf,
}

impl KeyDeriver {
    pub fn new(cache_root: impl Into<PathBuf>) -> Self {
        Self {
            cache_root: cache_root.into(),
        }
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    /// Parse `url` and compute its cache key.
    ///
    /// Scheme and host come from the parsed URL. The path is hashed exactly
    /// as written, since the web server keys on the raw request URI: no dot
    /// segment removal and no re-encoding. An empty path becomes `/`. Query
    /// and fragment are ignored.
    pub fn key_for(&self, url: &str) -> Result<CacheKey, KeyError> {
        let url = url.trim();
        let parsed = Url::parse(url).map_err(|source| KeyError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| KeyError::MissingHost(url.to_string()))?;

        Ok(self.derive_key(parsed.scheme(), host, raw_path(url)))
    }

    /// Compute the key for already-split components.
    pub fn derive_key(&self, scheme: &str, host: &str, path: &str) -> CacheKey {
        CacheKey::compute(scheme, host, path)
    }

    /// Cache file path for `url`.
    pub fn derive(&self, url: &str) -> Result<PathBuf, KeyError> {
        let key = self.key_for(url)?;
        Ok(key.shard_path(&self.cache_root))
    }
}

/// Path of an absolute URL as it appears in `url`.
fn raw_path(url: &str) -> &str {
    let rest = url.split_once(':').map_or(url, |(_, rest)| rest);
    let rest = rest.trim_start_matches(['/', '\\']);
    let rest = match rest.find(['/', '\\', '?', '#']) {
        Some(end) => &rest[end..],
        None => "",
    };
    let path = match rest.find(['?', '#']) {
        Some(end) => &rest[..end],
        None => rest,
    };
    if path.is_empty() {
        "/"
    } else {
        path
    }
}
