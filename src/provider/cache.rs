use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Get the platform-appropriate cache directory for upstream lookups
pub fn get_cache_path() -> PathBuf {
    dirs::cache_dir()
        .map(|p| p.join("bizmap/lookups"))
        .unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}/.cache/bizmap/lookups",
                std::env::var("HOME").unwrap_or_default()
            ))
        })
}

/// Clear the lookup cache directory
pub fn clear_cache(cache_path: &Path) -> Result<()> {
    match std::fs::remove_dir_all(cache_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).context("Failed to remove cache directory"),
    }
}

/// Cached value with the Unix time it was fetched.
#[derive(Debug, Serialize, Deserialize)]
struct CachedLookup<T> {
    value: T,
    fetched_at: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Disk cache for geocode and nearby-search results, keyed by request.
///
/// Read and write failures are never fatal: a broken cache degrades to
/// live lookups.
#[derive(Debug, Clone)]
pub struct LookupCache {
    path: PathBuf,
    ttl: Duration,
    enabled: bool,
}

impl LookupCache {
    pub fn new(path: PathBuf, ttl: Duration) -> Self {
        Self {
            path,
            ttl,
            enabled: true,
        }
    }

    /// A cache that never stores or returns anything (`--no-cache`).
    pub fn disabled() -> Self {
        Self {
            path: PathBuf::new(),
            ttl: Duration::ZERO,
            enabled: false,
        }
    }

    /// Fresh cached value for `key`, if any.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if !self.enabled {
            return None;
        }
        let bytes = cacache::read_sync(&self.path, key).ok()?;
        let cached: CachedLookup<T> = serde_json::from_slice(&bytes).ok()?;
        let age = now_secs().saturating_sub(cached.fetched_at);
        if age < self.ttl.as_secs() {
            tracing::debug!(key, age, "lookup cache hit");
            Some(cached.value)
        } else {
            tracing::debug!(key, age, "lookup cache entry expired");
            None
        }
    }

    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let entry = CachedLookup {
            value,
            fetched_at: now_secs(),
        };
        let json = serde_json::to_vec(&entry)?;
        cacache::write_sync(&self.path, key, json)
            .with_context(|| format!("Failed to write cache entry {}", key))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LookupCache::new(dir.path().to_path_buf(), Duration::from_secs(3600));

        cache.put("nearby:test", &7u32).unwrap();
        assert_eq!(cache.get::<u32>("nearby:test"), Some(7));
        assert_eq!(cache.get::<u32>("nearby:other"), None);
    }

    #[test]
    fn test_zero_ttl_never_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LookupCache::new(dir.path().to_path_buf(), Duration::ZERO);

        cache.put("geocode:boston", &(42.36f64, -71.05f64)).unwrap();
        assert_eq!(cache.get::<(f64, f64)>("geocode:boston"), None);
    }

    #[test]
    fn test_disabled_cache_is_inert() {
        let cache = LookupCache::disabled();
        cache.put("k", &1u8).unwrap();
        assert_eq!(cache.get::<u8>("k"), None);
    }

    #[test]
    fn test_clear_removes_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lookups");
        let cache = LookupCache::new(path.clone(), Duration::from_secs(3600));
        cache.put("geocode:austin", &1u8).unwrap();
        assert_eq!(cache.get::<u8>("geocode:austin"), Some(1));

        clear_cache(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(cache.get::<u8>("geocode:austin"), None);
    }

    #[test]
    fn test_clear_missing_dir_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(clear_cache(&missing).is_ok());
    }
}
