//! Cache stores for temperature lookups
//!
//! A cache store is a key to string mapping with per-key expiry. Three
//! backends implement [`CacheStore`]: Redis for production, an in-process
//! map for tests and single-node runs, and a directory of JSON files that
//! survives restarts without a Redis server.

mod file;
mod memory;
mod redis_cache;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use self::file::FileStore;
pub use self::memory::MemoryStore;
pub use self::redis_cache::RedisStore;

/// Errors raised by a cache backend
///
/// A missing key is not an error: [`CacheStore::get`] reports it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Redis command or connection failed
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Filesystem access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A shared key/value store with per-key time-to-live
///
/// Implementations must be safe to call from many requests at once; the
/// lookup path never adds its own locking around them.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the live value for `key`, or `None` if it is absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value, for `ttl`
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;
}

/// Which backend to open at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// Redis server at the given connection URL
    Redis { url: String },
    /// In-process map, lost on restart
    Memory,
    /// JSON files under `dir`, or the XDG cache directory when `None`
    File { dir: Option<PathBuf> },
}

/// Opens the configured backend
pub async fn open(config: &StoreConfig) -> Result<Arc<dyn CacheStore>, StoreError> {
    match config {
        StoreConfig::Redis { url } => Ok(Arc::new(RedisStore::connect(url).await?)),
        StoreConfig::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreConfig::File { dir: Some(dir) } => Ok(Arc::new(FileStore::with_dir(dir.clone()))),
        StoreConfig::File { dir: None } => {
            let store = FileStore::new().ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "could not determine a cache directory; pass --cache-dir",
                )
            })?;
            Ok(Arc::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_memory_store_round_trips() {
        let store = open(&StoreConfig::Memory).await.expect("memory store opens");
        store
            .set("Leeds", "7.5", Duration::from_secs(60))
            .await
            .expect("set should succeed");
        assert_eq!(store.get("Leeds").await.unwrap().as_deref(), Some("7.5"));
    }

    #[tokio::test]
    async fn test_open_file_store_uses_given_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config = StoreConfig::File {
            dir: Some(temp_dir.path().to_path_buf()),
        };
        let store = open(&config).await.expect("file store opens");
        store
            .set("York", "12", Duration::from_secs(60))
            .await
            .expect("set should succeed");

        let files = std::fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(files, 1, "one file per key");
    }

    #[tokio::test]
    async fn test_open_redis_rejects_malformed_url() {
        let config = StoreConfig::Redis {
            url: "not a redis url".to_string(),
        };
        let result = open(&config).await;
        assert!(matches!(result, Err(StoreError::Redis(_))));
    }
}
