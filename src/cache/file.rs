//! Filesystem-backed cache store
//!
//! Stores each key as a small JSON file with expiry timestamps, so cached
//! temperatures survive a restart when no Redis server is available.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::fs;

use super::{CacheStore, StoreError};

/// Longest key, in bytes, stored under its hex encoding; longer keys are
/// named by digest so file names stay under the 255-byte limit
const MAX_HEX_KEY_BYTES: usize = 100;

/// Distinguishes temporary files written concurrently by this process
static WRITE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Wrapper struct for a cached value stored on disk
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    /// The cached value
    value: String,
    /// When the value was cached
    cached_at: DateTime<Utc>,
    /// When the cache entry expires
    expires_at: DateTime<Utc>,
}

/// Cache store that keeps one JSON file per key
///
/// Files live in an XDG-compliant cache directory (`~/.cache/weather-cache/`
/// on Linux) unless a directory is given. Expired entries read as missing and
/// are overwritten by the next write for the same key.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl FileStore {
    /// Creates a FileStore in the XDG cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "weather-cache")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a FileStore with a custom cache directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Returns the path to a cache file for the given key
    ///
    /// Keys are arbitrary location strings, so they are hex-encoded to keep
    /// separators and other special characters out of the file name. Keys
    /// longer than [`MAX_HEX_KEY_BYTES`] use a `sha256-` prefixed digest; the
    /// prefix is not valid hex, so the two naming schemes never collide.
    fn cache_path(&self, key: &str) -> PathBuf {
        let name = if key.len() <= MAX_HEX_KEY_BYTES {
            to_hex(key.as_bytes())
        } else {
            format!("sha256-{}", to_hex(&Sha256::digest(key.as_bytes())))
        };
        self.cache_dir.join(format!("{name}.json"))
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[async_trait]
impl CacheStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.cache_path(key);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let entry: CacheEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable cache file");
                return Ok(None);
            }
        };

        if Utc::now() >= entry.expires_at {
            return Ok(None);
        }
        Ok(Some(entry.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        fs::create_dir_all(&self.cache_dir).await?;

        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let now = Utc::now();
        let entry = CacheEntry {
            value: value.to_string(),
            cached_at: now,
            expires_at: now + ttl,
        };
        let json = serde_json::to_string_pretty(&entry)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        // Write then rename so concurrent writers never leave a torn file.
        let path = self.cache_path(key);
        let seq = WRITE_SEQ.fetch_add(1, Ordering::Relaxed);
        let tmp = path.with_extension(format!("json.{}.{seq}.tmp", std::process::id()));
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }
}
