//! Provider readings persisted between runs
//!
//! Entries carry two deadlines. `expires_at` ends freshness, `retain_until`
//! ends the window in which a "not modified" reply may still revive them.
//! Entries past `retain_until` are removed when read.

use crate::config::SkiTourConfig;
use crate::error::SkiTourError;
use fjall::{Keyspace, PersistMode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::task;
use tracing::debug;

#[derive(Serialize, Deserialize)]
struct StoredEntry {
    // Readings use internally tagged enums, which postcard cannot decode
    payload: Vec<u8>,
    expires_at: u64, // Unix timestamp (seconds)
    retain_until: u64,
}

/// A value read back from the cache
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<T> {
    pub value: T,
    /// Still within the TTL it was stored with
    pub fresh: bool,
}

pub struct PersistentCache {
    db: fjall::Database,
    store: Keyspace,
    retention: Duration,
}

fn cache_error(e: impl std::fmt::Display) -> SkiTourError {
    SkiTourError::cache(e.to_string())
}

fn unix_now() -> crate::Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(cache_error)?
        .as_secs())
}

fn get_from_store(store: Keyspace, key: Vec<u8>) -> crate::Result<Option<Vec<u8>>> {
    Ok(store.get(key).map_err(cache_error)?.map(|v| v.to_vec()))
}

impl PersistentCache {
    /// Open (or create) the cache at `path`.
    ///
    /// `retention` is how long an expired entry is kept for revalidation.
    pub fn open(path: impl AsRef<Path>, retention: Duration) -> crate::Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)?;
        let db = fjall::Database::builder(path).open().map_err(cache_error)?;
        let store = db
            .keyspace("readings", fjall::KeyspaceCreateOptions::default)
            .map_err(cache_error)?;
        debug!("Opened reading cache at {}", path.display());
        Ok(Self {
            db,
            store,
            retention,
        })
    }

    /// Open the cache at `data.cache_dir` with the configured retention
    pub fn from_config(config: &SkiTourConfig) -> crate::Result<Self> {
        Self::open(
            &config.data.cache_dir,
            Duration::from_secs(config.providers.stale_retention_hours * 3600),
        )
    }

    /// Stores a serializable value with a time-to-live (TTL).
    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, value))]
    pub async fn put<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> crate::Result<()> {
        let expires_at = SystemTime::now()
            .checked_add(ttl)
            .ok_or_else(|| SkiTourError::cache("TTL overflow"))?
            .duration_since(UNIX_EPOCH)
            .map_err(cache_error)?
            .as_secs();
        let entry = StoredEntry {
            payload: serde_json::to_vec(value)?,
            expires_at,
            retain_until: expires_at.saturating_add(self.retention.as_secs()),
        };
        let bytes = postcard::to_stdvec(&entry).map_err(cache_error)?;

        let store = self.store.clone();
        let db = self.db.clone();
        let key = key.as_bytes().to_vec();
        task::spawn_blocking(move || -> fjall::Result<()> {
            store.insert(key, bytes)?;
            db.persist(PersistMode::Buffer)
        })
        .await
        .map_err(cache_error)?
        .map_err(cache_error)
    }

    /// Retrieves a value unless it is past its retention window.
    /// Returns `None` for misses and for entries evicted by this call.
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> crate::Result<Option<Cached<T>>> {
        let store = self.store.clone();
        let key_bytes = key.as_bytes().to_vec();

        let maybe_bytes = task::spawn_blocking(move || get_from_store(store, key_bytes))
            .await
            .map_err(cache_error)??;

        let Some(bytes) = maybe_bytes else {
            debug!("Key not found");
            return Ok(None);
        };

        let entry: StoredEntry = postcard::from_bytes(&bytes).map_err(cache_error)?;
        let now = unix_now()?;
        if now >= entry.retain_until {
            debug!("Key found but past retention");
            self.remove(key).await?;
            return Ok(None);
        }

        let fresh = now < entry.expires_at;
        debug!(fresh, "Key found");
        Ok(Some(Cached {
            value: serde_json::from_slice(&entry.payload)?,
            fresh,
        }))
    }

    /// Manually removes a key from the cache.
    pub async fn remove(&self, key: &str) -> crate::Result<()> {
        let key = key.as_bytes().to_vec();
        let store = self.store.clone();
        task::spawn_blocking(move || store.remove(key))
            .await
            .map_err(cache_error)?
            .map_err(cache_error)
    }
}
