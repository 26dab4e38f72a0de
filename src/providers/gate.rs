//! Call spacing and persistent caching in front of a provider

use super::Fetch;
use crate::cache::{Cached, PersistentCache};
use crate::config::ProvidersConfig;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Enforces a minimum spacing between consecutive calls
#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    next_slot: tokio::sync::Mutex<Option<Instant>>,
}

impl Throttle {
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: tokio::sync::Mutex::new(None),
        }
    }

    /// Wait until the next call is allowed and reserve the slot after it
    pub async fn wait(&self) {
        let mut next_slot = self.next_slot.lock().await;
        let now = Instant::now();
        let start = match *next_slot {
            Some(slot) if slot > now => {
                tokio::time::sleep_until(slot).await;
                slot
            }
            _ => now,
        };
        *next_slot = Some(start + self.min_interval);
    }
}

/// Throttle plus persistent TTL cache for one kind of reading.
///
/// A fresh cache hit skips the provider entirely. `NotModified` hands back
/// the stored value, even one written by an earlier run, without extending
/// its lifetime. Cache failures are logged and treated as misses.
pub struct ProviderGate<T> {
    kind: &'static str,
    name: String,
    throttle: Throttle,
    ttl: Duration,
    cache: Arc<PersistentCache>,
    reading: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> ProviderGate<T> {
    /// `kind` namespaces the cache keys, `name` is the provider shown in logs
    pub fn new(
        kind: &'static str,
        name: impl Into<String>,
        cache: Arc<PersistentCache>,
        min_interval: Duration,
        ttl: Duration,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            throttle: Throttle::new(min_interval),
            ttl,
            cache,
            reading: PhantomData,
        }
    }

    pub fn from_config(
        kind: &'static str,
        name: impl Into<String>,
        cache: Arc<PersistentCache>,
        config: &ProvidersConfig,
    ) -> Self {
        Self::new(
            kind,
            name,
            cache,
            Duration::from_millis(config.min_call_interval_ms),
            Duration::from_secs(config.cache_ttl_minutes * 60),
        )
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn cache_key(&self, key: &str) -> String {
        format!("{}:{key}", self.kind)
    }

    async fn lookup(&self, key: &str) -> Option<Cached<T>> {
        match self.cache.get(&self.cache_key(key)).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!("{} cache read failed for {}: {}", self.name, key, e);
                None
            }
        }
    }

    /// Cached value for `key` if it is younger than the TTL
    pub async fn cached(&self, key: &str) -> Option<T> {
        self.lookup(key)
            .await
            .filter(|hit| hit.fresh)
            .map(|hit| hit.value)
    }

    /// Resolve `key` through the cache, calling the provider when needed.
    ///
    /// `Ok(None)` means no data for this point. Provider errors are passed
    /// through untouched.
    pub async fn fetch<F, Fut>(&self, key: &str, call: F) -> crate::Result<Option<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = crate::Result<Fetch<T>>>,
    {
        let stale = match self.lookup(key).await {
            Some(Cached { value, fresh: true }) => {
                debug!("{} cache hit", self.name);
                return Ok(Some(value));
            }
            Some(Cached { value, .. }) => Some(value),
            None => None,
        };

        self.throttle.wait().await;
        match call().await? {
            Fetch::Fresh(value) => {
                if let Err(e) = self.cache.put(&self.cache_key(key), &value, self.ttl).await {
                    warn!("{} cache write failed for {}: {}", self.name, key, e);
                }
                Ok(Some(value))
            }
            Fetch::NotModified => {
                debug!("{} reported not modified", self.name);
                Ok(stale)
            }
            Fetch::Unavailable => Ok(None),
        }
    }
}
