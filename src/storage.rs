use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedPayload {
    pub key: String,
    pub payload: String,
    pub expires_at: i64,
}

/// Keyed payload cache with absolute expiry (unix seconds).
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_cache(&self, key: &str, now: i64) -> Result<Option<String>>;
    async fn put_cache(&self, key: &str, payload: &str, expires_at: i64) -> Result<()>;
    /// Delete entries whose key starts with `prefix` (all entries for `None`). Returns the count removed.
    async fn clear_cache_prefix(&self, prefix: Option<&str>) -> Result<u64>;
}

/// Default bound on entries held by [`MemoryStorage`].
pub const MEMORY_CAPACITY: u64 = 10_000;

// Far-future expiries are held at most this long.
const MAX_RETENTION: Duration = Duration::from_secs(365 * 24 * 60 * 60);

// Wall-clock expiry for moka; `expires_at` is absolute unix seconds.
struct ExpiresAt;

impl Expiry<String, CachedPayload> for ExpiresAt {
    fn expire_after_create(&self, _key: &String, value: &CachedPayload, _created_at: Instant) -> Option<Duration> {
        let secs = value.expires_at.saturating_sub(unix_now()).max(0) as u64;
        Some(Duration::from_secs(secs).min(MAX_RETENTION))
    }

    fn expire_after_update(
        &self,
        key: &String,
        value: &CachedPayload,
        updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        self.expire_after_create(key, value, updated_at)
    }
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// Process-local storage, used when no database is configured and in tests.
///
/// Bounded by capacity; entries are evicted at their expiry and dropped
/// when a read finds them expired.
#[derive(Clone)]
pub struct MemoryStorage {
    entries: Cache<String, CachedPayload>,
}

impl Default for MemoryStorage {
    fn default() -> Self { Self::with_capacity(MEMORY_CAPACITY) }
}

impl MemoryStorage {
    pub fn new() -> Self { Self::default() }

    pub fn with_capacity(max_capacity: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(max_capacity)
                .expire_after(ExpiresAt)
                .build(),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count() as usize
    }

    pub async fn is_empty(&self) -> bool { self.len().await == 0 }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_cache(&self, key: &str, now: i64) -> Result<Option<String>> {
        match self.entries.get(key).await {
            Some(e) if e.expires_at > now => Ok(Some(e.payload)),
            Some(_) => {
                self.entries.invalidate(key).await;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put_cache(&self, key: &str, payload: &str, expires_at: i64) -> Result<()> {
        let entry = CachedPayload { key: key.to_string(), payload: payload.to_string(), expires_at };
        self.entries.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn clear_cache_prefix(&self, prefix: Option<&str>) -> Result<u64> {
        let keys: Vec<String> = self.entries
            .iter()
            .filter(|(k, _)| prefix.map_or(true, |p| k.starts_with(p)))
            .map(|(k, _)| k.to_string())
            .collect();
        for key in &keys {
            self.entries.invalidate(key).await;
        }
        Ok(keys.len() as u64)
    }
}
