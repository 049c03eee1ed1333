use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::error::AppError;

/// Something that can expire cached output by tag.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagInvalidator: Send + Sync {
    /// Expire every cached entry labelled with `tag` once `expire` has elapsed.
    ///
    /// A zero `expire` takes effect on the next read. Repeating the call is a
    /// no-op as far as readers can observe.
    async fn invalidate(&self, tag: &str, expire: Duration);
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: serde_json::Value,
    tags: Vec<String>,
    stored_at: Instant,
    ttl: Duration,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, CacheEntry>,
    /// Entries stored before this instant are stale for the tag once it passes.
    tag_expiry: HashMap<String, Instant>,
}

impl Inner {
    fn is_fresh(&self, entry: &CacheEntry, now: Instant) -> bool {
        if now.duration_since(entry.stored_at) >= entry.ttl {
            return false;
        }
        !entry.tags.iter().any(|tag| {
            self.tag_expiry
                .get(tag)
                .is_some_and(|expiry| *expiry <= now && entry.stored_at < *expiry)
        })
    }
}

/// In-process cache of rendered JSON payloads, labelled with cache tags.
#[derive(Debug, Default)]
pub struct TagCache {
    inner: RwLock<Inner>,
}

impl TagCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key` if it is still fresh.
    pub async fn get(&self, key: &str) -> Option<serde_json::Value> {
        let inner = self.inner.read().await;
        let entry = inner.entries.get(key)?;
        inner
            .is_fresh(entry, Instant::now())
            .then(|| entry.value.clone())
    }

    /// Store `value` under `key`, labelled with `tags`, for at most `ttl`.
    pub async fn insert(&self, key: &str, value: serde_json::Value, tags: &[&str], ttl: Duration) {
        self.insert_at(key, value, tags, ttl, Instant::now()).await;
    }

    /// Store an entry computed from data read at `read_at`.
    async fn insert_at(
        &self,
        key: &str,
        value: serde_json::Value,
        tags: &[&str],
        ttl: Duration,
        read_at: Instant,
    ) {
        let entry = CacheEntry {
            value,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            stored_at: read_at,
            ttl,
        };
        self.inner.write().await.entries.insert(key.to_string(), entry);
    }

    /// Return the fresh cached value, or compute, store and return a new one.
    ///
    /// Errors from `load` are returned as-is and nothing is cached. The entry
    /// is stamped with the instant the load started, so an invalidation that
    /// lands while `load` runs still expires it.
    pub async fn get_or_try_insert_with<F, Fut>(
        &self,
        key: &str,
        tags: &[&str],
        ttl: Duration,
        load: F,
    ) -> Result<serde_json::Value, AppError>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<serde_json::Value, AppError>> + Send,
    {
        if let Some(hit) = self.get(key).await {
            tracing::debug!(key, "cache hit");
            return Ok(hit);
        }

        let started = Instant::now();
        let value = load().await?;
        self.insert_at(key, value.clone(), tags, ttl, started).await;
        Ok(value)
    }

    /// Number of stored entries, fresh or not.
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TagInvalidator for TagCache {
    async fn invalidate(&self, tag: &str, expire: Duration) {
        let now = Instant::now();
        let expiry = now + expire;
        let mut inner = self.inner.write().await;

        let slot = inner.tag_expiry.entry(tag.to_string()).or_insert(expiry);
        if *slot < expiry {
            *slot = expiry;
        }

        if expire.is_zero() {
            inner
                .entries
                .retain(|_, entry| !entry.tags.iter().any(|t| t == tag));
        }
    }
}
