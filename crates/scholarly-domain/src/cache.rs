//! Query cache for fetched lists.
//!
//! Lists are cached under a key with a fetch time. Entries past the TTL
//! are treated as missing, and every mutation invalidates the keys it
//! affects so the next read refetches.

use std::any::Any;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;
use tracing::trace;

/// Well-known cache keys.
pub mod keys {
    pub const APPLICATIONS: &str = "applications";
    pub const SCHOLARSHIPS: &str = "scholarships";
    pub const REVIEWS: &str = "reviews";
    pub const USERS: &str = "users";

    /// One applicant's applications. Shares the `applications` prefix so
    /// invalidating all applications also clears these.
    pub fn applications_of(email: &str) -> String {
        format!("{}:{}", APPLICATIONS, email.to_ascii_lowercase())
    }
}

/// Entries kept when no capacity is given.
const DEFAULT_CAPACITY: usize = 64;

struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    fetched_at: Instant,
}

impl Entry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() > ttl
    }
}

/// Keyed, TTL-bounded cache of fetched values.
///
/// Expired entries are dropped when they are next touched, and the least
/// recently used entry is evicted once the cache is full.
pub struct QueryCache {
    entries: Mutex<LruCache<String, Entry>>,
    /// None disables caching entirely.
    ttl: Option<Duration>,
}

impl QueryCache {
    /// A zero TTL disables caching.
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, DEFAULT_CAPACITY)
    }

    /// As [`QueryCache::new`], holding at most `capacity` entries (minimum 1).
    pub fn with_capacity(ttl: Duration, capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(cap)),
            ttl: (!ttl.is_zero()).then_some(ttl),
        }
    }

    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Fresh cached value for `key`, if any.
    pub fn get<T>(&self, key: &str) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let ttl = self.ttl?;
        let mut entries = self.entries.lock();
        if entries.peek(key)?.is_expired(ttl) {
            entries.pop(key);
            trace!(key, "cache entry expired");
            return None;
        }
        entries.get(key)?.value.downcast_ref::<T>().cloned()
    }

    pub fn insert<T>(&self, key: impl Into<String>, value: T)
    where
        T: Send + Sync + 'static,
    {
        let Some(ttl) = self.ttl else {
            return;
        };
        let mut entries = self.entries.lock();
        prune(&mut entries, ttl);
        let key = key.into();
        if let Some((evicted, _)) = entries.push(
            key.clone(),
            Entry {
                value: Arc::new(value),
                fetched_at: Instant::now(),
            },
        ) && evicted != key
        {
            trace!(key = %evicted, "cache entry evicted");
        }
    }

    /// Return the cached value or run `fetch` and cache its result.
    ///
    /// Errors are not cached.
    pub async fn get_or_fetch<T, E, F, Fut>(&self, key: &str, fetch: F) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.get::<T>(key) {
            trace!(key, "cache hit");
            return Ok(hit);
        }
        let value = fetch().await?;
        self.insert(key, value.clone());
        Ok(value)
    }

    /// Drop `key` and every key that extends it (`key:...`).
    pub fn invalidate(&self, key: &str) {
        let nested = format!("{}:", key);
        let mut entries = self.entries.lock();
        let stale: Vec<String> = entries
            .iter()
            .filter(|(k, _)| k.as_str() == key || k.starts_with(&nested))
            .map(|(k, _)| k.clone())
            .collect();
        for k in &stale {
            entries.pop(k);
        }
        trace!(key, "cache invalidated");
    }

    /// Drop every expired entry now.
    pub fn purge_expired(&self) {
        if let Some(ttl) = self.ttl {
            prune(&mut self.entries.lock(), ttl);
        }
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }
}

fn prune(entries: &mut LruCache<String, Entry>, ttl: Duration) {
    let expired: Vec<String> = entries
        .iter()
        .filter(|(_, entry)| entry.is_expired(ttl))
        .map(|(k, _)| k.clone())
        .collect();
    for key in &expired {
        entries.pop(key);
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.len())
            .field("capacity", &self.capacity())
            .field("ttl", &self.ttl)
            .finish()
    }
}
