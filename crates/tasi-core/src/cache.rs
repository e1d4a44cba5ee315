//! In-memory TTL caching for API responses and derived tables.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default lifetime of a cached entry.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Canonical cache key for an endpoint plus its query parameters.
///
/// Parameters are sorted by name so that the same logical request always
/// produces the same key regardless of argument order.
pub fn cache_key(endpoint: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return endpoint.to_owned();
    }

    let mut sorted: Vec<_> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let query = sorted
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("{endpoint}?{query}")
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

#[derive(Debug)]
struct CacheInner<V> {
    map: HashMap<String, CacheEntry<V>>,
    default_ttl: Duration,
}

impl<V: Clone> CacheInner<V> {
    fn new(default_ttl: Duration) -> Self {
        Self {
            map: HashMap::new(),
            default_ttl,
        }
    }

    fn get(&self, key: &str) -> Option<V> {
        self.map.get(key).and_then(|entry| {
            if Instant::now() <= entry.expires_at {
                Some(entry.value.clone())
            } else {
                None
            }
        })
    }

    fn put(&mut self, key: String, value: V) {
        let expires_at = Instant::now() + self.default_ttl;
        self.map.insert(key, CacheEntry { value, expires_at });
    }
}

/// Thread-safe in-memory cache with a single TTL.
///
/// Clones share the same storage, so clearing through any handle clears it
/// for every holder.
#[derive(Debug)]
pub struct CacheStore<V = String> {
    inner: Arc<tokio::sync::RwLock<CacheInner<V>>>,
}

impl<V> Clone for CacheStore<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: Clone + Send + Sync> CacheStore<V> {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(tokio::sync::RwLock::new(CacheInner::new(default_ttl))),
        }
    }

    /// Get a cached value for the given key if it exists and hasn't expired.
    pub async fn get(&self, key: &str) -> Option<V> {
        let store = self.inner.read().await;
        store.get(key)
    }

    /// Store a value under `key`; a no-op when the TTL is zero.
    pub async fn put(&self, key: String, value: V) {
        let mut store = self.inner.write().await;

        if store.default_ttl == Duration::ZERO {
            return;
        }

        store.put(key, value);
    }

    /// Drop every entry, expired or not.
    pub async fn clear(&self) {
        let mut store = self.inner.write().await;
        store.map.clear();
    }

    /// Number of entries held (including expired ones not yet purged).
    pub async fn len(&self) -> usize {
        let store = self.inner.read().await;
        store.map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cache_store_basic_operations() {
        let cache: CacheStore = CacheStore::new(Duration::from_secs(1));

        assert!(cache.get("key1").await.is_none());

        cache.put("key1".to_string(), "value1".to_string()).await;
        assert_eq!(cache.get("key1").await, Some("value1".to_string()));

        cache.put("key1".to_string(), "value2".to_string()).await;
        assert_eq!(cache.get("key1").await, Some("value2".to_string()));
    }

    #[tokio::test]
    async fn test_cache_expiration() {
        let cache: CacheStore = CacheStore::new(Duration::from_millis(100));

        cache.put("key1".to_string(), "value1".to_string()).await;
        assert!(cache.get("key1").await.is_some());

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(cache.get("key1").await.is_none());
    }

    #[tokio::test]
    async fn test_cache_clear_drops_live_entries() {
        let cache: CacheStore = CacheStore::new(DEFAULT_TTL);

        cache.put("key1".to_string(), "value1".to_string()).await;
        cache.put("key2".to_string(), "value2".to_string()).await;

        cache.clear().await;
        assert!(cache.get("key1").await.is_none());
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_cache_zero_ttl_stores_nothing() {
        let cache: CacheStore = CacheStore::new(Duration::ZERO);

        cache.put("key1".to_string(), "value1".to_string()).await;
        assert!(cache.get("key1").await.is_none());
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn clones_share_storage() {
        let cache: CacheStore<Vec<u32>> = CacheStore::new(DEFAULT_TTL);
        let handle = cache.clone();

        cache.put("rows".to_string(), vec![1, 2, 3]).await;
        assert_eq!(handle.get("rows").await, Some(vec![1, 2, 3]));

        handle.clear().await;
        assert!(cache.get("rows").await.is_none());
    }

    #[test]
    fn cache_key_is_independent_of_param_order() {
        let a = cache_key(
            "/quotes/",
            &[("symbols", String::from("2222")), ("limit", String::from("5"))],
        );
        let b = cache_key(
            "/quotes/",
            &[("limit", String::from("5")), ("symbols", String::from("2222"))],
        );

        assert_eq!(a, b);
        assert_eq!(a, "/quotes/?limit=5&symbols=2222");
        assert_eq!(cache_key("/market/summary/", &[]), "/market/summary/");
    }
}
