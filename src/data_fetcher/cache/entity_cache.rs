use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Process-lifetime map from entity key to decoded payload.
///
/// Entries never expire and are never evicted individually. Clones share the
/// same underlying map, so the handle can be injected into several accessors
/// and still inspected by the caller.
#[derive(Debug)]
pub struct EntityCache<V> {
    entries: Arc<RwLock<HashMap<String, V>>>,
}

impl<V> Clone for EntityCache<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<V> Default for EntityCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> EntityCache<V> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Applies `mutator` to the whole mapping under the write lock.
    pub async fn update<F, R>(&self, mutator: F) -> R
    where
        F: FnOnce(&mut HashMap<String, V>) -> R,
    {
        let mut entries = self.entries.write().await;
        mutator(&mut entries)
    }

    pub async fn contains_key(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl<V: Clone> EntityCache<V> {
    /// Returns the cached payload for `key`, regardless of its age.
    #[instrument(skip(self))]
    pub async fn read(&self, key: &str) -> Option<V> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(value) => {
                debug!("Cache hit: key={key}");
                Some(value.clone())
            }
            None => {
                debug!("Cache miss: key={key}");
                None
            }
        }
    }

    /// Stores `payload` under `key`, replacing any previous entry. Other keys
    /// are untouched.
    #[instrument(skip(self, payload))]
    pub async fn write(&self, key: &str, payload: V) {
        let size = self
            .update(|entries| {
                entries.insert(key.to_string(), payload);
                entries.len()
            })
            .await;
        debug!("Cached entry: key={key}, entries={size}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_missing_key_is_none() {
        let cache: EntityCache<String> = EntityCache::new();
        assert!(cache.read("abc").await.is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_write_then_read_returns_payload() {
        let cache = EntityCache::new();
        cache.write("abc", "league abc".to_string()).await;

        assert_eq!(cache.read("abc").await.as_deref(), Some("league abc"));
        assert!(cache.contains_key("abc").await);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_write_leaves_other_keys_untouched() {
        let cache = EntityCache::new();
        cache.write("a", 1).await;
        cache.write("b", 2).await;
        cache.write("a", 3).await;

        assert_eq!(cache.read("a").await, Some(3));
        assert_eq!(cache.read("b").await, Some(2));
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = EntityCache::new();
        let handle = cache.clone();
        handle.write("shared", 42u32).await;

        assert_eq!(cache.read("shared").await, Some(42));
    }

    #[tokio::test]
    async fn test_update_sees_whole_mapping() {
        let cache = EntityCache::new();
        cache.write("x", 1).await;
        cache.write("y", 2).await;

        let total: i32 = cache.update(|entries| entries.values().sum()).await;
        assert_eq!(total, 3);

        cache
            .update(|entries| {
                entries.insert("z".to_string(), 10);
            })
            .await;
        assert_eq!(cache.read("z").await, Some(10));
    }
}
