use crate::domain::ports::WorkerCache;
use async_trait::async_trait;
use std::collections::HashMap;
use std::hash::Hash;
use tokio::sync::RwLock;

/// A cache that never remembers anything; every request reaches the worker.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

#[async_trait]
impl<K, V> WorkerCache<K, V> for NoCache
where
    K: Send + Sync,
    V: Send + Sync,
{
    async fn get(&self, _key: &K) -> Option<V> {
        None
    }

    async fn set(&self, _key: &K, _value: &V) {}
}

/// Unbounded in-process cache.
#[derive(Debug)]
pub struct MemoryCache<K, V> {
    entries: RwLock<HashMap<K, V>>,
}

impl<K, V> MemoryCache<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

impl<K, V> Default for MemoryCache<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<K, V> WorkerCache<K, V> for MemoryCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    async fn get(&self, key: &K) -> Option<V> {
        self.entries.read().await.get(key).cloned()
    }

    async fn set(&self, key: &K, value: &V) {
        self.entries.write().await.insert(key.clone(), value.clone());
    }
}
