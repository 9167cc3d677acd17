use async_trait::async_trait;

/// Result store consulted by [`WorkerQueue`](crate::app::worker::WorkerQueue)
/// before a key is handed to the worker.
#[async_trait]
pub trait WorkerCache<K, V>: Send + Sync
where
    K: Send + Sync,
    V: Send + Sync,
{
    async fn get(&self, key: &K) -> Option<V>;
    async fn set(&self, key: &K, value: &V);
}
