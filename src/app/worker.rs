use crate::config::WorkerConfig;
use crate::domain::ports::WorkerCache;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{AbortHandle, JoinHandle};

pub const DEFAULT_CAPACITY: usize = 64;

#[derive(Error, Debug)]
pub enum WorkerError<E> {
    #[error("Worker failed: {0}")]
    Failed(Arc<E>),

    #[error("Worker panicked while processing the key")]
    Panicked,

    #[error("Worker queue is closed")]
    Closed,
}

impl<E> Clone for WorkerError<E> {
    fn clone(&self) -> Self {
        match self {
            WorkerError::Failed(err) => WorkerError::Failed(Arc::clone(err)),
            WorkerError::Panicked => WorkerError::Panicked,
            WorkerError::Closed => WorkerError::Closed,
        }
    }
}

pub type WorkerResult<V, E> = std::result::Result<V, WorkerError<E>>;
type WorkerFuture<V, E> = Pin<Box<dyn Future<Output = std::result::Result<V, E>> + Send>>;
type WorkerFn<K, V, E> = Box<dyn Fn(K) -> WorkerFuture<V, E> + Send + Sync>;
type Waiters<K, V, E> = HashMap<K, Vec<oneshot::Sender<WorkerResult<V, E>>>>;

struct Shared<K, V, E>
where
    K: Send + Sync,
    V: Send + Sync,
{
    worker: WorkerFn<K, V, E>,
    cache: Arc<dyn WorkerCache<K, V>>,
    ongoing: Mutex<Waiters<K, V, E>>,
}

impl<K, V, E> Shared<K, V, E>
where
    K: Send + Sync,
    V: Send + Sync,
{
    fn ongoing(&self) -> MutexGuard<'_, Waiters<K, V, E>> {
        self.ongoing.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Processes keys one at a time on a background task, answering every caller
/// that asked for the same key with a single run of the worker.
///
/// The cache is consulted before anything is queued and updated after each
/// successful run. A job that panics answers its callers with
/// [`WorkerError::Panicked`]. The background task is spawned on the first
/// cache miss, so a queue must be used from within a tokio runtime.
pub struct WorkerQueue<K, V, E>
where
    K: Send + Sync,
    V: Send + Sync,
{
    shared: Arc<Shared<K, V, E>>,
    sender: mpsc::Sender<K>,
    receiver: Mutex<Option<mpsc::Receiver<K>>>,
    task: Mutex<Option<JoinHandle<()>>>,
    closed: AtomicBool,
}

impl<K, V, E> WorkerQueue<K, V, E>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// `capacity` bounds the number of queued keys; `0` picks [`DEFAULT_CAPACITY`].
    pub fn new<W, Fut, C>(worker: W, cache: C, capacity: usize) -> Self
    where
        W: Fn(K) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<V, E>> + Send + 'static,
        C: WorkerCache<K, V> + 'static,
    {
        let capacity = if capacity == 0 { DEFAULT_CAPACITY } else { capacity };
        let (sender, receiver) = mpsc::channel(capacity);
        let worker: WorkerFn<K, V, E> =
            Box::new(move |key: K| -> WorkerFuture<V, E> { Box::pin(worker(key)) });

        Self {
            shared: Arc::new(Shared {
                worker,
                cache: Arc::new(cache),
                ongoing: Mutex::new(HashMap::new()),
            }),
            sender,
            receiver: Mutex::new(Some(receiver)),
            task: Mutex::new(None),
            closed: AtomicBool::new(false),
        }
    }

    pub fn from_config<W, Fut, C>(worker: W, cache: C, config: &WorkerConfig) -> Self
    where
        W: Fn(K) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<V, E>> + Send + 'static,
        C: WorkerCache<K, V> + 'static,
    {
        Self::new(worker, cache, config.capacity())
    }

    /// Returns the value for `key`, from the cache when possible, otherwise
    /// from the worker. Concurrent requests for a key that is already queued
    /// share its outcome.
    pub async fn require(&self, key: K) -> WorkerResult<V, E> {
        if let Some(value) = self.shared.cache.get(&key).await {
            tracing::trace!("worker queue: cache hit");
            return Ok(value);
        }
        if self.is_closed() {
            return Err(WorkerError::Closed);
        }

        let (reply, response) = oneshot::channel();
        let reply = match self.join_in_flight(&key, reply) {
            Some(reply) => reply,
            None => return Self::wait(response).await,
        };

        self.ensure_worker();
        // Nothing is registered until a queue slot is held, so a caller
        // dropped while waiting for room leaves no orphaned waiters.
        let permit = match self.sender.reserve().await {
            Ok(permit) => permit,
            Err(_) => return Err(WorkerError::Closed),
        };
        if self.is_closed() {
            return Err(WorkerError::Closed);
        }

        {
            let mut ongoing = self.shared.ongoing();
            match ongoing.get_mut(&key) {
                // Someone else queued the key while we waited for the permit.
                Some(waiters) => {
                    waiters.push(reply);
                    drop(permit);
                }
                None => {
                    ongoing.insert(key.clone(), vec![reply]);
                    permit.send(key);
                }
            }
        }

        Self::wait(response).await
    }

    /// Adds `reply` to the waiters of an in-flight `key`, or hands it back
    /// when the key is not queued yet.
    fn join_in_flight(
        &self,
        key: &K,
        reply: oneshot::Sender<WorkerResult<V, E>>,
    ) -> Option<oneshot::Sender<WorkerResult<V, E>>> {
        match self.shared.ongoing().get_mut(key) {
            Some(waiters) => {
                waiters.push(reply);
                None
            }
            None => Some(reply),
        }
    }

    async fn wait(response: oneshot::Receiver<WorkerResult<V, E>>) -> WorkerResult<V, E> {
        match response.await {
            Ok(outcome) => outcome,
            Err(_) => Err(WorkerError::Closed),
        }
    }

    fn ensure_worker(&self) {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if task.is_some() {
            return;
        }
        let receiver = self
            .receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(receiver) = receiver {
            *task = Some(tokio::spawn(run_worker(Arc::clone(&self.shared), receiver)));
        }
    }
}

impl<K, V, E> WorkerQueue<K, V, E>
where
    K: Send + Sync,
    V: Send + Sync,
{
    /// Number of keys queued or being processed.
    pub fn in_flight(&self) -> usize {
        self.shared.ongoing().len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Stops the background task. Callers still waiting, and any later
    /// request that misses the cache, receive [`WorkerError::Closed`].
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(task) = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            task.abort();
        }
        self.receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.shared.ongoing().clear();
        tracing::debug!("worker queue closed");
    }
}

impl<K, V, E> Drop for WorkerQueue<K, V, E>
where
    K: Send + Sync,
    V: Send + Sync,
{
    fn drop(&mut self) {
        self.close();
    }
}

struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

async fn run_worker<K, V, E>(shared: Arc<Shared<K, V, E>>, mut receiver: mpsc::Receiver<K>)
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    tracing::debug!("worker queue started");
    while let Some(key) = receiver.recv().await {
        let outcome = match run_job(&shared, key.clone()).await {
            Ok(Ok(value)) => {
                shared.cache.set(&key, &value).await;
                Ok(value)
            }
            Ok(Err(err)) => {
                tracing::warn!("worker queue: worker failed, notifying waiters");
                Err(WorkerError::Failed(Arc::new(err)))
            }
            Err(err) => {
                tracing::warn!("worker queue: worker panicked: {}", err);
                Err(WorkerError::Panicked)
            }
        };

        let waiters = shared.ongoing().remove(&key).unwrap_or_default();
        tracing::trace!("worker queue: answering {} waiter(s)", waiters.len());
        for waiter in waiters {
            let _ = waiter.send(outcome.clone());
        }
    }
    tracing::debug!("worker queue stopped");
}

/// Runs one job on its own task so a panic in the worker ends the job, not the queue.
async fn run_job<K, V, E>(
    shared: &Shared<K, V, E>,
    key: K,
) -> std::result::Result<std::result::Result<V, E>, String>
where
    K: Send + Sync + 'static,
    V: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    let job = catch_unwind(AssertUnwindSafe(|| (shared.worker)(key)))
        .map_err(|_| "worker panicked before returning a future".to_string())?;
    let handle = tokio::spawn(job);
    // Closing the queue aborts this task; take the running job down with it.
    let _guard = AbortOnDrop(handle.abort_handle());
    handle.await.map_err(|err| err.to_string())
}
