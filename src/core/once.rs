use crate::utils::error::{MiscError, Result};
use std::fmt;
use std::future::Future;
use std::sync::{Mutex, OnceLock, PoisonError};
use tokio::sync::OnceCell;

/// Runs a closure at most once and hands out its first result forever after.
///
/// Concurrent callers block until the single run finishes. If the body
/// panics it is gone for good: later calls report [`MiscError::Poisoned`].
pub struct CallOnce<F, T> {
    body: Mutex<Option<F>>,
    result: OnceLock<T>,
}

impl<F, T> CallOnce<F, T>
where
    F: FnOnce() -> T,
{
    pub fn new(body: F) -> Self {
        Self {
            body: Mutex::new(Some(body)),
            result: OnceLock::new(),
        }
    }

    /// # Deadlocks
    /// The body runs while an internal lock is held, so a body that calls
    /// back into the same `CallOnce` never returns.
    pub fn try_call(&self) -> Result<&T> {
        if let Some(value) = self.result.get() {
            return Ok(value);
        }

        let mut pending = self.body.lock().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have finished while we waited on the lock.
        if let Some(value) = self.result.get() {
            return Ok(value);
        }

        let body = pending.take().ok_or(MiscError::Poisoned)?;
        tracing::trace!("call_once: running body");
        let value = body();
        Ok(self.result.get_or_init(|| value))
    }

    /// # Panics
    /// Panics if an earlier run of the body panicked. Re-entrant calls from
    /// inside the body deadlock, see [`try_call`](CallOnce::try_call).
    pub fn call(&self) -> &T {
        match self.try_call() {
            Ok(value) => value,
            Err(err) => panic!("{}", err),
        }
    }
}

impl<F, T> CallOnce<F, T> {
    pub fn has_run(&self) -> bool {
        self.result.get().is_some()
    }

    pub fn get(&self) -> Option<&T> {
        self.result.get()
    }

    pub fn into_inner(self) -> Option<T> {
        self.result.into_inner()
    }
}

impl<F, T: fmt::Debug> fmt::Debug for CallOnce<F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallOnce")
            .field("result", &self.result.get())
            .finish()
    }
}

pub fn call_once<F, T>(body: F) -> CallOnce<F, T>
where
    F: FnOnce() -> T,
{
    CallOnce::new(body)
}

/// Async flavour of [`CallOnce`].
///
/// Callers that arrive while the body is running wait for it instead of
/// starting another run. Cancelling the future that is running the body
/// consumes the body, so it behaves like a panic.
pub struct AsyncCallOnce<F, T> {
    body: Mutex<Option<F>>,
    result: OnceCell<T>,
}

impl<F, Fut, T> AsyncCallOnce<F, T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = T>,
{
    pub fn new(body: F) -> Self {
        Self {
            body: Mutex::new(Some(body)),
            result: OnceCell::new(),
        }
    }

    pub async fn try_call(&self) -> Result<&T> {
        self.result
            .get_or_try_init(|| async {
                let body = self
                    .body
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .take();
                match body {
                    Some(body) => {
                        tracing::trace!("call_once: running async body");
                        Ok(body().await)
                    }
                    None => Err(MiscError::Poisoned),
                }
            })
            .await
    }

    /// # Panics
    /// Panics if an earlier run of the body panicked or was cancelled.
    pub async fn call(&self) -> &T {
        match self.try_call().await {
            Ok(value) => value,
            Err(err) => panic!("{}", err),
        }
    }
}

impl<F, T> AsyncCallOnce<F, T> {
    pub fn has_run(&self) -> bool {
        self.result.initialized()
    }

    pub fn get(&self) -> Option<&T> {
        self.result.get()
    }
}

impl<F, T: fmt::Debug> fmt::Debug for AsyncCallOnce<F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncCallOnce")
            .field("result", &self.result.get())
            .finish()
    }
}

pub fn acall_once<F, Fut, T>(body: F) -> AsyncCallOnce<F, T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = T>,
{
    AsyncCallOnce::new(body)
}
