use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

/// A memoized computed attribute.
///
/// Embed one as a private field and route the accessor through
/// [`get_or_init`](LazyMethod::get_or_init): the first access runs the
/// computation and stores the result in the slot, every later access returns
/// the stored value without running it again.
///
/// ```
/// use gyver_misc::LazyMethod;
///
/// struct Report {
///     rows: Vec<u64>,
///     total: LazyMethod<u64>,
/// }
///
/// impl Report {
///     fn total(&self) -> u64 {
///         *self.total.get_or_init(|| self.rows.iter().sum())
///     }
/// }
///
/// let report = Report { rows: vec![1, 2, 3], total: LazyMethod::new() };
/// assert_eq!(report.total(), 6);
/// assert!(report.total.is_initialized());
/// ```
pub struct LazyMethod<T> {
    slot: OnceLock<T>,
}

impl<T> LazyMethod<T> {
    pub const fn new() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    pub fn get_or_init<F>(&self, init: F) -> &T
    where
        F: FnOnce() -> T,
    {
        self.slot.get_or_init(init)
    }

    /// Fallible variant of [`get_or_init`](LazyMethod::get_or_init). An error
    /// leaves the slot empty so the next access tries again.
    pub fn get_or_try_init<E, F>(&self, init: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(value) = self.slot.get() {
            return Ok(value);
        }
        let value = init()?;
        Ok(self.slot.get_or_init(|| value))
    }

    pub fn get(&self) -> Option<&T> {
        self.slot.get()
    }

    pub fn is_initialized(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Empties the slot, returning what was cached.
    pub fn take(&mut self) -> Option<T> {
        self.slot.take()
    }
}

impl<T> Default for LazyMethod<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for LazyMethod<T> {
    fn clone(&self) -> Self {
        let slot = OnceLock::new();
        if let Some(value) = self.slot.get() {
            let _ = slot.set(value.clone());
        }
        Self { slot }
    }
}

impl<T: fmt::Debug> fmt::Debug for LazyMethod<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot.get() {
            Some(value) => f.debug_tuple("LazyMethod").field(value).finish(),
            None => f.write_str("LazyMethod(<uninit>)"),
        }
    }
}

/// A memoized computation that takes arguments besides its owner.
///
/// Results are cached per argument key; use a tuple for several arguments.
/// The lock is not held while computing, so two threads missing the same key
/// at once may both compute it. The first stored result wins and both callers
/// receive it.
pub struct LazyArgs<A, T> {
    slots: Mutex<HashMap<A, T>>,
}

impl<A, T> LazyArgs<A, T>
where
    A: Eq + Hash,
    T: Clone,
{
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<A, T>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get_or_init<F>(&self, args: A, init: F) -> T
    where
        F: FnOnce(&A) -> T,
    {
        let cached = self.lock().get(&args).cloned();
        if let Some(value) = cached {
            return value;
        }

        let computed = init(&args);
        self.lock().entry(args).or_insert(computed).clone()
    }

    pub fn get(&self, args: &A) -> Option<T> {
        self.lock().get(args).cloned()
    }

    pub fn is_initialized(&self, args: &A) -> bool {
        self.lock().contains_key(args)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&mut self) {
        self.slots
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl<A, T> Default for LazyArgs<A, T>
where
    A: Eq + Hash,
    T: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A, T> fmt::Debug for LazyArgs<A, T>
where
    A: Eq + Hash,
    T: Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyArgs")
            .field("cached", &self.len())
            .finish()
    }
}
