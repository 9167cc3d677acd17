use crate::utils::error::Result;
use std::any::Any;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

/// Runs `cast` on `value`, returning `default` when the conversion fails.
///
/// ```
/// use gyver_misc::safe_cast;
///
/// assert_eq!(safe_cast("42", str::parse::<i64>, 0), 42);
/// assert_eq!(safe_cast("abc", str::parse::<i64>, 0), 0);
/// ```
pub fn safe_cast<T, U, E, F>(value: T, cast: F, default: U) -> U
where
    F: FnOnce(T) -> std::result::Result<U, E>,
{
    match cast(value) {
        Ok(converted) => converted,
        Err(_) => {
            tracing::trace!("safe_cast: conversion failed, using default");
            default
        }
    }
}

/// Like [`safe_cast`] but only swallows the errors `ignore` accepts; anything
/// else is handed back to the caller untouched.
pub fn safe_cast_if<T, U, E, F, P>(
    value: T,
    cast: F,
    default: U,
    ignore: P,
) -> std::result::Result<U, E>
where
    F: FnOnce(T) -> std::result::Result<U, E>,
    P: FnOnce(&E) -> bool,
{
    match cast(value) {
        Ok(converted) => Ok(converted),
        Err(err) if ignore(&err) => {
            tracing::trace!("safe_cast_if: ignored conversion error, using default");
            Ok(default)
        }
        Err(err) => Err(err),
    }
}

/// `Some` with the converted value, or `None` when the conversion fails.
pub fn safe_cast_opt<T, U, E, F>(value: T, cast: F) -> Option<U>
where
    F: FnOnce(T) -> std::result::Result<U, E>,
{
    cast(value).ok()
}

pub fn try_cast<U, T>(value: T) -> Option<U>
where
    U: TryFrom<T>,
{
    U::try_from(value).ok()
}

pub fn parse_or<U: FromStr>(value: &str, default: U) -> U {
    safe_cast(value, str::parse::<U>, default)
}

/// Async counterpart of [`safe_cast`]: awaits the conversion and substitutes
/// `default` if it resolves to an error.
pub async fn asafe_cast<T, U, E, F, Fut>(value: T, cast: F, default: U) -> U
where
    F: FnOnce(T) -> Fut,
    Fut: Future<Output = std::result::Result<U, E>>,
{
    match cast(value).await {
        Ok(converted) => converted,
        Err(_) => {
            tracing::trace!("asafe_cast: conversion failed, using default");
            default
        }
    }
}

pub async fn asafe_cast_if<T, U, E, F, Fut, P>(
    value: T,
    cast: F,
    default: U,
    ignore: P,
) -> std::result::Result<U, E>
where
    F: FnOnce(T) -> Fut,
    Fut: Future<Output = std::result::Result<U, E>>,
    P: FnOnce(&E) -> bool,
{
    match cast(value).await {
        Ok(converted) => Ok(converted),
        Err(err) if ignore(&err) => Ok(default),
        Err(err) => Err(err),
    }
}

/// A blocking callable that can be awaited from async code.
///
/// Every [`call`](Blocking::call) runs the wrapped function on tokio's
/// blocking thread pool so the calling task never stalls the runtime.
pub struct Blocking<F> {
    func: Arc<F>,
}

impl<F> Blocking<F> {
    pub async fn call<A, T>(&self, arg: A) -> Result<T>
    where
        F: Fn(A) -> T + Send + Sync + 'static,
        A: Send + 'static,
        T: Send + 'static,
    {
        let func = Arc::clone(&self.func);
        let value = tokio::task::spawn_blocking(move || func(arg)).await?;
        Ok(value)
    }
}

impl<F> Clone for Blocking<F> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
        }
    }
}

/// Wraps a synchronous function so it can be awaited. A panic inside the
/// function surfaces as [`MiscError::TaskFailed`](crate::MiscError::TaskFailed).
pub fn as_async<F>(func: F) -> Blocking<F> {
    Blocking {
        func: Arc::new(func),
    }
}

/// Keeps only the items whose concrete type is `T`, in their original order.
pub fn filter_isinstance<'a, T, I>(items: I) -> impl Iterator<Item = &'a T>
where
    T: Any,
    I: IntoIterator<Item = &'a (dyn Any + 'static)>,
{
    items.into_iter().filter_map(|item| item.downcast_ref::<T>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::MiscError;
    use std::num::ParseIntError;

    #[derive(Debug, PartialEq)]
    struct CustomError;

    #[test]
    fn test_safe_cast() {
        assert_eq!(safe_cast(1, |v: i32| Ok::<_, ()>(v.to_string()), String::new()), "1");
        assert_eq!(safe_cast("1", str::parse::<i64>, 0), 1);
        assert_eq!(safe_cast("1.0", str::parse::<f64>, 0.0), 1.0);
        assert_eq!(safe_cast(1_i32, |v| Ok::<_, ()>(f64::from(v)), 0.0), 1.0);

        assert_eq!(safe_cast("a", str::parse::<i64>, -1), -1);
        assert_eq!(safe_cast("", str::parse::<i64>, -1), -1);
        assert_eq!(safe_cast("1.5", str::parse::<i64>, -1), -1);
    }

    #[test]
    fn test_safe_cast_custom_error() {
        let raise_error = |_: i32| Err::<String, _>(CustomError);
        assert_eq!(safe_cast(1, raise_error, String::new()), "");
    }

    #[test]
    fn test_safe_cast_if_propagates_unlisted_errors() {
        let always_fails = |_: &str| Err::<i64, _>(CustomError);

        assert_eq!(safe_cast_if("x", always_fails, 7, |_| true), Ok(7));
        assert_eq!(safe_cast_if("x", always_fails, 7, |_| false), Err(CustomError));
        assert_eq!(safe_cast_if("3", str::parse::<i64>, 7, |_| false), Ok(3));
    }

    #[test]
    fn test_safe_cast_opt_and_friends() {
        assert_eq!(safe_cast_opt("12", str::parse::<u8>), Some(12));
        assert_eq!(safe_cast_opt("300", str::parse::<u8>), None);

        assert_eq!(try_cast::<u8, _>(255_i32), Some(255));
        assert_eq!(try_cast::<u8, _>(256_i32), None);
        assert_eq!(try_cast::<u8, _>(-1_i64), None);

        assert_eq!(parse_or("2.5", 0.0_f64), 2.5);
        assert!(!parse_or("nope", false));
    }

    #[tokio::test]
    async fn test_asafe_cast_mirrors_sync() {
        async fn parse_async(value: &str) -> std::result::Result<i64, ParseIntError> {
            value.parse()
        }

        for input in ["42", "abc", "-7", ""] {
            let sync = safe_cast(input, str::parse::<i64>, 0);
            let async_ = asafe_cast(input, parse_async, 0).await;
            assert_eq!(sync, async_, "mismatch for {:?}", input);
        }
    }

    #[tokio::test]
    async fn test_asafe_cast_if() {
        let result = asafe_cast_if("x", |_| async { Err::<i64, _>(CustomError) }, 0, |_| false).await;
        assert_eq!(result, Err(CustomError));

        let result = asafe_cast_if("x", |_| async { Err::<i64, _>(CustomError) }, 5, |_| true).await;
        assert_eq!(result, Ok(5));
    }

    #[tokio::test]
    async fn test_as_async() {
        let func = as_async(|value: u32| value * 2);
        assert_eq!(func.call(21).await.unwrap(), 42);

        let cloned = func.clone();
        assert_eq!(cloned.call(1).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_as_async_panic_is_reported() {
        let func = as_async(|_: ()| -> u32 { panic!("boom") });
        let result = func.call(()).await;
        assert!(matches!(result, Err(MiscError::TaskFailed(_))));
    }

    #[test]
    fn test_filter_isinstance() {
        let items: Vec<Box<dyn Any>> = vec![
            Box::new(1_i32),
            Box::new(2.0_f64),
            Box::new(3_i32),
            Box::new("four"),
        ];

        let ints: Vec<i32> = filter_isinstance::<i32, _>(items.iter().map(|b| &**b))
            .copied()
            .collect();
        assert_eq!(ints, vec![1, 3]);

        let floats: Vec<f64> = filter_isinstance::<f64, _>(items.iter().map(|b| &**b))
            .copied()
            .collect();
        assert_eq!(floats, vec![2.0]);

        assert_eq!(filter_isinstance::<String, _>(items.iter().map(|b| &**b)).count(), 0);
    }
}
