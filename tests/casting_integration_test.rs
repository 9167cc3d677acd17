use gyver_misc::{
    acall_once, as_async, asafe_cast, call_once, safe_cast, safe_cast_if, LazyArgs, LazyMethod,
    MiscError,
};
use std::num::ParseIntError;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn test_safe_cast_matches_conversion_or_default() {
    let inputs = ["0", "42", "-17", "abc", "4.2", "", " 1", "99999999999999999999"];

    for input in inputs {
        let expected = input.parse::<i64>().unwrap_or(0);
        assert_eq!(safe_cast(input, str::parse::<i64>, 0), expected, "input {:?}", input);
    }

    assert_eq!(safe_cast("abc", str::parse::<i64>, 0), 0);
    assert_eq!(safe_cast("42", str::parse::<i64>, 0), 42);
}

#[test]
fn test_safe_cast_if_only_swallows_selected_errors() {
    #[derive(Debug, PartialEq)]
    enum ConvertError {
        BadInput,
        Fatal,
    }

    let convert = |value: &str| match value {
        "bad" => Err(ConvertError::BadInput),
        "fatal" => Err(ConvertError::Fatal),
        other => Ok(other.len()),
    };
    let ignore_bad = |err: &ConvertError| *err == ConvertError::BadInput;

    assert_eq!(safe_cast_if("four", convert, 0, ignore_bad), Ok(4));
    assert_eq!(safe_cast_if("bad", convert, 0, ignore_bad), Ok(0));
    assert_eq!(safe_cast_if("fatal", convert, 0, ignore_bad), Err(ConvertError::Fatal));
}

#[tokio::test]
async fn test_async_cast_helpers_mirror_sync_ones() {
    let parse = |value: &'static str| async move { value.parse::<i64>() };

    assert_eq!(asafe_cast("abc", parse, 0).await, safe_cast("abc", str::parse::<i64>, 0));
    assert_eq!(asafe_cast("42", parse, 0).await, safe_cast("42", str::parse::<i64>, 0));

    let blocking_parse = as_async(|value: String| -> Result<i64, ParseIntError> { value.parse() });
    let parsed = blocking_parse.call("12".to_string()).await.unwrap();
    assert_eq!(parsed, Ok(12));
}

struct Fibonacci {
    evaluations: AtomicUsize,
    first_twenty: LazyMethod<Vec<u64>>,
    nth: LazyArgs<usize, u64>,
}

impl Fibonacci {
    fn new() -> Self {
        Self {
            evaluations: AtomicUsize::new(0),
            first_twenty: LazyMethod::new(),
            nth: LazyArgs::new(),
        }
    }

    fn first_twenty(&self) -> &[u64] {
        self.first_twenty.get_or_init(|| {
            self.evaluations.fetch_add(1, Ordering::SeqCst);
            let mut values = vec![0, 1];
            while values.len() < 20 {
                let next = values[values.len() - 1] + values[values.len() - 2];
                values.push(next);
            }
            values
        })
    }

    fn nth(&self, n: usize) -> u64 {
        self.nth.get_or_init(n, |&n| {
            self.evaluations.fetch_add(1, Ordering::SeqCst);
            self.first_twenty()[n]
        })
    }
}

#[test]
fn test_lazy_attributes_are_computed_once_per_owner() {
    let fib = Fibonacci::new();

    assert_eq!(fib.first_twenty()[10], 55);
    assert_eq!(fib.first_twenty()[10], 55);
    assert_eq!(fib.evaluations.load(Ordering::SeqCst), 1);

    assert_eq!(fib.nth(19), 4181);
    assert_eq!(fib.nth(19), 4181);
    assert_eq!(fib.evaluations.load(Ordering::SeqCst), 2);

    let other = Fibonacci::new();
    assert!(!other.first_twenty.is_initialized());
    assert!(!other.nth.is_initialized(&19));
}

#[tokio::test]
async fn test_call_once_sync_and_async_agree() {
    let runs = AtomicUsize::new(0);
    let sync = call_once(|| runs.fetch_add(1, Ordering::SeqCst));
    let async_ = acall_once(|| async { runs.fetch_add(1, Ordering::SeqCst) });

    for _ in 0..3 {
        sync.call();
        async_.call().await;
    }

    assert_eq!(runs.load(Ordering::SeqCst), 2);
    assert_eq!(*sync.call(), 0);
    assert_eq!(*async_.call().await, 1);
}

#[test]
fn test_call_once_poisoned_error_message() {
    assert_eq!(
        MiscError::Poisoned.to_string(),
        "Callable was poisoned by a panic during its first call"
    );
}
