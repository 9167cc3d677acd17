pub mod casting;
pub mod lazy;
pub mod once;

pub use casting::{
    as_async, asafe_cast, asafe_cast_if, filter_isinstance, parse_or, safe_cast, safe_cast_if,
    safe_cast_opt, try_cast, Blocking,
};
pub use lazy::{LazyArgs, LazyMethod};
pub use once::{acall_once, call_once, AsyncCallOnce, CallOnce};
