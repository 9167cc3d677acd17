pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod helpers;
pub mod utils;

pub use adapters::cache::{MemoryCache, NoCache};
pub use app::{WorkerError, WorkerQueue, WorkerResult};
pub use config::MiscConfig;
pub use crate::core::{
    acall_once, as_async, asafe_cast, asafe_cast_if, call_once, filter_isinstance, parse_or,
    safe_cast, safe_cast_if, safe_cast_opt, try_cast, AsyncCallOnce, Blocking, CallOnce, LazyArgs,
    LazyMethod,
};
pub use domain::model::{Nested, OnConflict};
pub use domain::ports::WorkerCache;
pub use helpers::{Namespace, TimeZone};
pub use utils::error::{MiscError, Result};
