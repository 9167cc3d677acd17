pub mod worker;

pub use worker::{WorkerError, WorkerQueue, WorkerResult};
