//! Job scheduler
//!
//! Queue between the API and the worker pool that executes report jobs.

pub mod pool;
pub mod queue;

pub use pool::WorkerPool;
pub use queue::{JobQueue, QueuedJob};
