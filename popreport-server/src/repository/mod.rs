//! Repository Module
//!
//! Data access layer for the service.
//! Jobs live in memory behind the `JobStore` trait so a persistent backend
//! can replace the map without touching the service or scheduler.

pub mod job;

// Re-export for convenience
pub use job as job_repository;
pub use job::{InMemoryJobStore, JobStore, StoreError};
