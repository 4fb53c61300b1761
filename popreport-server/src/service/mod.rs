//! Service Module
//!
//! Business logic layer for the service.
//! Submission and polling go through `job`; background work through `execution`.

pub mod execution;
pub mod job;

// Re-export for convenience
pub use execution::{ExecutionService, JobOutcome, StandardExecutionService};
pub use job as job_service;
