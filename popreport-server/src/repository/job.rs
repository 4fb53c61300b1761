//! Job Repository
//!
//! Registry of report jobs keyed by id. Every transition is checked against
//! the job lifecycle and applied while holding the entry's lock, so readers
//! only ever see a record before or after a transition.

use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use popreport_core::domain::job::{ExternalResult, Job, JobStatus};
use std::sync::Arc;
use uuid::Uuid;

/// Job store error type
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    NotFound(Uuid),
    DuplicateId(Uuid),
    InvalidTransition {
        id: Uuid,
        from: JobStatus,
        to: JobStatus,
    },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "Job {} not found", id),
            StoreError::DuplicateId(id) => write!(f, "Job {} already exists", id),
            StoreError::InvalidTransition { id, from, to } => {
                write!(f, "Job {} cannot move from {} to {}", id, from, to)
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// Storage for job records
///
/// Implementations must be safe for many concurrent readers and for one
/// writer per job.
pub trait JobStore: Send + Sync {
    /// Stores a newly submitted job
    fn insert(&self, job: Job) -> Result<(), StoreError>;

    /// Returns a snapshot of the job, if known
    fn get(&self, id: Uuid) -> Option<Job>;

    /// Moves a pending job to `Progress`
    fn start(&self, id: Uuid) -> Result<Job, StoreError>;

    /// Records the terminal status and result of a job
    fn complete(&self, id: Uuid, status: JobStatus, result: ExternalResult)
    -> Result<Job, StoreError>;
}

/// In-memory implementation of JobStore
///
/// Uses a `DashMap` so reads of one job never wait on writes to another.
#[derive(Clone, Default)]
pub struct InMemoryJobStore {
    jobs: Arc<DashMap<Uuid, Job>>,
}

impl InMemoryJobStore {
    /// Creates a new empty job store
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(DashMap::new()),
        }
    }

    /// Number of stored jobs
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    fn transition(
        &self,
        id: Uuid,
        to: JobStatus,
        apply: impl FnOnce(&mut Job),
    ) -> Result<Job, StoreError> {
        let mut job = self.jobs.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if !job.status.can_transition_to(to) {
            return Err(StoreError::InvalidTransition {
                id,
                from: job.status,
                to,
            });
        }

        job.status = to;
        apply(&mut job);

        Ok(job.clone())
    }
}

impl JobStore for InMemoryJobStore {
    fn insert(&self, job: Job) -> Result<(), StoreError> {
        match self.jobs.entry(job.id) {
            Entry::Occupied(_) => Err(StoreError::DuplicateId(job.id)),
            Entry::Vacant(slot) => {
                slot.insert(job);
                Ok(())
            }
        }
    }

    fn get(&self, id: Uuid) -> Option<Job> {
        self.jobs.get(&id).map(|job| job.clone())
    }

    fn start(&self, id: Uuid) -> Result<Job, StoreError> {
        self.transition(id, JobStatus::Progress, |job| {
            job.started_at = Some(Utc::now());
        })
    }

    fn complete(
        &self,
        id: Uuid,
        status: JobStatus,
        result: ExternalResult,
    ) -> Result<Job, StoreError> {
        self.transition(id, status, |job| {
            job.completed_at = Some(Utc::now());
            job.result = Some(result);
        })
    }
}
