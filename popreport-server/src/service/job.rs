//! Job Service
//!
//! Business logic for report submission and polling.

use popreport_core::domain::job::Job;
use popreport_core::dto::report::{ReportParams, ValidationErrors};
use uuid::Uuid;

use crate::repository::{JobStore, StoreError};
use crate::scheduler::queue::QueueError;
use crate::scheduler::{JobQueue, QueuedJob};

/// Service error type
#[derive(Debug)]
pub enum JobError {
    NotFound(Uuid),
    Validation(ValidationErrors),
    QueueFull,
    QueueClosed,
    Store(StoreError),
}

impl std::fmt::Display for JobError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobError::NotFound(id) => write!(f, "Job {} not found", id),
            JobError::Validation(errors) => write!(f, "Invalid request: {}", errors),
            JobError::QueueFull => write!(f, "Job queue is full"),
            JobError::QueueClosed => write!(f, "Job queue is closed"),
            JobError::Store(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for JobError {}

impl From<StoreError> for JobError {
    fn from(err: StoreError) -> Self {
        JobError::Store(err)
    }
}

impl From<QueueError> for JobError {
    fn from(err: QueueError) -> Self {
        match err {
            QueueError::Full => JobError::QueueFull,
            QueueError::Closed => JobError::QueueClosed,
        }
    }
}

/// Validate, record and enqueue a new report job
///
/// Nothing is recorded unless a queue slot was reserved first.
pub fn submit_report(
    store: &dyn JobStore,
    queue: &JobQueue,
    params: ReportParams,
) -> Result<Job, JobError> {
    params.validate().map_err(JobError::Validation)?;

    let permit = queue.try_reserve()?;

    let job = Job::new(params);
    store.insert(job.clone())?;
    permit.send(QueuedJob {
        job_id: job.id,
        params,
    });

    tracing::info!(
        "Report job submitted: {} (lon={}, lat={}, radius={}km)",
        job.id,
        params.longitude,
        params.latitude,
        params.radius
    );

    Ok(job)
}

/// Get a report job by ID
pub fn poll_report(store: &dyn JobStore, id: Uuid) -> Result<Job, JobError> {
    store.get(id).ok_or(JobError::NotFound(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryJobStore;
    use crate::scheduler::queue;
    use popreport_core::domain::job::JobStatus;
    use popreport_core::dto::report::NON_FIELD_ERRORS;

    #[tokio::test]
    async fn test_submit_records_and_enqueues() {
        let store = InMemoryJobStore::new();
        let (queue, mut rx) = queue::channel(4);
        let params = ReportParams::new(10.0, 50.0, 1.0);

        let job = submit_report(&store, &queue, params).unwrap();
        assert_eq!(job.status, JobStatus::Pending);

        let queued = rx.recv().await.unwrap();
        assert_eq!(queued.job_id, job.id);
        assert_eq!(queued.params, params);

        let polled = poll_report(&store, job.id).unwrap();
        assert_eq!(polled.status, JobStatus::Pending);
        assert!(polled.result.is_none());
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let store = InMemoryJobStore::new();
        let (queue, _rx) = queue::channel(8);
        let params = ReportParams::new(10.0, 50.0, 1.0);

        let a = submit_report(&store, &queue, params).unwrap();
        let b = submit_report(&store, &queue, params).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_only_valid_requests_are_recorded() {
        let store = InMemoryJobStore::new();
        let (queue, _rx) = queue::channel(4);

        let err = submit_report(&store, &queue, ReportParams::new(10.0, 50.0, 0.05)).unwrap_err();
        match err {
            JobError::Validation(errors) => assert!(errors.field("radius").is_some()),
            other => panic!("unexpected error: {}", other),
        }

        let err = submit_report(&store, &queue, ReportParams::new(10.0, 95.0, 1.0)).unwrap_err();
        match err {
            JobError::Validation(errors) => assert!(errors.field(NON_FIELD_ERRORS).is_some()),
            other => panic!("unexpected error: {}", other),
        }

        // longitude wraps instead of failing
        assert!(submit_report(&store, &queue, ReportParams::new(200.0, 50.0, 1.0)).is_ok());

        assert_eq!(store.len(), 1);
        assert_eq!(queue.remaining(), 3);
    }

    #[tokio::test]
    async fn test_full_queue_creates_nothing() {
        let store = InMemoryJobStore::new();
        let (queue, _rx) = queue::channel(1);
        let params = ReportParams::new(10.0, 50.0, 1.0);

        submit_report(&store, &queue, params).unwrap();
        let err = submit_report(&store, &queue, params).unwrap_err();

        assert!(matches!(err, JobError::QueueFull));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_poll_unknown_job() {
        let store = InMemoryJobStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(poll_report(&store, id), Err(JobError::NotFound(x)) if x == id));
    }
}
