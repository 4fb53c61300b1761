//! Bounded job queue

use popreport_core::dto::report::ReportParams;
use tokio::sync::mpsc::{self, Permit, Receiver, Sender, error::TrySendError};
use uuid::Uuid;

/// Work item handed to the worker pool
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueuedJob {
    pub job_id: Uuid,
    pub params: ReportParams,
}

/// Reason a slot could not be reserved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    Full,
    Closed,
}

/// Sending half of the job queue
///
/// Cheap to clone; every API handler holds one.
#[derive(Debug, Clone)]
pub struct JobQueue {
    sender: Sender<QueuedJob>,
}

impl JobQueue {
    /// Reserves a slot without waiting
    ///
    /// Holding the permit guarantees the following send succeeds, so a job
    /// is only recorded once it is certain to be executed.
    pub fn try_reserve(&self) -> Result<Permit<'_, QueuedJob>, QueueError> {
        self.sender.try_reserve().map_err(|e| match e {
            TrySendError::Full(()) => QueueError::Full,
            TrySendError::Closed(()) => QueueError::Closed,
        })
    }

    /// Free slots left in the queue
    pub fn remaining(&self) -> usize {
        self.sender.capacity()
    }
}

/// Creates a queue holding at most `capacity` waiting jobs
pub fn channel(capacity: usize) -> (JobQueue, Receiver<QueuedJob>) {
    let (sender, receiver) = mpsc::channel(capacity);
    (JobQueue { sender }, receiver)
}
