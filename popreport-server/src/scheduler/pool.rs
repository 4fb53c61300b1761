//! Worker pool
//!
//! Drains the job queue and executes report jobs in the background.
//! Each job runs in its own task; a semaphore bounds how many run at once.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore, mpsc::Receiver};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::repository::JobStore;
use crate::scheduler::QueuedJob;
use crate::service::{ExecutionService, JobOutcome};

/// Worker pool that executes queued report jobs
pub struct WorkerPool {
    store: Arc<dyn JobStore>,
    executor: Arc<dyn ExecutionService>,
    semaphore: Arc<Semaphore>,
}

impl WorkerPool {
    /// Creates a new worker pool running at most `max_parallel` jobs at once
    pub fn new(
        store: Arc<dyn JobStore>,
        executor: Arc<dyn ExecutionService>,
        max_parallel: usize,
    ) -> Self {
        Self {
            store,
            executor,
            semaphore: Arc::new(Semaphore::new(max_parallel)),
        }
    }

    /// Runs until every queue sender is dropped
    pub async fn run(self, mut receiver: Receiver<QueuedJob>) {
        info!(
            "Starting worker pool (max parallel jobs: {})",
            self.semaphore.available_permits()
        );

        while let Some(job) = receiver.recv().await {
            let permit = match self.semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    error!("Worker pool semaphore closed, dropping job {}", job.job_id);
                    break;
                }
            };

            debug!("Dispatching job {}", job.job_id);
            self.spawn_job_task(job, permit);
        }

        info!("Job queue closed, worker pool stopping");
    }

    /// Spawns a task to execute a single job
    fn spawn_job_task(&self, job: QueuedJob, permit: OwnedSemaphorePermit) {
        let store = Arc::clone(&self.store);
        let executor = Arc::clone(&self.executor);

        tokio::spawn(async move {
            Self::execute_job(job, store, executor).await;
            // Permit is released when dropped
            drop(permit);
        });
    }

    async fn execute_job(
        job: QueuedJob,
        store: Arc<dyn JobStore>,
        executor: Arc<dyn ExecutionService>,
    ) {
        let job_id = job.job_id;

        if let Err(e) = store.start(job_id) {
            warn!("Could not start job {}: {}", job_id, e);
            return;
        }

        info!("Starting execution of job {}", job_id);

        // Run in a nested task so a panic still leaves the job terminal
        let handle = tokio::spawn(async move { executor.execute(&job.params).await });

        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Job {} task panicked: {}", job_id, e);
                JobOutcome::failure(format!("job execution aborted: {}", e))
            }
        };

        Self::finish(store.as_ref(), job_id, outcome);
    }

    fn finish(store: &dyn JobStore, job_id: Uuid, outcome: JobOutcome) {
        let status = outcome.status;
        match store.complete(job_id, status, outcome.result) {
            Ok(_) => info!("Job {} finished with status {}", job_id, status),
            Err(e) => error!("Failed to record result of job {}: {}", job_id, e),
        }
    }
}
