//! Execution service
//!
//! Runs one report job:
//! - Building the geodesic buffer and statistics payload
//! - Submitting the payload to the statistics service
//! - Mapping the outcome to a terminal job status
//!
//! Every failure is turned into a `Failure` outcome; nothing escapes as an error.

use async_trait::async_trait;
use popreport_client::StatisticsService;
use popreport_core::domain::job::{ExternalResult, JobStatus};
use popreport_core::dto::report::ReportParams;
use popreport_core::payload::try_build_payload;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Terminal status and result of an executed job
#[derive(Debug, Clone, PartialEq)]
pub struct JobOutcome {
    pub status: JobStatus,
    pub result: ExternalResult,
}

impl JobOutcome {
    /// Outcome carrying the raw statistics response body
    pub fn success(body: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Success,
            result: ExternalResult::Response(body.into()),
        }
    }

    /// Outcome carrying an error descriptor
    pub fn failure(fallback_message: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Failure,
            result: ExternalResult::error(fallback_message),
        }
    }
}

/// Service trait for executing report jobs
#[async_trait]
pub trait ExecutionService: Send + Sync {
    /// Executes a report job, always producing a terminal outcome
    async fn execute(&self, params: &ReportParams) -> JobOutcome;
}

/// Standard implementation of ExecutionService
pub struct StandardExecutionService {
    statistics: Arc<dyn StatisticsService>,
}

impl StandardExecutionService {
    /// Creates a new standard execution service
    pub fn new(statistics: Arc<dyn StatisticsService>) -> Self {
        Self { statistics }
    }
}

#[async_trait]
impl ExecutionService for StandardExecutionService {
    async fn execute(&self, params: &ReportParams) -> JobOutcome {
        let payload = match try_build_payload(&params.center(), params.radius) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Could not build statistics payload: {}", e);
                return JobOutcome::failure(format!("could not compute geodesic buffer: {}", e));
            }
        };

        debug!(
            request_id = %payload.request_id,
            "Built payload with {} vertices",
            payload.polygon.len()
        );

        match self.statistics.submit(&payload).await {
            Ok(response) => {
                info!(
                    request_id = %payload.request_id,
                    "Statistics service answered with status {}",
                    response.status
                );
                JobOutcome::success(response.body)
            }
            Err(e) => {
                let message = e.describe();
                warn!(
                    request_id = %payload.request_id,
                    "Statistics request failed: {}",
                    message
                );
                JobOutcome::failure(message)
            }
        }
    }
}
