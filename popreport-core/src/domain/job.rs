//! Job domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dto::report::ReportParams;

/// Population report job record
///
/// Structure owned by the job store; the worker pool drives its transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub status: JobStatus,
    pub params: ReportParams,
    pub submitted_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub result: Option<ExternalResult>,
}

impl Job {
    /// Creates a freshly submitted job with a new identifier
    pub fn new(params: ReportParams) -> Self {
        Self {
            id: Uuid::new_v4(),
            status: JobStatus::Pending,
            params,
            submitted_at: Utc::now(),
            started_at: None,
            completed_at: None,
            result: None,
        }
    }
}

/// Job lifecycle status
///
/// `Pending -> Progress -> Success | Failure`. Terminal states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Progress,
    Success,
    Failure,
}

impl JobStatus {
    /// Whether the job has reached a final state
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Success | JobStatus::Failure)
    }

    /// Whether the lifecycle allows moving from `self` to `next`
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        match (self, next) {
            (JobStatus::Pending, JobStatus::Progress) => true,
            (JobStatus::Pending | JobStatus::Progress, next) => next.is_terminal(),
            _ => false,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "PENDING"),
            JobStatus::Progress => write!(f, "PROGRESS"),
            JobStatus::Success => write!(f, "SUCCESS"),
            JobStatus::Failure => write!(f, "FAILURE"),
        }
    }
}

/// Terminal value of a job
///
/// Either the raw body returned by the statistics service, or an error record
/// describing why no response was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExternalResult {
    Error {
        message: String,
        fallback_message: String,
    },
    Response(String),
}

impl ExternalResult {
    pub const ERROR_MESSAGE: &'static str = "error";

    /// Builds an error record with the given description
    pub fn error(fallback_message: impl Into<String>) -> Self {
        ExternalResult::Error {
            message: Self::ERROR_MESSAGE.to_string(),
            fallback_message: fallback_message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ExternalResult::Error { .. })
    }
}
