//! Population report DTOs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::job::{ExternalResult, JobStatus};
use crate::geo::CoordinatePoint;

/// Smallest accepted buffer radius, in kilometers
pub const MIN_RADIUS_KM: f64 = 0.1;

/// Key used for errors that are not tied to a single field
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Parameters of a population report request
///
/// This is both the submission body and the typed input handed to the
/// executor. Longitude is kept as submitted; use [`ReportParams::center`] for
/// the normalized point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportParams {
    /// Buffer radius in kilometers
    pub radius: f64,
    pub longitude: f64,
    pub latitude: f64,
}

impl ReportParams {
    pub fn new(longitude: f64, latitude: f64, radius: f64) -> Self {
        Self {
            radius,
            longitude,
            latitude,
        }
    }

    /// The normalized center point of the report
    pub fn center(&self) -> CoordinatePoint {
        CoordinatePoint::new(self.longitude, self.latitude)
    }

    /// Validates the request
    ///
    /// Field checks run first; the coordinate check only runs once every
    /// field is individually valid.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        for (field, value) in [
            ("radius", self.radius),
            ("longitude", self.longitude),
            ("latitude", self.latitude),
        ] {
            if !value.is_finite() {
                errors.add(field, "A valid number is required.");
            }
        }

        if self.radius.is_finite() && self.radius < MIN_RADIUS_KM {
            errors.add(
                "radius",
                format!("Ensure this value is greater than or equal to {MIN_RADIUS_KM}."),
            );
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        if !self.center().is_valid() {
            errors.add(NON_FIELD_ERRORS, "Provided coordinates are not correct.");
            return Err(errors);
        }

        Ok(())
    }
}

/// Field-keyed validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for a field, if any
    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        write!(f, "{}", rendered.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Identifier and status of a report task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRef {
    pub id: Uuid,
    pub status: JobStatus,
}

/// Response body for both submission and polling
///
/// `result` is only present once the task is terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportResponse {
    pub task: TaskRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ExternalResult>,
}

impl ReportResponse {
    /// Response for a task that has not finished yet
    pub fn pending(id: Uuid, status: JobStatus) -> Self {
        Self {
            task: TaskRef { id, status },
            result: None,
        }
    }

    /// Response for a finished task
    pub fn completed(id: Uuid, status: JobStatus, result: Option<ExternalResult>) -> Self {
        Self {
            task: TaskRef { id, status },
            result,
        }
    }
}
