//! Statistics service payloads
//!
//! Builds the `Input_Data` body for the population estimation service from a
//! center point and radius.

use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};

use crate::geo::{BufferError, CoordinatePoint, geodesic_buffer};

/// Variables requested from the population estimation service, in service order
pub const VARIABLES: [&str; 10] = [
    "gpw-v4-population-count-rev10_2000",
    "gpw-v4-population-count-rev10_2005",
    "gpw-v4-basic-demographic-characteristics-rev10_atotpopbt-count",
    "gpw-v4-population-count-rev10_2015",
    "gpw-v4-population-count-rev10_2020",
    "gpw-v4-basic-demographic-characteristics-rev10_a000-014bt-count",
    "gpw-v4-basic-demographic-characteristics-rev10_a015-064bt-count",
    "gpw-v4-basic-demographic-characteristics-rev10_a065plusbt-count",
    "gpw-v4-data-quality-indicators-rev10_mean-adminunitarea",
    "gpw-v4-land-water-area-rev10_landareakm",
];

/// Statistics computed for every variable
pub const STATISTICS: [&str; 2] = ["SUM", "MEAN"];

/// Length of the random part of a request id
pub const REQUEST_ID_SUFFIX_LEN: usize = 8;

/// Query sent to the statistics service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalPayload {
    /// Buffer ring as `[longitude, latitude]` pairs
    pub polygon: Vec<[f64; 2]>,
    pub variables: Vec<String>,
    pub statistics: Vec<String>,
    #[serde(rename = "requestId")]
    pub request_id: String,
}

/// Envelope the statistics service expects around the payload
#[derive(Debug, Serialize)]
pub struct StatisticsRequest<'a> {
    #[serde(rename = "Input_Data")]
    pub input_data: &'a ExternalPayload,
}

impl<'a> From<&'a ExternalPayload> for StatisticsRequest<'a> {
    fn from(input_data: &'a ExternalPayload) -> Self {
        Self { input_data }
    }
}

/// Builds the payload for a buffer of `radius_km` around `center`
pub fn try_build_payload(
    center: &CoordinatePoint,
    radius_km: f64,
) -> Result<ExternalPayload, BufferError> {
    let buffer = geodesic_buffer(center, radius_km)?;

    Ok(ExternalPayload {
        polygon: buffer
            .into_ring()
            .into_iter()
            .map(|(lon, lat)| [lon, lat])
            .collect(),
        variables: VARIABLES.iter().map(|v| v.to_string()).collect(),
        statistics: STATISTICS.iter().map(|s| s.to_string()).collect(),
        request_id: generate_request_id(),
    })
}

/// Like [`try_build_payload`], discarding the failure reason
pub fn build_payload(center: &CoordinatePoint, radius_km: f64) -> Option<ExternalPayload> {
    try_build_payload(center, radius_km).ok()
}

/// Current unix time in milliseconds followed by 8 random alphanumerics
pub fn generate_request_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(REQUEST_ID_SUFFIX_LEN)
        .map(char::from)
        .collect();

    format!("{millis}{suffix}")
}
