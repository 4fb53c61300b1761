//! Population Statistics HTTP Client
//!
//! A small, type-safe client for the external population estimation service.
//!
//! The service accepts a polygon plus a catalog of variables and answers with
//! statistics for the covered area. This crate only transports the request:
//! the response body is handed back untouched, whatever its status code.
//!
//! # Example
//!
//! ```no_run
//! use popreport_client::{StatisticsClient, StatisticsService};
//! use popreport_core::geo::CoordinatePoint;
//! use popreport_core::payload::try_build_payload;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = StatisticsClient::new("http://localhost:9000/execute")?;
//!     let payload = try_build_payload(&CoordinatePoint::new(13.4, 52.5), 5.0)?;
//!
//!     let response = client.submit(&payload).await?;
//!     println!("{} -> {}", response.status, response.body);
//!     Ok(())
//! }
//! ```

pub mod error;
mod statistics;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use statistics::{StatisticsResponse, StatisticsService};

use reqwest::Client;
use std::time::Duration;

/// HTTP client for the population statistics service
#[derive(Debug, Clone)]
pub struct StatisticsClient {
    /// Full URL the payload is posted to
    endpoint: String,
    /// HTTP client instance
    client: Client,
}

impl StatisticsClient {
    /// Create a new statistics client with transport defaults (no timeout)
    ///
    /// # Arguments
    /// * `endpoint` - The URL the payload is posted to
    ///
    /// # Example
    /// ```
    /// use popreport_client::StatisticsClient;
    ///
    /// let client = StatisticsClient::new("http://localhost:9000/execute").unwrap();
    /// assert_eq!(client.endpoint(), "http://localhost:9000/execute");
    /// ```
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::with_client(endpoint, Client::new())
    }

    /// Create a new statistics client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(endpoint: impl Into<String>, client: Client) -> Result<Self> {
        let endpoint = endpoint.into();
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(ClientError::InvalidEndpoint(endpoint));
        }
        Ok(Self { endpoint, client })
    }

    /// Create a new statistics client with an optional overall request timeout
    ///
    /// `None` keeps the transport default, which never times out.
    pub fn with_timeout(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self::with_client(endpoint, builder.build()?)
    }

    /// Get the endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
