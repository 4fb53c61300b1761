//! Service configuration
//!
//! Defines all configurable parameters for the service including the
//! listen address, the statistics endpoint, and worker pool sizing.

use std::str::FromStr;
use std::time::Duration;

/// Default endpoint of the population estimation service
pub const DEFAULT_STATISTICS_API_URL: &str = "https://sedac.ciesin.columbia.edu/arcgis/rest/";

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server listens on (e.g., "0.0.0.0:8080")
    pub bind_addr: String,

    /// URL the statistics payload is posted to
    pub statistics_api_url: String,

    /// Max report jobs executing at once
    pub max_parallel_jobs: usize,

    /// Max jobs waiting in the queue before submissions are refused
    pub queue_capacity: usize,

    /// Overall timeout for the outbound call; `None` keeps the transport default
    pub statistics_timeout: Option<Duration>,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(bind_addr: String, statistics_api_url: String) -> Self {
        Self {
            bind_addr,
            statistics_api_url,
            max_parallel_jobs: 4,
            queue_capacity: 256,
            statistics_timeout: None,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - STATISTICS_API_URL (required)
    /// - BIND_ADDR (optional, default: 0.0.0.0:8080)
    /// - MAX_PARALLEL_JOBS (optional, default: 4)
    /// - QUEUE_CAPACITY (optional, default: 256)
    /// - STATISTICS_TIMEOUT (optional, seconds, default: none)
    ///
    /// A present but malformed optional value is an error, not a silent default.
    pub fn from_env() -> anyhow::Result<Self> {
        let statistics_api_url = std::env::var("STATISTICS_API_URL")
            .map_err(|_| anyhow::anyhow!("STATISTICS_API_URL environment variable not set"))?;

        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let mut config = Self::new(bind_addr, statistics_api_url);

        if let Some(max_parallel_jobs) =
            parse_setting("MAX_PARALLEL_JOBS", std::env::var("MAX_PARALLEL_JOBS").ok())?
        {
            config.max_parallel_jobs = max_parallel_jobs;
        }

        if let Some(queue_capacity) =
            parse_setting("QUEUE_CAPACITY", std::env::var("QUEUE_CAPACITY").ok())?
        {
            config.queue_capacity = queue_capacity;
        }

        config.statistics_timeout =
            parse_setting::<u64>("STATISTICS_TIMEOUT", std::env::var("STATISTICS_TIMEOUT").ok())?
                .map(Duration::from_secs);

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bind_addr.is_empty() {
            anyhow::bail!("bind_addr cannot be empty");
        }

        if !self.statistics_api_url.starts_with("http://")
            && !self.statistics_api_url.starts_with("https://")
        {
            anyhow::bail!("statistics_api_url must start with http:// or https://");
        }

        if self.max_parallel_jobs == 0 {
            anyhow::bail!("max_parallel_jobs must be greater than 0");
        }

        if self.queue_capacity == 0 {
            anyhow::bail!("queue_capacity must be greater than 0");
        }

        if self.statistics_timeout.is_some_and(|t| t.is_zero()) {
            anyhow::bail!("statistics_timeout must be greater than 0");
        }

        Ok(())
    }
}

/// Parses an optional setting, rejecting values that are present but malformed
fn parse_setting<T: FromStr>(name: &str, raw: Option<String>) -> anyhow::Result<Option<T>> {
    match raw {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("{} has an invalid value: {:?}", name, value)),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            "0.0.0.0:8080".to_string(),
            DEFAULT_STATISTICS_API_URL.to_string(),
        )
    }
}
