//! Error types for the statistics client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when calling the statistics service
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a complete response was received
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Endpoint is not an http(s) URL
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl ClientError {
    /// Check if the request timed out
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::RequestFailed(err) if err.is_timeout())
    }

    /// Check if the connection could not be established
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::RequestFailed(err) if err.is_connect())
    }

    /// Full description including every underlying cause
    ///
    /// reqwest keeps the interesting part (refused, timed out, DNS) in the
    /// source chain rather than in its own message.
    pub fn describe(&self) -> String {
        let mut description = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            let cause_text = cause.to_string();
            if !description.contains(&cause_text) {
                description.push_str(": ");
                description.push_str(&cause_text);
            }
            source = cause.source();
        }
        description
    }
}
