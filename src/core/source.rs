//! Status source abstraction
//!
//! The poller only needs to log in and fetch the raw status body. This trait
//! is the seam between the polling logic and the HTTP session, so the poller
//! can be driven by a scripted source in tests.

use async_trait::async_trait;
use thiserror::Error;

/// Error types for modem operations
#[derive(Debug, Error)]
pub enum ModemError {
    #[error("Login rejected (status {0})")]
    LoginRejected(u16),

    #[error("Status request failed (status {0})")]
    Status(u16),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("No route to device: {0}")]
    Unreachable(String),

    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for ModemError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ModemError::Timeout(error.to_string())
        } else if error.is_connect() {
            ModemError::Unreachable(error.to_string())
        } else {
            ModemError::Http(error.to_string())
        }
    }
}

/// Something that can authenticate against the modem and return its status blob
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Submit the login form
    async fn login(&self) -> Result<(), ModemError>;

    /// Fetch the raw pipe-delimited status body
    async fn fetch_status(&self) -> Result<String, ModemError>;

    /// Human-readable identifier used in logs
    fn source_name(&self) -> &str;
}
