//! HTTP client for the Dry Craft API, used by the `drycraft` CLI.
//!
//! [`ApiClient`] wraps the JSON endpoints, [`RetryPolicy`] adds bounded
//! exponential backoff for media transfers, and [`Poller`] drives the
//! near-real-time views (unread messages and notifications).

pub mod api;
pub mod poller;
pub mod retry;

use thiserror::Error;

pub use api::{ApiClient, AuthSession};
pub use poller::Poller;
pub use retry::RetryPolicy;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The server answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Not signed in; run `drycraft auth login` first")]
    NotAuthenticated,

    #[error("Gave up after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: Box<ClientError> },
}

impl ClientError {
    /// Failures worth retrying: connection problems, timeouts, 5xx, 408, 429
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Api { status, .. } => is_transient_status(*status),
            ClientError::Network(e) => {
                e.is_timeout() || e.is_connect() || e.status().map(|s| is_transient_status(s.as_u16())).unwrap_or(false)
            }
            ClientError::Timeout(_) => true,
            _ => false,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Network(e) => e.status().map(|s| s.as_u16()),
            ClientError::RetriesExhausted { last, .. } => last.status(),
            _ => None,
        }
    }
}

fn is_transient_status(status: u16) -> bool {
    status >= 500 || status == 408 || status == 429
}
