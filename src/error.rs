//! Error types for the adapter.
//!
//! Every backend failure funnels through one translation point — the
//! [`From<elasticsearch::Error>`] impl — so callers depend only on this
//! taxonomy, never on the client library's error hierarchy.

use thiserror::Error;

/// The error type for all adapter operations.
#[derive(Error, Debug)]
pub enum DaoError {
    /// A request to the backend timed out.
    #[error("connection timed out: {message}")]
    ConnectionTimeout {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The backend could not be reached at the transport level.
    #[error("connection failed: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An operation was attempted before `connect()` or after `close()`.
    #[error("not connected")]
    NotConnected,

    /// The backend reported an error, or returned an error-flagged response.
    /// Carries the backend's reported reason and HTTP status when available.
    #[error("backend error: {message}")]
    Backend {
        message: String,
        status: Option<u16>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The backend returned a response the adapter could not interpret.
    #[error("malformed response: {message}")]
    Response { message: String },
}

/// Result type alias for adapter operations.
pub type DaoResult<T> = Result<T, DaoError>;

impl From<elasticsearch::Error> for DaoError {
    fn from(err: elasticsearch::Error) -> Self {
        // Classification order is fixed: timeout, then transport-level
        // connection failure (no HTTP status), then everything else.
        if err.is_timeout() {
            DaoError::ConnectionTimeout {
                message: err.to_string(),
                source: Some(Box::new(err)),
            }
        } else if err.status_code().is_none() {
            DaoError::Connection {
                message: err.to_string(),
                source: Some(Box::new(err)),
            }
        } else {
            let status = err.status_code().map(|s| s.as_u16());
            DaoError::Backend {
                message: err.to_string(),
                status,
                source: Some(Box::new(err)),
            }
        }
    }
}

impl From<serde_json::Error> for DaoError {
    fn from(err: serde_json::Error) -> Self {
        DaoError::Response {
            message: err.to_string(),
        }
    }
}
