//! API error types

use thiserror::Error;

/// Errors returned by the REST client
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend rejected the bearer token (HTTP 401)
    #[error("Not authorized: {0}")]
    Unauthorized(String),

    /// Any other non-success HTTP response
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Transport failure (connection refused, timeout, TLS, ...)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body was not the JSON we expected
    #[error("Response parse error: {message}")]
    Parse {
        message: String,
        body: Option<String>,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The worker running the request died before producing a result
    #[error("Request aborted: {0}")]
    Aborted(String),
}

impl ApiError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(401),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}
