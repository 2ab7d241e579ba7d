//! Request client error types

use serde_json::Value;
use thiserror::Error;

/// Errors returned by [`ApiClient`](super::ApiClient) calls
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered 401; the session has already been cleared
    #[error("Not authorized: session expired or token rejected")]
    Unauthorized,

    /// Any other non-success status, with the JSON payload when there was one
    #[error("API error {status}")]
    Http { status: u16, body: Option<Value> },

    #[error("Server unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(String),

    /// The request interceptor refused to send the request
    #[error("Request rejected before sending: {0}")]
    Interceptor(String),
}

impl ApiError {
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Unavailable
        } else {
            ApiError::Request(err)
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// HTTP status, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Structured error payload from the server, if any
    pub fn payload(&self) -> Option<&Value> {
        match self {
            ApiError::Http { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

/// Result type for API calls
pub type ApiResult<T> = Result<T, ApiError>;
