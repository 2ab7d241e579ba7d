//! Authenticated Request Client
//!
//! A single shared HTTP client for the chat API.
//!
//! ## Request/response policy
//!
//! 1. Outbound: [`AuthInterceptor`] sets `Authorization: Token <token>` when
//!    the session holds a token
//! 2. Inbound 401: the session is cleared and [`SessionEvent::Expired`] is
//!    broadcast before the caller sees [`ApiError::Unauthorized`]

mod error;
mod http;
mod interceptor;

pub use error::{ApiError, ApiResult};
pub use http::ApiClient;
pub use interceptor::{AuthInterceptor, TOKEN_SCHEME};

/// Session lifecycle notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A login or registration stored a new session
    SignedIn { username: String },
    /// The user logged out
    SignedOut,
    /// The server rejected the token
    Expired,
}
