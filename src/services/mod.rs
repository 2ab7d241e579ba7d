//! Typed API Services
//!
//! Thin typed calls over the shared [`ApiClient`](crate::client::ApiClient).
//! Views depend on the [`AuthApi`] and [`ChatApi`] traits, not on the
//! concrete services.

pub mod auth;
pub mod chat;

pub use auth::{AuthApi, AuthService};
pub use chat::{ChatApi, ChatService};
