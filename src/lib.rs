//! # Groupchat
//!
//! Client for a token-authenticated group chat REST API: a persisted
//! session, one shared request client that attaches the token and reacts to
//! 401 responses, typed auth and chat services, and headless views that
//! hold everything a front-end renders.
//!
//! ## Modules
//!
//! - [`session`]: session persistence over a key-value backend
//! - [`client`]: the authenticated request client
//! - [`services`]: typed auth and chat calls
//! - [`pages`]: session-aware views
//! - [`routes`]: client-side routes and navigation
//! - [`app`]: wiring from a [`Config`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use groupchat::{App, Config, SubmitOutcome};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = App::new(Config::load_default())?;
//!
//!     let mut login = app.login_page();
//!     login.set_username("alice");
//!     login.set_password("secret");
//!     if login.submit().await == SubmitOutcome::Completed {
//!         let mut home = app.home_page();
//!         home.mount();
//!         home.load_messages().await;
//!         for view in home.views() {
//!             println!("{} [{}]: {}", view.author, view.time, view.content);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod client;
pub mod config;
pub mod i18n;
pub mod models;
pub mod pages;
pub mod routes;
pub mod services;
pub mod session;

#[cfg(test)]
mod test_support;

pub use app::App;

pub use client::{ApiClient, ApiError, ApiResult, SessionEvent};

pub use config::{generate_default_config, Config, ConfigError, LoggingConfig};

pub use i18n::{Locale, Text};

pub use models::{AuthResponse, Credentials, Member, Message, NewMessage, Session};

pub use pages::{
    HeaderBar, HomePage, LoadOutcome, LoginPage, MessageView, Mount, PageContext, ProfilePage,
    RegisterPage, SubmitOutcome,
};

pub use routes::{register_routes, registered_routes, History, Navigator, Route};

pub use services::{AuthApi, AuthService, ChatApi, ChatService};

pub use session::{FileStorage, MemoryStorage, SessionContext, SessionStore, StorageBackend};
