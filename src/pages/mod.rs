//! Session-Aware Views
//!
//! Headless view models for the four routes plus the header bar. Each one
//! reads the session on mount, calls a service, and turns every outcome into
//! view state; no error escapes to the caller.
//!
//! ## Mount contract
//!
//! - Login/Register: an existing session redirects to `/`
//! - Profile: no session clears storage and redirects to `/login`
//! - Home: no session shows a placeholder and fetches nothing
//!
//! A 401 from any call takes the single "session expired" path: clear the
//! session, mark the view unauthenticated, redirect to `/login`.

mod form;
mod header;
mod home;
mod lifecycle;
mod login;
mod profile;
mod register;

pub use form::{server_error_message, CredentialsForm, FormKind};
pub use header::HeaderBar;
pub use home::{HomePage, MessageView};
pub use lifecycle::{Lifecycle, LifecycleHandle, Ticket};
pub use login::LoginPage;
pub use profile::ProfilePage;
pub use register::RegisterPage;

use std::sync::Arc;
use tokio::sync::broadcast;

use crate::client::SessionEvent;
use crate::i18n::{Locale, Text};
use crate::models::Session;
use crate::routes::{Navigator, Route};
use crate::session::SessionContext;

/// Result of mounting a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mount {
    /// The view stays; continue with its requests
    Ready,
    /// The view redirected away on mount
    Redirected(Route),
}

/// Result of a load request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// Not attempted (no session)
    Skipped,
    /// The server rejected the session
    Expired,
    /// Error text is in the view state
    Failed,
    /// The view was retired before the response arrived
    Discarded,
}

/// Result of a form submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Completed,
    /// Rejected client-side; no request was made
    Invalid,
    /// Nothing to do (empty draft or a request already in flight)
    Ignored,
    Expired,
    Failed,
    Discarded,
}

/// Shared dependencies every view needs
#[derive(Clone)]
pub struct PageContext {
    pub session: Arc<dyn SessionContext>,
    pub navigator: Arc<dyn Navigator>,
    pub locale: Locale,
    events: broadcast::Sender<SessionEvent>,
}

impl PageContext {
    pub fn new(
        session: Arc<dyn SessionContext>,
        navigator: Arc<dyn Navigator>,
        locale: Locale,
    ) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            session,
            navigator,
            locale,
            events,
        }
    }

    /// Publish sign-in/sign-out through an existing channel
    pub fn with_events(mut self, events: broadcast::Sender<SessionEvent>) -> Self {
        self.events = events;
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub(crate) fn text(&self, key: Text) -> String {
        self.locale.text(key).to_string()
    }

    pub(crate) fn sign_in(&self, session: &Session) {
        self.session.save(session);
        let _ = self.events.send(SessionEvent::SignedIn {
            username: session.member.username.clone(),
        });
        tracing::info!(username = %session.member.username, "Signed in");
        self.navigator.navigate(Route::Home, true);
    }

    pub(crate) fn sign_out(&self) {
        self.session.clear();
        let _ = self.events.send(SessionEvent::SignedOut);
        tracing::info!("Signed out");
        self.navigator.navigate(Route::Login, true);
    }

    /// The unified 401 path. The request client normally cleared the session
    /// already; clearing again is harmless.
    pub(crate) fn expire_session(&self) {
        self.session.clear();
        tracing::info!("Session expired, redirecting to login");
        self.navigator.navigate(Route::Login, true);
    }
}
