//! Composition Root
//!
//! Builds the session store, the shared request client and the services from
//! a [`Config`], and hands out views wired to them.

use std::sync::Arc;

use crate::client::{ApiClient, ApiResult, SessionEvent};
use crate::config::Config;
use crate::i18n::Locale;
use crate::pages::{HeaderBar, HomePage, LoginPage, PageContext, ProfilePage, RegisterPage};
use crate::routes::{register_routes, History, Route};
use crate::services::{AuthService, ChatService};
use crate::session::SessionStore;
use tokio::sync::broadcast;

/// Application wiring
pub struct App {
    config: Config,
    session: Arc<SessionStore>,
    client: Arc<ApiClient>,
    auth: Arc<AuthService>,
    chat: Arc<ChatService>,
    history: Arc<History>,
    ctx: PageContext,
}

impl App {
    /// Wire the app with the session store the config asks for
    pub fn new(config: Config) -> ApiResult<Self> {
        let session = if config.storage.persist {
            SessionStore::open(&config.storage.session_file())
        } else {
            SessionStore::in_memory()
        };
        Self::with_session(config, session)
    }

    /// Wire the app around an existing session store
    pub fn with_session(config: Config, session: SessionStore) -> ApiResult<Self> {
        register_routes();

        let session = Arc::new(session);
        let client = Arc::new(ApiClient::new(&config.api)?);
        client.attach_auth_interceptor(session.clone());

        let history = Arc::new(History::new(Route::Home));
        let ctx = PageContext::new(session.clone(), history.clone(), config.ui.locale)
            .with_events(client.event_sender());

        tracing::debug!(
            base_url = %client.base_url(),
            persistent = session.is_available(),
            "App initialized"
        );

        Ok(Self {
            auth: Arc::new(AuthService::new(client.clone())),
            chat: Arc::new(ChatService::new(client.clone())),
            config,
            session,
            client,
            history,
            ctx,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn locale(&self) -> Locale {
        self.ctx.locale
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    pub fn history(&self) -> &Arc<History> {
        &self.history
    }

    /// Sign-in, sign-out and expiry notifications from every view and the
    /// request client
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.ctx.subscribe()
    }

    pub fn home_page(&self) -> HomePage {
        HomePage::new(self.ctx.clone(), self.chat.clone())
    }

    pub fn login_page(&self) -> LoginPage {
        LoginPage::new(self.ctx.clone(), self.auth.clone())
    }

    pub fn register_page(&self) -> RegisterPage {
        RegisterPage::new(self.ctx.clone(), self.auth.clone())
    }

    pub fn profile_page(&self) -> ProfilePage {
        ProfilePage::new(self.ctx.clone(), self.auth.clone())
    }

    pub fn header_bar(&self) -> HeaderBar {
        HeaderBar::new(self.ctx.clone())
    }
}
