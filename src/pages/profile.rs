//! Profile view
//!
//! Shows the cached member at once, then refreshes it from the server and
//! stores the fresh copy next to the existing token.

use std::sync::Arc;

use super::{Lifecycle, LifecycleHandle, LoadOutcome, Mount, PageContext};
use crate::i18n::Text;
use crate::models::{Member, Session};
use crate::routes::Route;
use crate::services::AuthApi;

pub struct ProfilePage {
    ctx: PageContext,
    auth: Arc<dyn AuthApi>,
    lifecycle: Lifecycle,
    token: Option<String>,
    member: Option<Member>,
    error: Option<String>,
    loading: bool,
}

impl ProfilePage {
    pub fn new(ctx: PageContext, auth: Arc<dyn AuthApi>) -> Self {
        Self {
            ctx,
            auth,
            lifecycle: Lifecycle::new(),
            token: None,
            member: None,
            error: None,
            loading: true,
        }
    }

    /// Without a session the store is cleared and the view redirects to login
    pub fn mount(&mut self) -> Mount {
        match self.ctx.session.session() {
            Some(Session { token, member }) => {
                self.token = Some(token);
                self.member = Some(member);
                self.loading = true;
                Mount::Ready
            }
            None => {
                self.ctx.session.clear();
                self.ctx.navigator.navigate(Route::Login, true);
                Mount::Redirected(Route::Login)
            }
        }
    }

    pub fn unmount(&mut self) {
        self.lifecycle.invalidate();
    }

    pub fn lifecycle_handle(&self) -> LifecycleHandle {
        self.lifecycle.handle()
    }

    pub fn member(&self) -> Option<&Member> {
        self.member.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Member registration time, localized
    pub fn joined(&self) -> String {
        self.ctx
            .locale
            .format_timestamp(self.member.as_ref().and_then(|m| m.created_at))
    }

    /// Status line to show instead of the profile, if any
    pub fn placeholder(&self) -> Option<String> {
        if self.loading {
            return Some(self.ctx.text(Text::LoadingProfile));
        }
        if let Some(error) = &self.error {
            return Some(error.clone());
        }
        if self.member.is_none() {
            return Some(self.ctx.text(Text::MemberNotFound));
        }
        None
    }

    /// Refresh the member from the server
    pub async fn load(&mut self) -> LoadOutcome {
        let Some(token) = self.token.clone() else {
            return LoadOutcome::Skipped;
        };

        let ticket = self.lifecycle.begin();
        let result = self.auth.current_member().await;
        if !self.lifecycle.is_current(ticket) {
            tracing::debug!("Dropping profile response for retired view");
            return LoadOutcome::Discarded;
        }

        match result {
            // A logout or another login while the request was out wins over
            // this response.
            Ok(_) if self.ctx.session.token().as_deref() != Some(token.as_str()) => {
                tracing::debug!("Session changed during profile refresh, dropping response");
                self.token = None;
                self.member = None;
                self.loading = false;
                LoadOutcome::Discarded
            }
            Ok(fresh) => {
                self.ctx.session.save(&Session::new(token, fresh.clone()));
                self.member = Some(fresh);
                self.loading = false;
                LoadOutcome::Loaded
            }
            Err(err) if err.is_unauthorized() => {
                self.token = None;
                self.member = None;
                self.loading = false;
                self.ctx.expire_session();
                LoadOutcome::Expired
            }
            Err(err) => {
                tracing::warn!(error = %err, "Profile refresh failed");
                self.error = Some(self.ctx.text(Text::ProfileLoadFailed));
                self.loading = false;
                LoadOutcome::Failed
            }
        }
    }

    pub fn logout(&mut self) {
        self.lifecycle.invalidate();
        self.token = None;
        self.member = None;
        self.ctx.sign_out();
    }
}
