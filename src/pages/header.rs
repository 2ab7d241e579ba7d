//! Header bar shown above every view

use super::PageContext;
use crate::client::SessionEvent;

pub struct HeaderBar {
    ctx: PageContext,
    username: Option<String>,
}

impl HeaderBar {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            username: None,
        }
    }

    pub fn mount(&mut self) {
        self.username = self.ctx.session.session().map(|s| s.member.username);
    }

    pub fn is_authenticated(&self) -> bool {
        self.username.is_some()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Follow sign-in/sign-out happening in other views
    pub fn apply_event(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::SignedIn { username } => self.username = Some(username.clone()),
            SessionEvent::SignedOut | SessionEvent::Expired => self.username = None,
        }
    }

    pub fn logout(&mut self) {
        self.username = None;
        self.ctx.sign_out();
    }
}
