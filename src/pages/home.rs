//! Message feed and composer

use std::collections::HashSet;
use std::sync::Arc;

use super::{Lifecycle, LifecycleHandle, LoadOutcome, Mount, PageContext, SubmitOutcome};
use crate::client::ApiError;
use crate::i18n::Text;
use crate::models::{Message, NewMessage};
use crate::services::ChatApi;

/// A message ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub author: String,
    pub time: String,
    pub content: String,
}

pub struct HomePage {
    ctx: PageContext,
    chat: Arc<dyn ChatApi>,
    lifecycle: Lifecycle,
    authenticated: bool,
    messages: Vec<Message>,
    draft: String,
    loading: bool,
    sending: bool,
    load_error: Option<String>,
    send_error: Option<String>,
}

impl HomePage {
    pub fn new(ctx: PageContext, chat: Arc<dyn ChatApi>) -> Self {
        Self {
            ctx,
            chat,
            lifecycle: Lifecycle::new(),
            authenticated: false,
            messages: Vec::new(),
            draft: String::new(),
            loading: false,
            sending: false,
            load_error: None,
            send_error: None,
        }
    }

    /// Home never redirects; without a session it only shows a placeholder
    pub fn mount(&mut self) -> Mount {
        self.authenticated = self.ctx.session.is_authenticated();
        self.loading = self.authenticated;
        Mount::Ready
    }

    pub fn unmount(&mut self) {
        self.lifecycle.invalidate();
        self.loading = false;
        self.sending = false;
    }

    pub fn lifecycle_handle(&self) -> LifecycleHandle {
        self.lifecycle.handle()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn send_error(&self) -> Option<&str> {
        self.send_error.as_deref()
    }

    /// Status line to show instead of the feed, if any
    pub fn placeholder(&self) -> Option<String> {
        if !self.authenticated {
            return Some(self.ctx.text(Text::LoginToRead));
        }
        if self.loading {
            return Some(self.ctx.text(Text::LoadingMessages));
        }
        if let Some(error) = &self.load_error {
            return Some(error.clone());
        }
        if self.messages.is_empty() {
            return Some(self.ctx.text(Text::NoMessagesYet));
        }
        None
    }

    pub fn views(&self) -> Vec<MessageView> {
        self.messages.iter().map(|m| self.view(m)).collect()
    }

    pub fn view(&self, message: &Message) -> MessageView {
        let author = message
            .member
            .as_ref()
            .map(|m| m.username.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.ctx.text(Text::UnknownUser));
        MessageView {
            author,
            time: self.ctx.locale.format_timestamp(message.created_at),
            content: message.content.clone(),
        }
    }

    /// Replace the feed with the server snapshot
    pub async fn load_messages(&mut self) -> LoadOutcome {
        if !self.authenticated {
            return LoadOutcome::Skipped;
        }

        let ticket = self.lifecycle.begin();
        self.loading = true;
        let result = self.chat.messages().await;
        if !self.lifecycle.is_current(ticket) {
            tracing::debug!("Dropping message snapshot for retired view");
            return LoadOutcome::Discarded;
        }
        self.loading = false;

        match result {
            Ok(messages) => {
                tracing::debug!(count = messages.len(), "Loaded messages");
                self.messages = messages;
                self.load_error = None;
                LoadOutcome::Loaded
            }
            Err(err) if err.is_unauthorized() => {
                self.expire();
                LoadOutcome::Expired
            }
            Err(err) => {
                tracing::warn!(error = %err, "Loading messages failed");
                self.load_error = Some(self.ctx.text(Text::MessagesLoadFailed));
                LoadOutcome::Failed
            }
        }
    }

    /// Re-fetch the snapshot and return the messages not seen before
    pub async fn refresh(&mut self) -> (LoadOutcome, Vec<Message>) {
        let seen: HashSet<i64> = self.messages.iter().map(|m| m.id).collect();
        let outcome = self.load_messages().await;
        let fresh = match outcome {
            LoadOutcome::Loaded => self
                .messages
                .iter()
                .filter(|m| !seen.contains(&m.id))
                .cloned()
                .collect(),
            _ => Vec::new(),
        };
        (outcome, fresh)
    }

    /// Post the trimmed draft and append the created message
    pub async fn submit(&mut self) -> SubmitOutcome {
        if !self.authenticated {
            self.send_error = Some(self.ctx.text(Text::LoginToSend));
            return SubmitOutcome::Invalid;
        }
        let content = self.draft.trim().to_string();
        if content.is_empty() || self.sending {
            return SubmitOutcome::Ignored;
        }

        self.send_error = None;
        let ticket = self.lifecycle.begin();
        self.sending = true;
        let result = self.chat.send_message(&NewMessage { content }).await;
        if !self.lifecycle.is_current(ticket) {
            tracing::debug!("Dropping send result for retired view");
            return SubmitOutcome::Discarded;
        }
        self.sending = false;

        match result {
            Ok(created) => {
                tracing::debug!(id = created.id, "Message sent");
                self.messages.push(created);
                self.draft.clear();
                SubmitOutcome::Completed
            }
            Err(err) if err.is_unauthorized() => {
                self.expire();
                SubmitOutcome::Expired
            }
            Err(err) => {
                self.report_send_failure(&err);
                SubmitOutcome::Failed
            }
        }
    }

    fn report_send_failure(&mut self, err: &ApiError) {
        tracing::warn!(error = %err, "Sending message failed");
        self.send_error = Some(self.ctx.text(Text::MessageSendFailed));
    }

    fn expire(&mut self) {
        self.authenticated = false;
        self.messages.clear();
        self.loading = false;
        self.load_error = Some(self.ctx.text(Text::SessionExpired));
        self.ctx.expire_session();
    }
}
