//! Username/password form shared by the login and register views

use serde_json::Value;
use std::sync::Arc;

use super::{Lifecycle, Mount, PageContext, SubmitOutcome};
use crate::client::ApiError;
use crate::i18n::Text;
use crate::models::{Credentials, Session};
use crate::routes::Route;
use crate::services::AuthApi;

/// Which endpoint the form submits to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Login,
    Register,
}

impl FormKind {
    fn fallback_text(self) -> Text {
        match self {
            FormKind::Login => Text::LoginFailed,
            FormKind::Register => Text::RegisterFailed,
        }
    }
}

fn as_message(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.first().and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

/// Pick the message to show from a server validation payload
///
/// Priority: `detail` (string), `username` (string or first list item), then
/// for registration only `password` (first list item) and finally the first
/// key of the payload.
pub fn server_error_message(kind: FormKind, payload: &Value) -> Option<String> {
    let object = payload.as_object()?;

    if let Some(detail) = object.get("detail").and_then(Value::as_str) {
        return Some(detail.to_string());
    }
    if let Some(username) = object.get("username").and_then(as_message) {
        return Some(username);
    }
    if kind == FormKind::Login {
        return None;
    }
    if let Some(password) = object
        .get("password")
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .and_then(Value::as_str)
    {
        return Some(password.to_string());
    }

    object.values().next().and_then(as_message)
}

/// Form state and submission
pub struct CredentialsForm {
    kind: FormKind,
    ctx: PageContext,
    auth: Arc<dyn AuthApi>,
    lifecycle: Lifecycle,
    pub username: String,
    pub password: String,
    error: Option<String>,
    busy: bool,
}

impl CredentialsForm {
    pub fn new(kind: FormKind, ctx: PageContext, auth: Arc<dyn AuthApi>) -> Self {
        Self {
            kind,
            ctx,
            auth,
            lifecycle: Lifecycle::new(),
            username: String::new(),
            password: String::new(),
            error: None,
            busy: false,
        }
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// Signed-in visitors are sent home
    pub fn mount(&mut self) -> Mount {
        if self.ctx.session.is_authenticated() {
            self.ctx.navigator.navigate(Route::Home, true);
            return Mount::Redirected(Route::Home);
        }
        Mount::Ready
    }

    pub fn unmount(&mut self) {
        self.lifecycle.invalidate();
        self.busy = false;
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        if self.busy {
            return SubmitOutcome::Ignored;
        }
        self.error = None;

        if self.username.is_empty() || self.password.is_empty() {
            self.error = Some(self.ctx.text(Text::FillAllFields));
            return SubmitOutcome::Invalid;
        }

        let credentials = Credentials::new(self.username.clone(), self.password.clone());
        let ticket = self.lifecycle.begin();
        self.busy = true;

        let result = match self.kind {
            FormKind::Login => self.auth.login(&credentials).await,
            FormKind::Register => self.auth.register(&credentials).await,
        };

        self.busy = false;
        if !self.lifecycle.is_current(ticket) {
            tracing::debug!(kind = ?self.kind, "Dropping response for retired form");
            return SubmitOutcome::Discarded;
        }

        match result {
            Ok(response) => {
                let session = Session::from(response);
                self.ctx.sign_in(&session);
                SubmitOutcome::Completed
            }
            Err(err) => {
                tracing::debug!(kind = ?self.kind, error = %err, "Form submission failed");
                self.error = Some(self.failure_message(&err));
                SubmitOutcome::Failed
            }
        }
    }

    fn failure_message(&self, err: &ApiError) -> String {
        err.payload()
            .and_then(|payload| server_error_message(self.kind, payload))
            .unwrap_or_else(|| self.ctx.text(self.kind.fallback_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detail_wins() {
        let payload = json!({"username": ["taken"], "detail": "Invalid credentials"});
        assert_eq!(
            server_error_message(FormKind::Login, &payload).as_deref(),
            Some("Invalid credentials")
        );
    }

    #[test]
    fn test_username_string_or_list() {
        assert_eq!(
            server_error_message(FormKind::Login, &json!({"username": "bad name"})).as_deref(),
            Some("bad name")
        );
        assert_eq!(
            server_error_message(FormKind::Register, &json!({"username": ["taken", "x"]}))
                .as_deref(),
            Some("taken")
        );
    }

    #[test]
    fn test_password_only_for_register() {
        let payload = json!({"password": ["too short"]});
        assert_eq!(server_error_message(FormKind::Login, &payload), None);
        assert_eq!(
            server_error_message(FormKind::Register, &payload).as_deref(),
            Some("too short")
        );
    }

    #[test]
    fn test_first_key_fallback_for_register() {
        let payload = json!({"non_field_errors": ["nope"], "zzz": "later"});
        assert_eq!(
            server_error_message(FormKind::Register, &payload).as_deref(),
            Some("nope")
        );
        assert_eq!(server_error_message(FormKind::Login, &payload), None);
    }

    #[test]
    fn test_non_object_payload() {
        assert_eq!(server_error_message(FormKind::Register, &json!(["x"])), None);
        assert_eq!(server_error_message(FormKind::Register, &json!({})), None);
    }
}
