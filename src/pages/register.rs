//! Registration view

use std::sync::Arc;

use super::{CredentialsForm, FormKind, LifecycleHandle, Mount, PageContext, SubmitOutcome};
use crate::services::AuthApi;

pub struct RegisterPage {
    form: CredentialsForm,
}

impl RegisterPage {
    pub fn new(ctx: PageContext, auth: Arc<dyn AuthApi>) -> Self {
        Self {
            form: CredentialsForm::new(FormKind::Register, ctx, auth),
        }
    }

    pub fn mount(&mut self) -> Mount {
        self.form.mount()
    }

    pub fn unmount(&mut self) {
        self.form.unmount();
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.form.username = username.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.form.password = password.into();
    }

    pub fn error(&self) -> Option<&str> {
        self.form.error()
    }

    pub fn is_busy(&self) -> bool {
        self.form.is_busy()
    }

    pub fn lifecycle_handle(&self) -> LifecycleHandle {
        self.form.lifecycle().handle()
    }

    /// Validate, create the account, persist the session and go home
    pub async fn submit(&mut self) -> SubmitOutcome {
        self.form.submit().await
    }
}
