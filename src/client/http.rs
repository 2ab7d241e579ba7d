//! Shared REST Client
//!
//! One `reqwest::Client` for the whole process. Every call passes through
//! the auth interceptor on the way out and the 401 policy on the way back.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::sync::broadcast;

use super::error::{ApiError, ApiResult};
use super::interceptor::AuthInterceptor;
use super::SessionEvent;
use crate::config::ApiConfig;
use crate::session::SessionContext;

/// Capacity of the session event channel
const EVENT_CAPACITY: usize = 16;

/// Authenticated REST client
pub struct ApiClient {
    http: Client,
    base_url: String,
    auth: OnceLock<AuthInterceptor>,
    events: broadcast::Sender<SessionEvent>,
}

impl ApiClient {
    /// Create a client for the configured server
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth: OnceLock::new(),
            events,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Install the auth interceptor
    ///
    /// Only the first call has any effect; returns whether this call
    /// installed it.
    pub fn attach_auth_interceptor(&self, session: Arc<dyn SessionContext>) -> bool {
        let installed = self.auth.set(AuthInterceptor::new(session)).is_ok();
        if installed {
            tracing::debug!("Auth interceptor attached");
        } else {
            tracing::debug!("Auth interceptor already attached, ignoring");
        }
        installed
    }

    pub fn has_auth_interceptor(&self) -> bool {
        self.auth.get().is_some()
    }

    /// Subscribe to session lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Sender half of the event channel, for views that sign in or out
    pub fn event_sender(&self) -> broadcast::Sender<SessionEvent> {
        self.events.clone()
    }

    /// GET `path` and decode the JSON body
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send(self.http.get(self.url(path))).await
    }

    /// POST `body` as JSON to `path` and decode the JSON body
    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.http.post(self.url(path)).json(body)).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let mut request = builder.build()?;
        if let Some(auth) = self.auth.get() {
            auth.intercept(&mut request)?;
        }

        let method = request.method().clone();
        let path = request.url().path().to_string();

        let response = self
            .http
            .execute(request)
            .await
            .map_err(ApiError::from_transport)?;
        let status = response.status();

        tracing::debug!(%method, %path, status = status.as_u16(), "API call");

        if status == StatusCode::UNAUTHORIZED {
            self.expire_session();
            return Err(ApiError::Unauthorized);
        }

        let bytes = response.bytes().await.map_err(ApiError::from_transport)?;

        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
                body: serde_json::from_slice(&bytes).ok(),
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// 401 policy: drop the session and tell subscribers
    fn expire_session(&self) {
        if let Some(auth) = self.auth.get() {
            auth.session().clear();
        }
        tracing::info!("Server rejected the session token, session cleared");
        // No subscribers is fine.
        let _ = self.events.send(SessionEvent::Expired);
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("auth", &self.has_auth_interceptor())
            .finish()
    }
}
