//! Shared test fixtures: an in-process fake chat server and scripted
//! service fakes.

use async_trait::async_trait;
use axum::body::to_bytes;
use axum::extract::Request;
use axum::http::{header::AUTHORIZATION, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::client::{ApiError, ApiResult};
use crate::models::{AuthResponse, Credentials, Member, Message, NewMessage};
use crate::services::{AuthApi, ChatApi};

/// A request as seen by [`FakeServer`]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// Every `Authorization` header value, in order
    pub authorization: Vec<String>,
    pub body: Option<Value>,
}

/// Canned-response HTTP server bound to an ephemeral local port
#[derive(Clone, Default)]
pub struct FakeServer {
    routes: Arc<Mutex<HashMap<(String, String), (u16, Value)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) {
        self.routes
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Start serving; returns the base URL
    pub async fn start(&self) -> String {
        let server = self.clone();
        let app = Router::new().fallback(move |request: Request| {
            let server = server.clone();
            async move { server.handle(request).await }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    async fn handle(&self, request: Request) -> Response {
        let method = request.method().to_string();
        let path = request.uri().path().to_string();
        let authorization = request
            .headers()
            .get_all(AUTHORIZATION)
            .iter()
            .map(|v| v.to_str().unwrap_or_default().to_string())
            .collect();

        let bytes = to_bytes(request.into_body(), usize::MAX)
            .await
            .unwrap_or_default();
        let body = serde_json::from_slice(&bytes).ok();

        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.clone(),
            path: path.clone(),
            authorization,
            body,
        });

        let canned = self.routes.lock().unwrap().get(&(method, path)).cloned();
        match canned {
            Some((status, body)) => {
                let status = StatusCode::from_u16(status).unwrap();
                (status, Json(body)).into_response()
            }
            None => (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response(),
        }
    }
}

/// Outcome a fake service returns
#[derive(Debug, Clone)]
pub enum Scripted<T> {
    Ok(T),
    Unauthorized,
    Http(u16, Value),
    Unavailable,
}

impl<T: Clone> Scripted<T> {
    fn result(&self) -> ApiResult<T> {
        match self {
            Scripted::Ok(value) => Ok(value.clone()),
            Scripted::Unauthorized => Err(ApiError::Unauthorized),
            Scripted::Http(status, body) => Err(ApiError::Http {
                status: *status,
                body: Some(body.clone()),
            }),
            Scripted::Unavailable => Err(ApiError::Unavailable),
        }
    }
}

/// Scripted [`AuthApi`] that records every call
pub struct FakeAuth {
    pub auth: Mutex<Scripted<AuthResponse>>,
    pub member: Mutex<Scripted<Member>>,
    delay: Mutex<Option<Duration>>,
    calls: Mutex<Vec<String>>,
    credentials: Mutex<Vec<Credentials>>,
}

impl FakeAuth {
    pub fn new() -> Self {
        Self {
            auth: Mutex::new(Scripted::Unavailable),
            member: Mutex::new(Scripted::Unavailable),
            delay: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            credentials: Mutex::new(Vec::new()),
        }
    }

    pub fn with_auth(self, outcome: Scripted<AuthResponse>) -> Self {
        *self.auth.lock().unwrap() = outcome;
        self
    }

    pub fn with_member(self, outcome: Scripted<Member>) -> Self {
        *self.member.lock().unwrap() = outcome;
        self
    }

    /// Delay every response, to leave room for the caller to go away
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn credentials(&self) -> Vec<Credentials> {
        self.credentials.lock().unwrap().clone()
    }

    fn record(&self, call: &str, credentials: Option<&Credentials>) {
        self.calls.lock().unwrap().push(call.to_string());
        if let Some(credentials) = credentials {
            self.credentials.lock().unwrap().push(credentials.clone());
        }
    }
}

#[async_trait]
impl AuthApi for FakeAuth {
    async fn register(&self, credentials: &Credentials) -> ApiResult<AuthResponse> {
        self.record("register", Some(credentials));
        let outcome = self.auth.lock().unwrap().clone();
        outcome.result()
    }

    async fn login(&self, credentials: &Credentials) -> ApiResult<AuthResponse> {
        self.record("login", Some(credentials));
        let outcome = self.auth.lock().unwrap().clone();
        outcome.result()
    }

    async fn current_member(&self) -> ApiResult<Member> {
        self.record("current_member", None);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let outcome = self.member.lock().unwrap().clone();
        outcome.result()
    }
}

/// Scripted [`ChatApi`] that records every call
pub struct FakeChat {
    pub messages: Mutex<Scripted<Vec<Message>>>,
    pub created: Mutex<Scripted<Message>>,
    delay: Mutex<Option<Duration>>,
    calls: Mutex<Vec<String>>,
    sent: Mutex<Vec<String>>,
}

impl FakeChat {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Scripted::Ok(Vec::new())),
            created: Mutex::new(Scripted::Unavailable),
            delay: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn with_messages(self, outcome: Scripted<Vec<Message>>) -> Self {
        *self.messages.lock().unwrap() = outcome;
        self
    }

    pub fn with_created(self, outcome: Scripted<Message>) -> Self {
        *self.created.lock().unwrap() = outcome;
        self
    }

    /// Delay every response, to leave room for the caller to go away
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    async fn pause(&self) {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ChatApi for FakeChat {
    async fn messages(&self) -> ApiResult<Vec<Message>> {
        self.calls.lock().unwrap().push("messages".to_string());
        self.pause().await;
        let outcome = self.messages.lock().unwrap().clone();
        outcome.result()
    }

    async fn send_message(&self, message: &NewMessage) -> ApiResult<Message> {
        self.calls.lock().unwrap().push("send_message".to_string());
        self.sent.lock().unwrap().push(message.content.clone());
        self.pause().await;
        let outcome = self.created.lock().unwrap().clone();
        outcome.result()
    }
}

/// A message as the server would return it
pub fn message(id: i64, content: &str, username: &str) -> Message {
    serde_json::from_value(json!({
        "id": id,
        "content": content,
        "created_at": "2024-01-01T00:00:00Z",
        "member": {"username": username},
    }))
    .unwrap()
}
