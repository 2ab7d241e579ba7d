//! Registration, login and current-member lookup

use async_trait::async_trait;
use std::sync::Arc;

use crate::client::{ApiClient, ApiResult};
use crate::models::{AuthResponse, Credentials, Member};

pub const REGISTER_PATH: &str = "/api/auth/register/";
pub const LOGIN_PATH: &str = "/api/auth/login/";
pub const ME_PATH: &str = "/api/auth/me/";

/// Account operations
///
/// No validation happens here: uniqueness and password rules are enforced by
/// the server and come back as error payloads.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn register(&self, credentials: &Credentials) -> ApiResult<AuthResponse>;

    async fn login(&self, credentials: &Credentials) -> ApiResult<AuthResponse>;

    /// Profile of the member the current token belongs to
    async fn current_member(&self) -> ApiResult<Member>;
}

/// [`AuthApi`] over the REST client
#[derive(Debug, Clone)]
pub struct AuthService {
    client: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthApi for AuthService {
    async fn register(&self, credentials: &Credentials) -> ApiResult<AuthResponse> {
        tracing::debug!(username = %credentials.username, "Registering");
        self.client.post(REGISTER_PATH, credentials).await
    }

    async fn login(&self, credentials: &Credentials) -> ApiResult<AuthResponse> {
        tracing::debug!(username = %credentials.username, "Logging in");
        self.client.post(LOGIN_PATH, credentials).await
    }

    async fn current_member(&self) -> ApiResult<Member> {
        self.client.get(ME_PATH).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::test_support::FakeServer;
    use serde_json::json;

    async fn service(server: &FakeServer) -> AuthService {
        let base_url = server.start().await;
        let client = ApiClient::new(&ApiConfig {
            base_url,
            request_timeout_secs: 5,
        })
        .unwrap();
        AuthService::new(Arc::new(client))
    }

    #[tokio::test]
    async fn test_login_posts_credentials() {
        let server = FakeServer::new();
        server.respond(
            "POST",
            LOGIN_PATH,
            200,
            json!({"token": "abc", "member": {"id": 1, "username": "alice"}}),
        );
        let auth = service(&server).await;

        let response = auth.login(&Credentials::new("alice", "pw")).await.unwrap();

        assert_eq!(response.token, "abc");
        assert_eq!(response.member.username, "alice");
        let request = &server.requests()[0];
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, LOGIN_PATH);
        assert_eq!(
            request.body,
            Some(json!({"username": "alice", "password": "pw"}))
        );
    }

    #[tokio::test]
    async fn test_register_returns_session_payload() {
        let server = FakeServer::new();
        server.respond(
            "POST",
            REGISTER_PATH,
            201,
            json!({"token": "t1", "member": {"id": 2, "username": "bob", "created_at": "2024-01-01T00:00:00Z"}}),
        );
        let auth = service(&server).await;

        let response = auth.register(&Credentials::new("bob", "pw")).await.unwrap();

        assert_eq!(response.token, "t1");
        assert!(response.member.created_at.is_some());
    }

    #[tokio::test]
    async fn test_current_member() {
        let server = FakeServer::new();
        server.respond("GET", ME_PATH, 200, json!({"id": 1, "username": "alice"}));
        let auth = service(&server).await;

        let member = auth.current_member().await.unwrap();

        assert_eq!(member.id, Some(1));
        assert_eq!(server.requests()[0].method, "GET");
    }
}
