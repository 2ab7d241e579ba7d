//! Wire and Domain Types
//!
//! Records exchanged with the chat REST API and the session kept on disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A registered chat member as returned by the server
///
/// Only `username` and `created_at` are used by the views; every other field
/// the server sends is preserved in `extra` so a stored member round-trips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Member {
    /// Create a member with only a username
    pub fn named(username: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            created_at: None,
            extra: Map::new(),
        }
    }

    /// Builder: set the server id
    pub fn id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Builder: set the registration time
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }
}

/// A chat message. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub member: Option<Member>,
}

/// Authenticated identity: bearer token plus cached profile
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub member: Member,
}

impl Session {
    pub fn new(token: impl Into<String>, member: Member) -> Self {
        Self {
            token: token.into(),
            member,
        }
    }
}

/// Username/password pair submitted by the login and register forms
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of a successful login or register call
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub member: Member,
}

impl From<AuthResponse> for Session {
    fn from(response: AuthResponse) -> Self {
        Session::new(response.token, response.member)
    }
}

/// Body of a send-message call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMessage {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_member_minimal_payload() {
        let member: Member = serde_json::from_str(r#"{"username":"alice"}"#).unwrap();
        assert_eq!(member, Member::named("alice"));
        assert_eq!(serde_json::to_string(&member).unwrap(), r#"{"username":"alice"}"#);
    }

    #[test]
    fn test_member_keeps_unknown_fields() {
        let raw = r#"{"id":3,"username":"bob","created_at":"2024-01-01T00:00:00Z","avatar":"x.png"}"#;
        let member: Member = serde_json::from_str(raw).unwrap();

        assert_eq!(member.id, Some(3));
        assert_eq!(
            member.created_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(member.extra.get("avatar"), Some(&Value::from("x.png")));

        let back: Value = serde_json::to_value(&member).unwrap();
        assert_eq!(back["avatar"], "x.png");
    }

    #[test]
    fn test_message_without_member() {
        let message: Message = serde_json::from_str(r#"{"id":1,"content":"hi"}"#).unwrap();
        assert!(message.member.is_none());
        assert!(message.created_at.is_none());
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::new("alice", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_auth_response_into_session() {
        let response: AuthResponse =
            serde_json::from_str(r#"{"token":"abc","member":{"username":"alice"}}"#).unwrap();
        let session: Session = response.into();
        assert_eq!(session.token, "abc");
        assert_eq!(session.member.username, "alice");
    }
}
