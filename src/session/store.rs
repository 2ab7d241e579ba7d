//! Session Store
//!
//! Persists the bearer token and cached member under two keys. Every storage
//! failure degrades to "no session"; nothing in here returns an error.

use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use super::backend::{FileStorage, MemoryStorage, StorageBackend, StorageOp};
use crate::models::{Member, Session};

/// Key holding the raw token string
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Key holding the JSON-serialized member
pub const AUTH_MEMBER_KEY: &str = "authMember";

/// Session access as seen by the views
///
/// Views depend on this trait rather than on a concrete store, so tests can
/// substitute an in-memory store.
pub trait SessionContext: Send + Sync {
    /// Stored token, absent when unset or empty
    fn token(&self) -> Option<String>;

    /// Stored member, absent when unset or malformed
    fn member(&self) -> Option<Member>;

    /// Persist token and member
    fn save(&self, session: &Session);

    /// Remove both entries. Idempotent.
    fn clear(&self);

    /// The complete session, if both halves are present
    ///
    /// A token without a member (or the reverse) is purged and reported as
    /// absent.
    fn session(&self) -> Option<Session> {
        match (self.token(), self.member()) {
            (Some(token), Some(member)) => Some(Session { token, member }),
            (None, None) => None,
            (token, member) => {
                tracing::debug!(
                    has_token = token.is_some(),
                    has_member = member.is_some(),
                    "Purging partial session"
                );
                self.clear();
                None
            }
        }
    }

    fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }
}

/// Session store over a [`StorageBackend`]
///
/// Without a backend every operation is a no-op that reads as absent.
#[derive(Clone)]
pub struct SessionStore {
    backend: Option<Arc<dyn StorageBackend>>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// Store without any persistence backend
    pub fn unavailable() -> Self {
        Self { backend: None }
    }

    /// Store kept in process memory
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// File-backed store; falls back to [`SessionStore::unavailable`] if the
    /// file cannot be opened
    pub fn open(path: &Path) -> Self {
        match FileStorage::open(path) {
            Ok(storage) => Self::new(Arc::new(storage)),
            Err(e) => {
                tracing::warn!(path = ?path, error = %e, "Session storage unavailable");
                Self::unavailable()
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    /// Persist a token with any serializable member
    ///
    /// The member is serialized first; if that fails the failure is logged
    /// and the token is still written.
    pub fn save_parts<M: Serialize + ?Sized>(&self, token: &str, member: &M) {
        let Some(backend) = &self.backend else {
            return;
        };

        // Both keys change in one batch; a half that cannot be written is
        // removed instead of left over from the previous session.
        let mut ops = Vec::with_capacity(2);
        if token.is_empty() {
            ops.push(StorageOp::remove(AUTH_TOKEN_KEY));
        } else {
            ops.push(StorageOp::set(AUTH_TOKEN_KEY, token));
        }

        match serde_json::to_string(member) {
            Ok(serialized) => ops.push(StorageOp::set(AUTH_MEMBER_KEY, serialized)),
            Err(e) => {
                tracing::warn!(error = %e, "Could not serialize member, storing token only");
                ops.push(StorageOp::remove(AUTH_MEMBER_KEY));
            }
        }

        if let Err(e) = backend.apply(&ops) {
            tracing::warn!(error = %e, "Failed to persist session");
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        let backend = self.backend.as_ref()?;
        match backend.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::debug!(key, error = %e, "Session storage read failed");
                None
            }
        }
    }
}

impl SessionContext for SessionStore {
    fn token(&self) -> Option<String> {
        self.read(AUTH_TOKEN_KEY)
    }

    fn member(&self) -> Option<Member> {
        let raw = self.read(AUTH_MEMBER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(member) => Some(member),
            Err(e) => {
                tracing::debug!(error = %e, "Stored member is malformed");
                None
            }
        }
    }

    fn save(&self, session: &Session) {
        self.save_parts(&session.token, &session.member);
        tracing::debug!(username = %session.member.username, "Session saved");
    }

    fn clear(&self) {
        let Some(backend) = &self.backend else {
            return;
        };

        let ops = [
            StorageOp::remove(AUTH_TOKEN_KEY),
            StorageOp::remove(AUTH_MEMBER_KEY),
        ];
        if let Err(e) = backend.apply(&ops) {
            tracing::warn!(error = %e, "Failed to clear session");
        }
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("available", &self.is_available())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use tempfile::tempdir;

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("cannot serialize"))
        }
    }

    fn memory_store() -> (SessionStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        (SessionStore::new(storage.clone()), storage)
    }

    #[test]
    fn test_save_then_read() {
        let (store, _) = memory_store();
        let session = Session::new("abc", Member::named("alice").id(7));

        store.save(&session);

        assert_eq!(store.token().as_deref(), Some("abc"));
        assert_eq!(store.member(), Some(session.member.clone()));
        assert_eq!(store.session(), Some(session));
    }

    #[test]
    fn test_unserializable_member_keeps_token() {
        let (store, storage) = memory_store();

        store.save_parts("abc", &Unserializable);

        assert_eq!(store.token().as_deref(), Some("abc"));
        assert!(store.member().is_none());
        assert!(!storage.entries().contains_key(AUTH_MEMBER_KEY));
    }

    #[test]
    fn test_unserializable_member_drops_previous_member() {
        let (store, storage) = memory_store();
        store.save(&Session::new("old", Member::named("alice")));

        store.save_parts("new", &Unserializable);

        assert_eq!(store.token().as_deref(), Some("new"));
        assert!(!storage.entries().contains_key(AUTH_MEMBER_KEY));
        assert!(store.session().is_none());
    }

    #[test]
    fn test_empty_token_drops_previous_token() {
        let (store, storage) = memory_store();
        store.save(&Session::new("old", Member::named("alice")));

        store.save(&Session::new("", Member::named("bob")));

        assert!(!storage.entries().contains_key(AUTH_TOKEN_KEY));
        assert!(store.session().is_none());
        assert!(storage.entries().is_empty());
    }

    #[test]
    fn test_corrupted_member_reads_absent() {
        let (store, storage) = memory_store();
        storage.set(AUTH_TOKEN_KEY, "abc").unwrap();
        storage.set(AUTH_MEMBER_KEY, "{not json").unwrap();

        assert!(store.member().is_none());
        assert_eq!(store.token().as_deref(), Some("abc"));
    }

    #[test]
    fn test_partial_session_is_purged() {
        let (store, storage) = memory_store();
        storage.set(AUTH_TOKEN_KEY, "abc").unwrap();

        assert!(store.session().is_none());
        assert!(!store.is_authenticated());
        assert!(storage.entries().is_empty());
    }

    #[test]
    fn test_empty_token_reads_absent() {
        let (store, storage) = memory_store();
        storage.set(AUTH_TOKEN_KEY, "").unwrap();

        assert!(store.token().is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (store, storage) = memory_store();
        store.clear();
        store.save(&Session::new("abc", Member::named("alice")));
        store.clear();
        store.clear();

        assert!(storage.entries().is_empty());
        assert!(store.session().is_none());
    }

    #[test]
    fn test_unavailable_store_is_noop() {
        let store = SessionStore::unavailable();
        store.save(&Session::new("abc", Member::named("alice")));
        store.clear();

        assert!(!store.is_available());
        assert!(store.token().is_none());
        assert!(store.member().is_none());
        assert!(store.session().is_none());
    }

    #[test]
    fn test_raw_keys_layout() {
        let (store, storage) = memory_store();
        store.save(&Session::new("abc", Member::named("alice")));

        let entries = storage.entries();
        assert_eq!(entries.get(AUTH_TOKEN_KEY).map(String::as_str), Some("abc"));
        assert_eq!(
            entries.get(AUTH_MEMBER_KEY).map(String::as_str),
            Some(r#"{"username":"alice"}"#)
        );
    }

    #[test]
    fn test_file_store_survives_restart() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        SessionStore::open(&path).save(&Session::new("abc", Member::named("alice")));

        let reopened = SessionStore::open(&path);
        assert_eq!(reopened.session().map(|s| s.token), Some("abc".to_string()));
    }
}
