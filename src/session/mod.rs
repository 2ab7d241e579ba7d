//! Session Persistence
//!
//! The authenticated identity (token + member) kept in a client-local
//! key-value store.
//!
//! - [`SessionContext`]: the get/save/clear contract views depend on
//! - [`SessionStore`]: the implementation over a [`StorageBackend`]
//! - [`FileStorage`] / [`MemoryStorage`]: persistent and in-process backends

mod backend;
mod store;

pub use backend::{
    FileStorage, MemoryStorage, StorageBackend, StorageError, StorageOp, StorageResult,
};
pub use store::{SessionContext, SessionStore, AUTH_MEMBER_KEY, AUTH_TOKEN_KEY};
