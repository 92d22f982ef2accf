//! # On-device key/value persistence
//!
//! [`KeyValueStore`] is the seam between the session layer and whatever the
//! platform offers for small persistent values. Implementations live in sibling
//! modules: [`crate::MemoryStore`] (tests, ephemeral sessions) and
//! [`crate::FileStore`] (desktop and mobile, one file per key).
//!
//! Reads are infallible from the caller's point of view: a value that cannot
//! be read is treated as absent. Writes report failures so the auth flow can
//! log them, but a failed write never aborts a login.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed for key `{key}`: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid storage key `{0}`")]
    InvalidKey(String),
}

/// Async string key/value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Keys are used as file names by [`crate::FileStore`], so keep them to a
/// conservative character set.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let ok = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        && !key.starts_with('.');
    if ok {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
