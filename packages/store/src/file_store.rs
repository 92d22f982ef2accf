//! # Filesystem-backed key/value store
//!
//! [`FileStore`] is a [`KeyValueStore`] implementation that persists each key as
//! a small file. It is used on desktop and mobile platforms so the session
//! survives app restarts.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! └── kv/
//!     ├── accessToken
//!     ├── refreshToken
//!     └── user               # serialized User JSON
//! ```
//!
//! ## Platform data directories
//!
//! [`crate::AppConfig`] resolves the base through [`dirs::data_dir()`]:
//!
//! | Platform | Path |
//! |----------|------|
//! | macOS / iOS | `~/Library/Application Support/confhub/` |
//! | Linux | `~/.local/share/confhub/` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\confhub\` |
//! | Android | App-internal storage (via `dirs`) |

use std::path::PathBuf;

use async_trait::async_trait;

use crate::kv::{validate_key, KeyValueStore, StorageError};

/// Filesystem-backed KeyValueStore for desktop and mobile persistence.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    fn kv_dir(&self) -> PathBuf {
        self.base.join("kv")
    }

    fn value_path(&self, key: &str) -> PathBuf {
        self.kv_dir().join(key)
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Option<String> {
        validate_key(key).ok()?;
        std::fs::read_to_string(self.value_path(key)).ok()
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        validate_key(key)?;
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };
        std::fs::create_dir_all(self.kv_dir()).map_err(io_err)?;
        std::fs::write(self.value_path(key), value).map_err(io_err)
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;
        match std::fs::remove_file(self.value_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::TokenStorage;

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let dir = std::env::temp_dir().join(format!("confhub_kv_test_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let tokens = TokenStorage::new(FileStore::new(dir.clone()));
        tokens.save_tokens("access-1", "refresh-1").await.unwrap();

        // Re-open from same directory
        let reopened = TokenStorage::new(FileStore::new(dir.clone()));
        assert_eq!(reopened.access_token().await.as_deref(), Some("access-1"));
        assert_eq!(reopened.refresh_token().await.as_deref(), Some("refresh-1"));

        reopened.clear().await;
        assert!(reopened.access_token().await.is_none());

        // Removing an absent key is not an error
        let store = FileStore::new(dir.clone());
        assert!(store.remove("accessToken").await.is_ok());

        // Cleanup
        let _ = std::fs::remove_dir_all(&dir);
    }
}
