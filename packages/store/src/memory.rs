use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::kv::{validate_key, KeyValueStore, StorageError};

/// In-memory KeyValueStore for testing and sessions that should not outlive the process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.lock().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        validate_key(key)?;
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value);
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        if let Ok(mut values) = self.values.lock() {
            values.remove(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::tokens::TokenStorage;

    fn user() -> User {
        User {
            id: "u-1".into(),
            email: "ada@example.com".into(),
            name: "Ada".into(),
            role: "Attendee".into(),
            avatar: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.get("accessToken").await.is_none());

        store.set("accessToken", "abc".into()).await.unwrap();
        assert_eq!(store.get("accessToken").await.as_deref(), Some("abc"));

        store.remove("accessToken").await.unwrap();
        assert!(store.get("accessToken").await.is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_bad_key() {
        let store = MemoryStore::new();
        assert!(store.set("a/b", "x".into()).await.is_err());
    }

    #[tokio::test]
    async fn test_token_storage_roundtrip() {
        let store = MemoryStore::new();
        let tokens = TokenStorage::new(store.clone());

        assert!(tokens.access_token().await.is_none());
        assert!(tokens.user().await.is_none());

        tokens.save_tokens("access", "refresh").await.unwrap();
        tokens.save_user(&user()).await.unwrap();

        assert_eq!(tokens.access_token().await.as_deref(), Some("access"));
        assert_eq!(tokens.refresh_token().await.as_deref(), Some("refresh"));
        assert_eq!(tokens.user().await, Some(user()));
        assert_eq!(store.len(), 3);

        tokens.clear().await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_user_reads_as_absent() {
        let store = MemoryStore::new();
        store.set("user", "{not json".into()).await.unwrap();
        let tokens = TokenStorage::new(store);
        assert!(tokens.user().await.is_none());
    }
}
