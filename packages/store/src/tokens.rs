//! Persisted auth state: access token, refresh token and the serialized user,
//! each under a fixed key of a [`KeyValueStore`].

use std::sync::Arc;

use crate::kv::{KeyValueStore, StorageError};
use crate::models::User;

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_KEY: &str = "user";

/// Typed view over the three persisted auth keys.
#[derive(Clone)]
pub struct TokenStorage {
    store: Arc<dyn KeyValueStore>,
}

impl TokenStorage {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn from_shared(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn access_token(&self) -> Option<String> {
        self.store
            .get(ACCESS_TOKEN_KEY)
            .await
            .filter(|t| !t.is_empty())
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.store
            .get(REFRESH_TOKEN_KEY)
            .await
            .filter(|t| !t.is_empty())
    }

    pub async fn user(&self) -> Option<User> {
        let raw = self.store.get(USER_KEY).await?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Ignoring unreadable persisted user: {}", e);
                None
            }
        }
    }

    pub async fn save_tokens(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<(), StorageError> {
        self.store
            .set(ACCESS_TOKEN_KEY, access_token.to_string())
            .await?;
        self.store
            .set(REFRESH_TOKEN_KEY, refresh_token.to_string())
            .await
    }

    pub async fn save_user(&self, user: &User) -> Result<(), StorageError> {
        // Serializing a User cannot fail: every field is a plain string or date.
        let raw = serde_json::to_string(user).unwrap_or_default();
        self.store.set(USER_KEY, raw).await
    }

    /// Remove all three keys. Failures are logged and otherwise ignored so a
    /// logout always completes.
    pub async fn clear(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.store.remove(key).await {
                tracing::warn!("Failed to clear {}: {}", key, e);
            }
        }
    }
}

impl std::fmt::Debug for TokenStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStorage").finish_non_exhaustive()
    }
}
