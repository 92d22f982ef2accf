//! # Signed-in user
//!
//! [`User`] is never fetched on its own: the auth flow builds it from the access
//! token's claims at login and persists it next to the tokens. Its `id` is always
//! the token's `sub` claim.
//!
//! The serialized form (camelCase JSON) is what gets written under the `user`
//! key of persisted storage, so it must stay readable across app versions:
//! every field except `id` and `email` is optional or defaulted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::datetime::flexible;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, with = "flexible")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "flexible")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Name to show in headers, falling back to the email address.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}
