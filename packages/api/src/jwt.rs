//! Reads the user snapshot out of an access token.
//!
//! The token is not verified here; the backend does that on every request.
//! Claims may use the short names (`email`, `name`, `role`) or the long-form
//! claim URIs the backend's identity framework emits.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use store::User;

use crate::error::ApiError;

/// Claim names per field, first match wins. Tokens may carry both forms.
const SUBJECT: &[&str] = &[
    "sub",
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier",
    "userId",
    "id",
];
const EMAIL: &[&str] = &[
    "email",
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/emailaddress",
];
const NAME: &[&str] = &[
    "name",
    "fullName",
    "unique_name",
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/name",
];
const ROLE: &[&str] = &[
    "role",
    "http://schemas.microsoft.com/ws/2008/06/identity/claims/role",
];

fn claim<T: DeserializeOwned>(claims: &Map<String, Value>, names: &[&str]) -> Option<T> {
    names
        .iter()
        .filter_map(|name| claims.get(*name))
        .find_map(|value| serde_json::from_value(value.clone()).ok())
}

/// A role claim is a single string or, for multi-role users, a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RoleClaim {
    One(String),
    Many(Vec<String>),
}

impl RoleClaim {
    fn primary(self) -> String {
        match self {
            RoleClaim::One(role) => role,
            RoleClaim::Many(roles) => roles.into_iter().next().unwrap_or_default(),
        }
    }
}

/// Decode the payload segment of `token` into a [`User`].
pub fn decode_user(token: &str) -> Result<User, ApiError> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| ApiError::Decode("access token is not a JWT".into()))?;
    // Some issuers pad the segment even though the format says not to.
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| ApiError::Decode(format!("access token payload: {e}")))?;
    let claims: Map<String, Value> = serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::Decode(format!("access token claims: {e}")))?;

    let id = claim::<String>(&claims, SUBJECT)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Decode("access token has no subject".into()))?;
    let created_at = claim::<String>(&claims, &["createdAt"])
        .as_deref()
        .and_then(store::models::datetime::parse_timestamp)
        .or_else(|| {
            claim::<i64>(&claims, &["iat"]).and_then(|s| Utc.timestamp_opt(s, 0).single())
        });

    Ok(User {
        id,
        email: claim(&claims, EMAIL).unwrap_or_default(),
        name: claim(&claims, NAME).unwrap_or_default(),
        role: claim::<RoleClaim>(&claims, ROLE)
            .map(RoleClaim::primary)
            .unwrap_or_default(),
        avatar: claim::<String>(&claims, &["avatar"]).filter(|a| !a.is_empty()),
        created_at,
        updated_at: None,
    })
}

#[cfg(test)]
pub(crate) fn encode_for_test(claims: serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}
