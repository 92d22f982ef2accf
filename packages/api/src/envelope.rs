//! # Response envelope
//!
//! Every endpoint answers with
//! `{ "success": bool, "message": string, "data": T | null, "errors": { field: [msg] } }`.
//! [`Envelope::normalize`] enforces that `data` is present exactly when
//! `success` is true, so code past the client never sees a failed envelope
//! carrying data or a successful one without it (a `null` payload becomes
//! `Some(Value::Null)`).
//!
//! Paginated endpoints nest a [`Paginated`] page under `data`.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default, deserialize_with = "lenient_errors")]
    pub errors: BTreeMap<String, Vec<String>>,
}

/// Accept `errors` as a map of lists, a map of strings, or `null`.
fn lenient_errors<'de, D>(deserializer: D) -> Result<BTreeMap<String, Vec<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .map(|(field, value)| {
            let messages = match value {
                Value::Array(items) => items
                    .into_iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect(),
                Value::String(s) => vec![s],
                _ => Vec::new(),
            };
            (field, messages)
        })
        .collect())
}

impl Envelope<Value> {
    /// Enforce "`data` present iff `success`".
    pub fn normalize(mut self) -> Self {
        if self.success {
            self.data.get_or_insert(Value::Null);
        } else {
            self.data = None;
        }
        self
    }

    /// A failed envelope becomes [`ApiError::Application`].
    pub fn into_result(self) -> Result<Self, ApiError> {
        let envelope = self.normalize();
        if envelope.success {
            Ok(envelope)
        } else {
            Err(ApiError::Application {
                message: envelope.message,
                errors: envelope.errors,
            })
        }
    }

    /// Decode the payload into a concrete type.
    pub fn decode<T: DeserializeOwned>(self) -> Result<Envelope<T>, ApiError> {
        let data = match self.data {
            Some(value) => Some(
                serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))?,
            ),
            None => None,
        };
        Ok(Envelope {
            success: self.success,
            message: self.message,
            data,
            errors: self.errors,
        })
    }
}

impl<T> Envelope<T> {
    /// The payload of a successful envelope.
    pub fn into_data(self) -> Result<T, ApiError> {
        self.data
            .ok_or_else(|| ApiError::Decode("envelope has no data".to_string()))
    }
}

/// One page of a paginated collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub page_number: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl<T> Paginated<T> {
    pub fn has_more(&self) -> bool {
        self.page_number
            .map(|page| page < self.total_pages)
            .unwrap_or(false)
    }
}
