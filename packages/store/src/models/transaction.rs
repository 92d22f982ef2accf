//! Payment transactions from `/Payment/get-own-transaction`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::datetime::flexible;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(alias = "id")]
    pub transaction_id: String,
    #[serde(default)]
    pub ticket_id: Option<String>,
    #[serde(default)]
    pub conference_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Raw backend status, e.g. `Completed`, `Pending`, `Failed`, `Refunded`.
    #[serde(alias = "transactionStatus", default)]
    pub status: String,
    #[serde(alias = "createdAt", default, with = "flexible")]
    pub transaction_date: Option<DateTime<Utc>>,
}
