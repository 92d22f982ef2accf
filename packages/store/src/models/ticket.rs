//! Purchased tickets with their payment history and check-ins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::datetime::flexible;
use super::transaction::Transaction;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    #[serde(alias = "id")]
    pub ticket_id: String,
    #[serde(default)]
    pub conference_id: Option<String>,
    #[serde(default)]
    pub conference_name: String,
    #[serde(default)]
    pub conference_address: Option<String>,
    #[serde(default)]
    pub ticket_name: Option<String>,
    #[serde(default, with = "flexible")]
    pub conference_start_date: Option<DateTime<Utc>>,
    #[serde(default, with = "flexible")]
    pub conference_end_date: Option<DateTime<Utc>>,
    /// When the ticket was bought; the "Recent" ordering keys on this.
    #[serde(alias = "purchaseDate", default, with = "flexible")]
    pub registration_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_price: Option<f64>,
    #[serde(default)]
    pub is_refunded: bool,
    #[serde(default)]
    pub qr_code_url: Option<String>,
    #[serde(default)]
    pub check_ins: Vec<CheckIn>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Ticket {
    pub fn is_checked_in(&self) -> bool {
        !self.check_ins.is_empty()
    }

    /// Status key used by the ticket filter: `refunded`, `checked-in` or `active`.
    pub fn status_key(&self) -> &'static str {
        if self.is_refunded {
            "refunded"
        } else if self.is_checked_in() {
            "checked-in"
        } else {
            "active"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub session_title: Option<String>,
    #[serde(default, with = "flexible")]
    pub checked_in_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_key() {
        let mut ticket: Ticket =
            serde_json::from_str(r#"{"ticketId":"t1","purchaseDate":"2024-01-01"}"#).unwrap();
        assert!(ticket.registration_date.is_some());
        assert_eq!(ticket.status_key(), "active");

        ticket.check_ins.push(CheckIn {
            session_id: None,
            session_title: None,
            checked_in_at: None,
        });
        assert_eq!(ticket.status_key(), "checked-in");

        ticket.is_refunded = true;
        assert_eq!(ticket.status_key(), "refunded");
    }
}
