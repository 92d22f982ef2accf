//! # Conferences, ticket tiers and sessions
//!
//! Snapshots of the conference payloads returned by the `/Conference/*`
//! endpoints. Prices and sessions are embedded arrays; nothing is normalized
//! client-side.
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`Conference`] | A conference listing or detail. Technical and research detail endpoints return the same shape with more fields populated. |
//! | [`ConferencePrice`] | One ticket tier. A missing `ticket_price` means the tier is free. |
//! | [`ConferenceSession`] | A scheduled talk or track inside the conference. |
//! | [`ConferenceCategory`] | An entry of `/ConferenceCategory`, used for the dynamic category filter. |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::datetime::flexible;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conference {
    #[serde(alias = "id")]
    pub conference_id: String,
    #[serde(alias = "name", default)]
    pub conference_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, with = "flexible")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, with = "flexible")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub banner_image_url: Option<String>,
    #[serde(alias = "conferenceCategoryId", default)]
    pub category_id: Option<String>,
    #[serde(alias = "conferenceCategoryName", default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub total_attendees: Option<u64>,
    #[serde(default)]
    pub is_research_conference: bool,
    #[serde(default)]
    pub conference_prices: Vec<ConferencePrice>,
    #[serde(default)]
    pub sessions: Vec<ConferenceSession>,
}

impl Conference {
    /// Cheapest tier price; a conference without tiers counts as free.
    pub fn lowest_price(&self) -> f64 {
        self.conference_prices
            .iter()
            .map(ConferencePrice::price)
            .fold(None, |acc: Option<f64>, p| Some(acc.map_or(p, |a| a.min(p))))
            .unwrap_or(0.0)
    }

    pub fn is_free(&self) -> bool {
        self.lowest_price() <= 0.0
    }

    pub fn price(&self, price_id: &str) -> Option<&ConferencePrice> {
        self.conference_prices
            .iter()
            .find(|p| p.conference_price_id == price_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferencePrice {
    #[serde(alias = "priceId", alias = "id")]
    pub conference_price_id: String,
    #[serde(default)]
    pub ticket_name: Option<String>,
    #[serde(default)]
    pub ticket_description: Option<String>,
    #[serde(default)]
    pub ticket_price: Option<f64>,
    #[serde(default)]
    pub total_slot: Option<u32>,
    #[serde(default)]
    pub available_slot: Option<u32>,
    #[serde(default)]
    pub is_author_price: bool,
}

impl ConferencePrice {
    pub fn price(&self) -> f64 {
        self.ticket_price.unwrap_or(0.0).max(0.0)
    }

    pub fn is_sold_out(&self) -> bool {
        self.available_slot == Some(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceSession {
    #[serde(alias = "id")]
    pub session_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default, with = "flexible")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, with = "flexible")]
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceCategory {
    #[serde(alias = "id", alias = "categoryId")]
    pub conference_category_id: String,
    #[serde(alias = "name", alias = "categoryName", default)]
    pub conference_category_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conference_tolerates_sparse_payload() {
        let conf: Conference = serde_json::from_str(
            r#"{"conferenceId":"c1","conferenceName":"RustConf","startDate":null}"#,
        )
        .unwrap();
        assert_eq!(conf.conference_name, "RustConf");
        assert!(conf.start_date.is_none());
        assert!(conf.conference_prices.is_empty());
        assert!(conf.is_free());
    }

    #[test]
    fn test_lowest_price_treats_missing_as_free() {
        let conf: Conference = serde_json::from_str(
            r#"{
                "conferenceId": "c1",
                "conferencePrices": [
                    {"conferencePriceId": "p1", "ticketPrice": 120.0},
                    {"conferencePriceId": "p2", "ticketPrice": 80.5}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(conf.lowest_price(), 80.5);
        assert!(!conf.is_free());
        assert_eq!(conf.price("p1").unwrap().price(), 120.0);

        let mut with_free = conf.clone();
        with_free.conference_prices[1].ticket_price = None;
        assert!(with_free.is_free());
    }

    #[test]
    fn test_category_aliases() {
        let cat: ConferenceCategory =
            serde_json::from_str(r#"{"categoryId":"k","categoryName":"AI"}"#).unwrap();
        assert_eq!(cat.conference_category_id, "k");
        assert_eq!(cat.conference_category_name, "AI");
    }
}
