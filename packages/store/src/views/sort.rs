//! Sort orders offered by the list screens.
//!
//! Sorting is always stable: items that compare equal keep the order they
//! arrived in. Items without a date sort after every dated item in both date
//! orders. A sort key the screen does not recognize is a no-op, never a guess.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::models::{Conference, Paper, Ticket, Transaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Date ascending (soonest first).
    Date,
    /// Date descending (most recent first).
    Recent,
    /// Price ascending, missing prices count as free.
    Price,
    /// Name, case-insensitive lexicographic.
    Name,
    /// Popularity descending.
    Popularity,
}

impl SortKey {
    /// Parse a sort chip key; `None` for anything unrecognized.
    pub fn parse(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "date" | "soonest" => Some(SortKey::Date),
            "recent" | "newest" => Some(SortKey::Recent),
            "price" => Some(SortKey::Price),
            "name" | "title" => Some(SortKey::Name),
            "popularity" | "popular" | "attendees" => Some(SortKey::Popularity),
            _ => None,
        }
    }
}

/// Fields the comparators key on.
pub trait Sortable {
    fn sort_date(&self) -> Option<DateTime<Utc>>;

    fn sort_name(&self) -> &str;

    fn sort_price(&self) -> f64 {
        0.0
    }

    fn popularity(&self) -> u64 {
        0
    }
}

fn dated_first(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Order two items by `key`.
pub fn compare<T: Sortable + ?Sized>(a: &T, b: &T, key: SortKey) -> Ordering {
    match key {
        SortKey::Date => dated_first(a.sort_date(), b.sort_date(), false),
        SortKey::Recent => dated_first(a.sort_date(), b.sort_date(), true),
        SortKey::Price => a.sort_price().total_cmp(&b.sort_price()),
        SortKey::Name => a
            .sort_name()
            .to_lowercase()
            .cmp(&b.sort_name().to_lowercase()),
        SortKey::Popularity => b.popularity().cmp(&a.popularity()),
    }
}

/// Stable in-place sort; `None` leaves the order untouched.
pub fn sort_items<T: Sortable>(items: &mut [T], key: Option<SortKey>) {
    if let Some(key) = key {
        items.sort_by(|a, b| compare(a, b, key));
    }
}

impl Sortable for Conference {
    fn sort_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }

    fn sort_name(&self) -> &str {
        &self.conference_name
    }

    fn sort_price(&self) -> f64 {
        self.lowest_price()
    }

    fn popularity(&self) -> u64 {
        self.total_attendees.unwrap_or(0)
    }
}

impl Sortable for Ticket {
    fn sort_date(&self) -> Option<DateTime<Utc>> {
        self.registration_date
    }

    fn sort_name(&self) -> &str {
        &self.conference_name
    }

    fn sort_price(&self) -> f64 {
        self.total_price.unwrap_or(0.0)
    }
}

impl Sortable for Transaction {
    fn sort_date(&self) -> Option<DateTime<Utc>> {
        self.transaction_date
    }

    fn sort_name(&self) -> &str {
        self.conference_name.as_deref().unwrap_or(&self.transaction_id)
    }

    fn sort_price(&self) -> f64 {
        self.amount.unwrap_or(0.0)
    }
}

impl Sortable for Paper {
    fn sort_date(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    fn sort_name(&self) -> &str {
        &self.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ticket(id: &str, date: Option<&str>) -> Ticket {
        serde_json::from_value(json!({
            "ticketId": id,
            "conferenceName": id,
            "registrationDate": date,
        }))
        .unwrap()
    }

    fn ids(items: &[Ticket]) -> Vec<&str> {
        items.iter().map(|t| t.ticket_id.as_str()).collect()
    }

    #[test]
    fn test_recent_puts_newest_first() {
        let mut tickets = vec![
            ticket("jan", Some("2024-01-01")),
            ticket("mar", Some("2024-03-01")),
        ];
        sort_items(&mut tickets, SortKey::parse("Recent"));
        assert_eq!(ids(&tickets), ["mar", "jan"]);
    }

    #[test]
    fn test_undated_sort_last_both_ways() {
        let mut tickets = vec![
            ticket("none", None),
            ticket("jan", Some("2024-01-01")),
            ticket("mar", Some("2024-03-01")),
        ];
        sort_items(&mut tickets, Some(SortKey::Date));
        assert_eq!(ids(&tickets), ["jan", "mar", "none"]);
        sort_items(&mut tickets, Some(SortKey::Recent));
        assert_eq!(ids(&tickets), ["mar", "jan", "none"]);
    }

    #[test]
    fn test_ties_keep_prior_order() {
        let mut tickets = vec![
            ticket("b", Some("2024-01-01")),
            ticket("a", Some("2024-01-01")),
            ticket("c", Some("2024-01-01")),
        ];
        sort_items(&mut tickets, Some(SortKey::Date));
        assert_eq!(ids(&tickets), ["b", "a", "c"]);
    }

    #[test]
    fn test_unknown_key_is_noop() {
        assert_eq!(SortKey::parse("attendance-ratio"), None);
        let mut tickets = vec![ticket("z", None), ticket("a", Some("2024-01-01"))];
        sort_items(&mut tickets, SortKey::parse("attendance-ratio"));
        assert_eq!(ids(&tickets), ["z", "a"]);
    }

    #[test]
    fn test_conference_price_and_popularity() {
        let conf = |id: &str, price: Option<f64>, attendees: u64| -> Conference {
            serde_json::from_value(json!({
                "conferenceId": id,
                "conferenceName": id,
                "totalAttendees": attendees,
                "conferencePrices": [{"conferencePriceId": "p", "ticketPrice": price}],
            }))
            .unwrap()
        };
        let mut list = vec![
            conf("pricey", Some(300.0), 10),
            conf("free", None, 500),
            conf("cheap", Some(20.0), 90),
        ];

        sort_items(&mut list, Some(SortKey::Price));
        let order: Vec<_> = list.iter().map(|c| c.conference_id.as_str()).collect();
        assert_eq!(order, ["free", "cheap", "pricey"]);

        sort_items(&mut list, Some(SortKey::Popularity));
        let order: Vec<_> = list.iter().map(|c| c.conference_id.as_str()).collect();
        assert_eq!(order, ["free", "cheap", "pricey"]);

        sort_items(&mut list, Some(SortKey::Name));
        let order: Vec<_> = list.iter().map(|c| c.conference_id.as_str()).collect();
        assert_eq!(order, ["cheap", "free", "pricey"]);
    }
}
