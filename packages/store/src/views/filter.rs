//! Category and status filters.
//!
//! Each list screen offers a fixed set of chips plus, for conferences, one chip
//! per category fetched from `/ConferenceCategory`. A chip maps to a
//! [`FilterKey`]; [`FilterKey::All`] always passes.

use chrono::{DateTime, Utc};

use super::status::{derive_status, EventStatus};
use crate::models::{Conference, Paper, Ticket, Transaction};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum FilterKey {
    #[default]
    All,
    Current,
    Upcoming,
    Past,
    Free,
    /// Dynamic conference category id.
    Category(String),
    /// Backend status value for tickets, transactions and papers.
    Status(String),
}

impl FilterKey {
    /// Parse a chip key. Fixed keys are matched case-insensitively; anything
    /// else is taken as a category id.
    pub fn parse(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "" | "all" => FilterKey::All,
            "current" => FilterKey::Current,
            "upcoming" => FilterKey::Upcoming,
            "past" => FilterKey::Past,
            "free" => FilterKey::Free,
            _ => FilterKey::Category(key.trim().to_string()),
        }
    }

    pub fn status(status: impl Into<String>) -> Self {
        let status = status.into();
        if status.eq_ignore_ascii_case("all") || status.is_empty() {
            FilterKey::All
        } else {
            FilterKey::Status(status)
        }
    }

    fn event_status(&self) -> Option<EventStatus> {
        match self {
            FilterKey::Current => Some(EventStatus::Current),
            FilterKey::Upcoming => Some(EventStatus::Upcoming),
            FilterKey::Past => Some(EventStatus::Past),
            _ => None,
        }
    }
}

/// Items that can be narrowed by a [`FilterKey`].
pub trait Filterable {
    fn matches_filter(&self, filter: &FilterKey, now: DateTime<Utc>) -> bool;
}

fn status_eq(actual: &str, wanted: &str) -> bool {
    actual.eq_ignore_ascii_case(wanted)
}

impl Filterable for Conference {
    fn matches_filter(&self, filter: &FilterKey, now: DateTime<Utc>) -> bool {
        match filter {
            FilterKey::All => true,
            FilterKey::Free => self.is_free(),
            FilterKey::Category(id) => self.category_id.as_deref() == Some(id.as_str()),
            FilterKey::Status(_) => false,
            time_based => {
                time_based.event_status() == Some(derive_status(now, self.start_date, self.end_date))
            }
        }
    }
}

impl Filterable for Ticket {
    fn matches_filter(&self, filter: &FilterKey, now: DateTime<Utc>) -> bool {
        match filter {
            FilterKey::All => true,
            FilterKey::Status(status) => status_eq(self.status_key(), status),
            FilterKey::Free => self.total_price.unwrap_or(0.0) <= 0.0,
            FilterKey::Category(_) => false,
            time_based => {
                time_based.event_status()
                    == Some(derive_status(
                        now,
                        self.conference_start_date,
                        self.conference_end_date,
                    ))
            }
        }
    }
}

impl Filterable for Transaction {
    fn matches_filter(&self, filter: &FilterKey, _now: DateTime<Utc>) -> bool {
        match filter {
            FilterKey::All => true,
            FilterKey::Status(status) => status_eq(&self.status, status),
            _ => false,
        }
    }
}

impl Filterable for Paper {
    fn matches_filter(&self, filter: &FilterKey, _now: DateTime<Utc>) -> bool {
        match filter {
            FilterKey::All => true,
            FilterKey::Status(status) => status_eq(&self.status, status),
            _ => false,
        }
    }
}
