//! Display strings with documented defaults for missing data.

use chrono::{DateTime, Utc};

pub const FREE_LABEL: &str = "Free";
pub const TBA_LABEL: &str = "TBA";

/// `"Free"` for a missing or non-positive price, otherwise the amount with two
/// decimals and an optional currency code.
pub fn format_price(price: Option<f64>, currency: Option<&str>) -> String {
    match price {
        Some(p) if p > 0.0 => match currency {
            Some(code) if !code.is_empty() => format!("{p:.2} {code}"),
            _ => format!("{p:.2}"),
        },
        _ => FREE_LABEL.to_string(),
    }
}

/// `"TBA"` for a missing date, otherwise e.g. `Mar 01, 2024`.
pub fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| TBA_LABEL.to_string())
}

/// `Mar 01 - Mar 03, 2024` style range; collapses to one date when the window
/// is a single day or the end is missing.
pub fn format_date_range(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> String {
    match (start, end) {
        (Some(s), Some(e)) if s.date_naive() != e.date_naive() => {
            format!("{} - {}", s.format("%b %d"), format_date(Some(e)))
        }
        (Some(s), _) => format_date(Some(s)),
        (None, _) => TBA_LABEL.to_string(),
    }
}

/// Visual tone for a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Danger,
    Neutral,
}

/// Human label and tone for a payment transaction status.
pub fn transaction_status(status: &str) -> (&'static str, Tone) {
    match status.trim().to_ascii_lowercase().as_str() {
        "completed" | "success" | "paid" => ("Completed", Tone::Success),
        "pending" | "processing" => ("Pending", Tone::Warning),
        "failed" | "cancelled" | "canceled" => ("Failed", Tone::Danger),
        "refunded" => ("Refunded", Tone::Neutral),
        _ => ("Unknown", Tone::Neutral),
    }
}

/// Human label and tone for a paper review status.
pub fn paper_status(status: &str) -> (&'static str, Tone) {
    match status.trim().to_ascii_lowercase().as_str() {
        "accepted" | "approved" => ("Accepted", Tone::Success),
        "rejected" => ("Rejected", Tone::Danger),
        "revision" | "revisionrequired" | "needsrevision" => ("Revision required", Tone::Warning),
        "underreview" | "inreview" | "reviewing" => ("Under review", Tone::Warning),
        "pending" | "submitted" => ("Submitted", Tone::Neutral),
        _ => ("Unknown", Tone::Neutral),
    }
}
