//! Time-based conference status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Upcoming,
    Current,
    Past,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Upcoming => "upcoming",
            EventStatus::Current => "current",
            EventStatus::Past => "past",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventStatus::Upcoming => "Upcoming",
            EventStatus::Current => "Happening now",
            EventStatus::Past => "Ended",
        }
    }
}

/// Classify `now` against an event window.
///
/// `[start, end]` is inclusive on both ends. A missing start means the event
/// has not been scheduled yet and is reported as upcoming; a missing end
/// collapses the window to the start instant.
pub fn derive_status(
    now: DateTime<Utc>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> EventStatus {
    let Some(start) = start else {
        return EventStatus::Upcoming;
    };
    let end = end.unwrap_or(start);
    if now < start {
        EventStatus::Upcoming
    } else if now <= end {
        EventStatus::Current
    } else {
        EventStatus::Past
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_window_classification() {
        let (start, end) = (at(10), at(12));
        for (now, expected) in [
            (at(9), EventStatus::Upcoming),
            (start - Duration::seconds(1), EventStatus::Upcoming),
            (start, EventStatus::Current),
            (at(11), EventStatus::Current),
            (end, EventStatus::Current),
            (end + Duration::seconds(1), EventStatus::Past),
            (at(20), EventStatus::Past),
        ] {
            assert_eq!(derive_status(now, Some(start), Some(end)), expected, "now={now}");
        }
    }

    #[test]
    fn test_missing_start_is_upcoming() {
        assert_eq!(derive_status(at(1), None, None), EventStatus::Upcoming);
        assert_eq!(derive_status(at(30), None, Some(at(2))), EventStatus::Upcoming);
    }

    #[test]
    fn test_missing_end_collapses_to_start() {
        assert_eq!(derive_status(at(10), Some(at(10)), None), EventStatus::Current);
        assert_eq!(derive_status(at(11), Some(at(10)), None), EventStatus::Past);
    }
}
