//! # Derived views over cached collections
//!
//! Pure, synchronous transformations from a fetched collection to the slice a
//! list screen renders. Nothing here touches the network or storage, and the
//! same input always produces the same output, so screens can recompute on
//! every render.
//!
//! ## Pipeline
//!
//! [`build_view`] applies, in order:
//!
//! 1. **Search**: [`search::matches_search`] over each type's fixed text fields.
//! 2. **Filter**: [`filter::FilterKey`] (`all`, time status, `free`, category
//!    id, or a backend status).
//! 3. **Sort**: stable, one [`sort::SortKey`] at a time; unknown keys are a no-op.
//! 4. **Paginate**: [`paginate::Pagination`] clamps the requested page.
//!
//! ## Other helpers
//!
//! - [`status::derive_status`] classifies a `(now, start, end)` window.
//! - [`format`] renders prices, dates and status badges with defaults
//!   (`"Free"`, `"TBA"`) for missing data.
//! - [`cart::TicketSelection`] tracks the purchase sheet's quantities.

pub mod cart;
pub mod filter;
pub mod format;
pub mod paginate;
pub mod search;
pub mod sort;
pub mod status;

use chrono::{DateTime, Utc};

pub use cart::{OrderLine, TicketOrder, TicketSelection};
pub use filter::{FilterKey, Filterable};
pub use paginate::Pagination;
pub use search::{matches_search, Searchable};
pub use sort::{sort_items, SortKey, Sortable};
pub use status::{derive_status, EventStatus};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// User-controlled parameters of a list screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewParams {
    pub search: String,
    pub filter: FilterKey,
    pub sort: Option<SortKey>,
    /// 1-indexed; out-of-range values are clamped.
    pub page: i64,
    pub page_size: usize,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            search: String::new(),
            filter: FilterKey::All,
            sort: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ViewParams {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_filter(mut self, filter: FilterKey) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_sort(mut self, sort: Option<SortKey>) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}

/// The slice to render plus what the pager needs.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedView<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> DerivedView<T> {
    /// Number of items that survived search and filter, across all pages.
    pub fn matched(&self) -> usize {
        self.pagination.total_count()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Search, filter, sort and paginate `items` for display.
pub fn build_view<T>(items: &[T], params: &ViewParams, now: DateTime<Utc>) -> DerivedView<T>
where
    T: Searchable + Filterable + Sortable + Clone,
{
    let mut matched: Vec<T> = items
        .iter()
        .filter(|item| matches_search(*item, &params.search))
        .filter(|item| item.matches_filter(&params.filter, now))
        .cloned()
        .collect();
    sort_items(&mut matched, params.sort);

    let pagination = Pagination::new(params.page, params.page_size, matched.len());
    let items = pagination.slice(&matched).to_vec();
    DerivedView { items, pagination }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Conference;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn catalog() -> Vec<Conference> {
        (1..=12)
            .map(|i| {
                serde_json::from_value(json!({
                    "conferenceId": format!("c{i}"),
                    "conferenceName": if i % 2 == 0 { format!("AI Summit {i}") } else { format!("Design Days {i}") },
                    "startDate": format!("2024-07-{i:02}"),
                    "endDate": format!("2024-07-{i:02}"),
                    "totalAttendees": i * 10,
                }))
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_pipeline() {
        let params = ViewParams::default()
            .with_search("ai")
            .with_filter(FilterKey::Upcoming)
            .with_sort(Some(SortKey::Popularity))
            .with_page_size(4);
        let view = build_view(&catalog(), &params, now());

        assert_eq!(view.matched(), 6);
        assert_eq!(view.pagination.total_pages(), 2);
        let ids: Vec<_> = view.items.iter().map(|c| c.conference_id.as_str()).collect();
        assert_eq!(ids, ["c12", "c10", "c8", "c6"]);
    }

    #[test]
    fn test_page_beyond_end_is_clamped() {
        let params = ViewParams::default().with_page(99).with_page_size(5);
        let view = build_view(&catalog(), &params, now());
        assert_eq!(view.pagination.page(), 3);
        assert_eq!(view.items.len(), 2);
    }

    #[test]
    fn test_empty_result_has_one_page() {
        let params = ViewParams::default().with_search("no such thing");
        let view = build_view(&catalog(), &params, now());
        assert!(view.is_empty());
        assert_eq!(view.pagination.total_pages(), 1);
        assert_eq!(view.pagination.page(), 1);
    }

    #[test]
    fn test_same_params_same_output() {
        let params = ViewParams::default()
            .with_search("summit")
            .with_sort(Some(SortKey::Name))
            .with_page(2)
            .with_page_size(3);
        let items = catalog();
        let first = build_view(&items, &params, now());
        let second = build_view(&items, &params, now());
        assert_eq!(first, second);
    }
}
