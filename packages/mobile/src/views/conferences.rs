use api::{ConferenceQuery, Endpoint, Paginated};
use dioxus::prelude::*;
use serde_json::Value;
use store::views::format::{format_date_range, format_price};
use store::views::{build_view, derive_status, FilterKey, SortKey, ViewParams};
use store::{Conference, ConferenceCategory};
use ui::Chip;

use crate::Route;

/// Conferences pulled in one request; search, filters, sorting and paging
/// all run locally over this window.
const CATALOG_WINDOW: u32 = 100;

fn status_chips(categories: &[ConferenceCategory]) -> Vec<Chip> {
    let mut chips = vec![
        Chip::new("all", "All"),
        Chip::new("current", "Happening now"),
        Chip::new("upcoming", "Upcoming"),
        Chip::new("past", "Past"),
        Chip::new("free", "Free"),
    ];
    chips.extend(categories.iter().map(|c| {
        Chip::new(&c.conference_category_id, &c.conference_category_name)
    }));
    chips
}

fn sort_options() -> Vec<Chip> {
    vec![
        Chip::new("date", "Soonest"),
        Chip::new("recent", "Most recent"),
        Chip::new("price", "Lowest price"),
        Chip::new("name", "Name"),
        Chip::new("popularity", "Most popular"),
    ]
}

#[component]
pub fn Conferences() -> Element {
    let conferences = ui::use_query::<Paginated<Conference>>(|| {
        Some(Endpoint::PaginatedConferences(ConferenceQuery::page(1, CATALOG_WINDOW)))
    });
    let categories = ui::use_query::<Vec<ConferenceCategory>>(|| Some(Endpoint::ConferenceCategories));
    let favorites = ui::use_query::<Value>(|| Some(Endpoint::OwnFavorites));

    let mut search = use_signal(String::new);
    let mut filter = use_signal(|| "all".to_string());
    let mut sort = use_signal(String::new);
    let mut page = use_signal(|| 1i64);

    let state = conferences.state();
    let page_data = state.data.clone();
    let items = page_data.as_ref().map(|p| p.items.clone()).unwrap_or_default();
    let params = ViewParams::default()
        .with_search(search())
        .with_filter(FilterKey::parse(&filter()))
        .with_sort(SortKey::parse(&sort()))
        .with_page(page());
    let now = chrono::Utc::now();
    let view = build_view(&items, &params, now);
    let favorite_ids = favorites
        .data()
        .map(|f| api::actions::favorite_ids(&f))
        .unwrap_or_default();
    let chips = status_chips(&categories.data().unwrap_or_default());
    let truncated = page_data.as_ref().is_some_and(|p| p.has_more());

    rsx! {
        div { class: "screen",
            h1 { "Conferences" }
            ui::SearchBar {
                value: search(),
                placeholder: "Search by name, place or topic",
                on_change: move |q| {
                    search.set(q);
                    page.set(1);
                },
            }
            ui::ChipGroup {
                chips,
                selected: filter(),
                on_select: move |key| {
                    filter.set(key);
                    page.set(1);
                },
            }
            ui::SortSelect { options: sort_options(), selected: sort(), on_select: move |key| sort.set(key) }
            ui::QueryStatus {
                loading: state.is_loading,
                error: state.error.clone(),
                empty: state.data.is_some() && view.is_empty(),
                empty_message: "No conferences match your search.",
                on_retry: move |_| conferences.refetch(),
                for conference in view.items.clone() {
                    ConferenceCard {
                        key: "{conference.conference_id}",
                        favorite: favorite_ids.contains(&conference.conference_id),
                        conference,
                    }
                }
                ui::Pager { pagination: view.pagination, on_page: move |p| page.set(p) }
                if truncated {
                    p { class: "muted", "Showing the first {CATALOG_WINDOW} conferences. Refine your search to see more." }
                }
            }
        }
    }
}

#[component]
fn ConferenceCard(conference: Conference, favorite: bool) -> Element {
    let status = derive_status(chrono::Utc::now(), conference.start_date, conference.end_date);
    let price = if conference.conference_prices.is_empty() {
        format_price(None, None)
    } else {
        format!("From {}", format_price(Some(conference.lowest_price()), None))
    };
    let dates = format_date_range(conference.start_date, conference.end_date);
    let place = conference.address.clone().unwrap_or_default();

    rsx! {
        Link {
            class: "card",
            to: Route::ConferenceDetail { id: conference.conference_id.clone() },
            div { class: "row",
                p { class: "card-title", "{conference.conference_name}" }
                if favorite {
                    span { class: "badge badge-warning", "Saved" }
                }
            }
            p { class: "muted", "{dates} · {place}" }
            div { class: "row",
                span { class: "muted", "{status.label()}" }
                span { "{price}" }
            }
        }
    }
}
