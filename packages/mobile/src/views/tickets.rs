use api::Endpoint;
use dioxus::prelude::*;
use store::views::format::{format_date_range, format_price};
use store::views::{build_view, FilterKey, SortKey, ViewParams};
use store::Ticket;
use ui::Chip;

/// Time chips filter on the conference window, the rest on ticket status.
fn ticket_filter(key: &str) -> FilterKey {
    match key {
        "current" | "upcoming" | "past" => FilterKey::parse(key),
        other => FilterKey::status(other),
    }
}

#[component]
pub fn Tickets() -> Element {
    let tickets = ui::use_query::<Vec<Ticket>>(|| Some(Endpoint::OwnTickets));
    let mut search = use_signal(String::new);
    let mut filter = use_signal(|| "all".to_string());
    let mut page = use_signal(|| 1i64);

    let state = tickets.state();
    let items = state.data.clone().unwrap_or_default();
    let params = ViewParams::default()
        .with_search(search())
        .with_filter(ticket_filter(&filter()))
        .with_sort(SortKey::parse("date"))
        .with_page(page());
    let view = build_view(&items, &params, chrono::Utc::now());
    let chips = vec![
        Chip::new("all", "All"),
        Chip::new("upcoming", "Upcoming"),
        Chip::new("past", "Past"),
        Chip::new("checked-in", "Checked in"),
        Chip::new("refunded", "Refunded"),
    ];

    rsx! {
        div { class: "screen",
            h1 { "My tickets" }
            ui::SearchBar {
                value: search(),
                placeholder: "Search tickets",
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
            ui::QueryStatus {
                loading: state.is_loading,
                error: state.error.clone(),
                empty: state.data.is_some() && view.is_empty(),
                empty_message: "No tickets yet. Browse conferences to get one.",
                on_retry: move |_| tickets.refetch(),
                for ticket in view.items.clone() {
                    TicketCard { key: "{ticket.ticket_id}", ticket }
                }
                ui::Pager { pagination: view.pagination, on_page: move |p| page.set(p) }
            }
        }
    }
}

#[component]
fn TicketCard(ticket: Ticket) -> Element {
    let dates = format_date_range(ticket.conference_start_date, ticket.conference_end_date);
    let tier = ticket.ticket_name.clone().unwrap_or_default();
    let price = format_price(ticket.total_price, None);
    let status = match ticket.status_key() {
        "refunded" => ("Refunded", store::views::format::Tone::Neutral),
        "checked-in" => ("Checked in", store::views::format::Tone::Success),
        _ => ("Active", store::views::format::Tone::Warning),
    };

    rsx! {
        div { class: "card",
            div { class: "row",
                p { class: "card-title", "{ticket.conference_name}" }
                ui::Badge { label: status.0.to_string(), tone: status.1 }
            }
            p { class: "muted", "{dates}" }
            div { class: "row",
                span { "{tier}" }
                span { "{price}" }
            }
            if let Some(qr) = ticket.qr_code_url.clone() {
                img { class: "qr", src: "{qr}", alt: "Ticket QR code", width: "160" }
            }
        }
    }
}
