use api::actions::{self, PaymentSession};
use api::Endpoint;
use dioxus::prelude::*;
use serde_json::Value;
use store::views::cart::MAX_PER_TIER;
use store::views::format::{format_date, format_date_range, format_price};
use store::views::{derive_status, TicketSelection};
use store::{Conference, ConferencePrice};

use super::papers::AbstractForm;

#[component]
pub fn ConferenceDetail(id: String) -> Element {
    let mut id_signal = use_signal(|| id.clone());
    if *id_signal.peek() != id {
        id_signal.set(id.clone());
    }

    let conference = ui::use_query::<Conference>(move || Some(Endpoint::Conference { id: id_signal() }));
    let favorites = ui::use_query::<Value>(|| Some(Endpoint::OwnFavorites));
    let queries = ui::use_query_client();
    let favorite_mutation = ui::use_mutation();

    let state = conference.state();
    let is_favorite = favorites
        .data()
        .map(|f| actions::favorite_ids(&f).contains(&id))
        .unwrap_or(false);

    let toggle_favorite = move |_| {
        let queries = queries.clone();
        let id = id_signal();
        async move {
            favorite_mutation
                .run(actions::set_favorite(&queries, &id, !is_favorite))
                .await;
        }
    };

    rsx! {
        div { class: "screen",
            ui::QueryStatus {
                loading: state.is_loading,
                error: state.error.clone(),
                empty: state.data.is_none(),
                empty_message: "Conference not found.",
                on_retry: move |_| conference.refetch(),
                if let Some(conference) = state.data.clone() {
                    ConferenceSummary { conference: conference.clone() }
                    ProgramDetails {
                        conference_id: conference.conference_id.clone(),
                        research: conference.is_research_conference,
                    }
                    button {
                        class: "btn btn-ghost",
                        disabled: favorite_mutation.pending(),
                        onclick: toggle_favorite,
                        if is_favorite { "Remove from saved" } else { "Save conference" }
                    }
                    if let Some(error) = favorite_mutation.error() {
                        div { class: "banner banner-danger", "{error}" }
                    }
                    TicketPicker { conference: conference.clone() }
                    if conference.is_research_conference {
                        AbstractForm { conference_id: conference.conference_id.clone() }
                    }
                }
            }
        }
    }
}

#[component]
fn ConferenceSummary(conference: Conference) -> Element {
    let status = derive_status(chrono::Utc::now(), conference.start_date, conference.end_date);
    let dates = format_date_range(conference.start_date, conference.end_date);
    let category = conference.category_name.clone().unwrap_or_default();

    rsx! {
        div { class: "card",
            h1 { "{conference.conference_name}" }
            p { class: "muted", "{dates} · {status.label()}" }
            if let Some(address) = conference.address.clone() {
                p { class: "muted", "{address}" }
            }
            if !category.is_empty() {
                span { class: "badge badge-neutral", "{category}" }
            }
            if let Some(description) = conference.description.clone() {
                p { "{description}" }
            }
        }
        if !conference.sessions.is_empty() {
            div { class: "card",
                p { class: "card-title", "Sessions" }
                for session in conference.sessions.clone() {
                    div { key: "{session.session_id}", class: "row",
                        span { "{session.title}" }
                        span { class: "muted", "{format_date(session.start_time)}" }
                    }
                }
            }
        }
    }
}

/// Room-level program, loaded from the technical or research detail
/// endpoint only when asked for.
#[component]
fn ProgramDetails(conference_id: String, research: bool) -> Element {
    let program = ui::use_lazy_query::<Conference>();
    let state = program.state();

    let load = move |_| {
        let id = conference_id.clone();
        async move {
            let endpoint = if research {
                Endpoint::ResearchConference { id }
            } else {
                Endpoint::TechnicalConference { id }
            };
            program.fetch(endpoint).await;
        }
    };

    let Some(detail) = state.data.clone() else {
        return rsx! {
            div { class: "card",
                if let Some(error) = state.error.clone() {
                    div { class: "banner banner-danger", role: "alert", "{error}" }
                }
                button {
                    class: "btn btn-ghost",
                    disabled: state.is_fetching,
                    onclick: load,
                    if state.is_fetching { "Loading program..." } else { "Show full program" }
                }
            }
        };
    };

    rsx! {
        div { class: "card",
            p { class: "card-title", "Program" }
            if detail.sessions.is_empty() {
                p { class: "muted", "The program has not been published yet." }
            }
            for session in detail.sessions.clone() {
                div { key: "{session.session_id}", class: "row",
                    span { "{session.title}" }
                    span { class: "muted",
                        "{format_date(session.start_time)}"
                        if let Some(room) = session.room.clone() {
                            " · {room}"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn TicketPicker(conference: Conference) -> Element {
    let queries = ui::use_query_client();
    let purchase = ui::use_mutation();
    let mut selection = use_signal(TicketSelection::new);
    let mut payment = use_signal(|| None::<PaymentSession>);

    if conference.conference_prices.is_empty() {
        return rsx! {};
    }

    let subtotal = selection.read().subtotal(&conference);
    let total_quantity = selection.read().total_quantity();
    let checkout = {
        let conference = conference.clone();
        move |_| {
            let queries = queries.clone();
            let conference = conference.clone();
            async move {
                let chosen = selection.peek().clone();
                if let Some(session) = purchase
                    .run(actions::purchase_tickets(&queries, &conference, &chosen))
                    .await
                {
                    selection.set(TicketSelection::new());
                    payment.set(Some(session));
                }
            }
        }
    };

    rsx! {
        div { class: "card",
            p { class: "card-title", "Tickets" }
            for tier in conference.conference_prices.clone() {
                TierRow {
                    key: "{tier.conference_price_id}",
                    quantity: selection.read().quantity(&tier.conference_price_id),
                    on_increment: {
                        let id = tier.conference_price_id.clone();
                        move |_| selection.write().increment(&id)
                    },
                    on_decrement: {
                        let id = tier.conference_price_id.clone();
                        move |_| selection.write().decrement(&id)
                    },
                    tier,
                }
            }
            div { class: "row",
                span { "{total_quantity} selected" }
                strong { "{format_price(Some(subtotal), None)}" }
            }
            if let Some(error) = purchase.error() {
                div { class: "banner banner-danger", role: "alert", "{error}" }
            }
            button {
                class: "btn btn-primary",
                disabled: total_quantity == 0 || purchase.pending(),
                onclick: checkout,
                if purchase.pending() { "Processing..." } else { "Checkout" }
            }
            if let Some(session) = payment() {
                div { class: "banner banner-success",
                    match session.payment_url {
                        Some(url) => rsx! {
                            a { href: "{url}", target: "_blank", "Complete your payment" }
                        },
                        None => rsx! {
                            span { "Order placed. Your tickets will appear under Tickets." }
                        },
                    }
                }
            }
        }
    }
}

#[component]
fn TierRow(
    tier: ConferencePrice,
    quantity: u32,
    on_increment: EventHandler<()>,
    on_decrement: EventHandler<()>,
) -> Element {
    let name = tier.ticket_name.clone().unwrap_or_else(|| "Ticket".to_string());
    let price = format_price(tier.ticket_price, None);
    let remaining = tier.available_slot;
    let at_cap = quantity >= MAX_PER_TIER || remaining.is_some_and(|slots| quantity >= slots);

    rsx! {
        div { class: "tier",
            div {
                p { class: "card-title", "{name}" }
                p { class: "muted",
                    "{price}"
                    if let Some(slots) = remaining {
                        " · {slots} left"
                    }
                }
            }
            if tier.is_sold_out() {
                span { class: "badge badge-neutral", "Sold out" }
            } else {
                div { class: "stepper",
                    button {
                        class: "btn btn-ghost",
                        disabled: quantity == 0,
                        onclick: move |_| on_decrement.call(()),
                        "-"
                    }
                    span { "{quantity}" }
                    button {
                        class: "btn btn-ghost",
                        disabled: at_cap,
                        onclick: move |_| on_increment.call(()),
                        "+"
                    }
                }
            }
        }
    }
}
