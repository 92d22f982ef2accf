use api::Endpoint;
use dioxus::prelude::*;
use store::views::format::{format_date, format_price, transaction_status};
use store::views::{build_view, FilterKey, SortKey, ViewParams};
use store::Transaction;
use ui::Chip;

#[component]
pub fn Transactions() -> Element {
    let transactions = ui::use_query::<Vec<Transaction>>(|| Some(Endpoint::OwnTransactions));
    let mut filter = use_signal(|| "all".to_string());
    let mut page = use_signal(|| 1i64);

    let state = transactions.state();
    let items = state.data.clone().unwrap_or_default();
    let params = ViewParams::default()
        .with_filter(FilterKey::status(filter()))
        .with_sort(SortKey::parse("recent"))
        .with_page(page());
    let view = build_view(&items, &params, chrono::Utc::now());
    let chips = vec![
        Chip::new("all", "All"),
        Chip::new("Completed", "Completed"),
        Chip::new("Pending", "Pending"),
        Chip::new("Failed", "Failed"),
        Chip::new("Refunded", "Refunded"),
    ];

    rsx! {
        div { class: "screen",
            h1 { "Payment history" }
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
                empty_message: "No payments yet.",
                on_retry: move |_| transactions.refetch(),
                for transaction in view.items.clone() {
                    TransactionRow { key: "{transaction.transaction_id}", transaction }
                }
                ui::Pager { pagination: view.pagination, on_page: move |p| page.set(p) }
            }
        }
    }
}

#[component]
fn TransactionRow(transaction: Transaction) -> Element {
    let (label, tone) = transaction_status(&transaction.status);
    let amount = format_price(transaction.amount, transaction.currency.as_deref());
    let date = format_date(transaction.transaction_date);
    let title = transaction
        .conference_name
        .clone()
        .or_else(|| transaction.description.clone())
        .unwrap_or_else(|| "Payment".to_string());

    rsx! {
        div { class: "card",
            div { class: "row",
                p { class: "card-title", "{title}" }
                strong { "{amount}" }
            }
            div { class: "row",
                span { class: "muted", "{date}" }
                ui::Badge { label: label.to_string(), tone }
            }
        }
    }
}
