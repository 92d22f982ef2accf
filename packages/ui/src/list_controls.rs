//! Search, filter, sort and pager controls shared by the list screens.

use dioxus::prelude::*;
use store::views::format::Tone;
use store::views::Pagination;

#[component]
pub fn SearchBar(
    value: String,
    #[props(default = "Search".to_string())] placeholder: String,
    on_change: EventHandler<String>,
) -> Element {
    rsx! {
        input {
            class: "search-input",
            r#type: "search",
            placeholder: "{placeholder}",
            value: "{value}",
            oninput: move |e| on_change.call(e.value()),
        }
    }
}

/// One selectable chip: `(key, label)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Chip {
    pub key: String,
    pub label: String,
}

impl Chip {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

#[component]
pub fn ChipGroup(chips: Vec<Chip>, selected: String, on_select: EventHandler<String>) -> Element {
    rsx! {
        div { class: "chips",
            for chip in chips {
                button {
                    key: "{chip.key}",
                    class: if chip.key == selected { "chip chip-active" } else { "chip" },
                    onclick: {
                        let key = chip.key.clone();
                        move |_| on_select.call(key.clone())
                    },
                    "{chip.label}"
                }
            }
        }
    }
}

/// Sort dropdown. The empty key means "as returned by the server".
#[component]
pub fn SortSelect(options: Vec<Chip>, selected: String, on_select: EventHandler<String>) -> Element {
    rsx! {
        select {
            class: "sort-select",
            value: "{selected}",
            onchange: move |e| on_select.call(e.value()),
            option { value: "", "Default order" }
            for opt in options {
                option { key: "{opt.key}", value: "{opt.key}", "{opt.label}" }
            }
        }
    }
}

#[component]
pub fn Pager(pagination: Pagination, on_page: EventHandler<i64>) -> Element {
    if pagination.total_pages() <= 1 {
        return rsx! {};
    }
    let page = pagination.page() as i64;

    rsx! {
        nav { class: "pager",
            button {
                class: "btn btn-ghost",
                disabled: !pagination.has_prev(),
                onclick: move |_| on_page.call(page - 1),
                "Previous"
            }
            span { class: "pager-label", "Page {pagination.page()} of {pagination.total_pages()}" }
            button {
                class: "btn btn-ghost",
                disabled: !pagination.has_next(),
                onclick: move |_| on_page.call(page + 1),
                "Next"
            }
        }
    }
}

#[component]
pub fn Badge(label: String, tone: Tone) -> Element {
    let tone = match tone {
        Tone::Success => "badge-success",
        Tone::Warning => "badge-warning",
        Tone::Danger => "badge-danger",
        Tone::Neutral => "badge-neutral",
    };
    rsx! {
        span { class: "badge {tone}", "{label}" }
    }
}
