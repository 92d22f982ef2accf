use dioxus::prelude::*;

/// Renders the loading, error and empty states of a query, and `children`
/// once there is something to show.
///
/// Data that is already on screen stays visible while a refetch runs or after
/// it fails; the error is then shown as a banner above it.
#[component]
pub fn QueryStatus(
    loading: bool,
    error: Option<String>,
    empty: bool,
    #[props(default = "Nothing here yet.".to_string())] empty_message: String,
    on_retry: EventHandler<()>,
    children: Element,
) -> Element {
    if loading {
        return rsx! {
            div { class: "state state-loading", "Loading..." }
        };
    }

    let failed = error.is_some();
    rsx! {
        if let Some(message) = error {
            div {
                class: "banner banner-danger",
                role: "alert",
                span { "{message}" }
                button { class: "btn btn-link", onclick: move |_| on_retry.call(()), "Retry" }
            }
        }
        if empty {
            if !failed {
                div { class: "state state-empty", "{empty_message}" }
            }
        } else {
            {children}
        }
    }
}
