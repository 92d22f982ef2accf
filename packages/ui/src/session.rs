//! Session context and hooks for the UI.

use dioxus::prelude::*;
use store::{Session, SessionStore};

/// Get the current session.
/// Returns a signal that updates whenever the [`SessionStore`] changes.
pub fn use_session() -> Signal<Session> {
    use_context::<Signal<Session>>()
}

/// Provider component that mirrors the [`SessionStore`] into a signal.
/// Expects a `SessionStore` in context; wrap the router with this.
#[component]
pub fn SessionProvider(children: Element) -> Element {
    let store = use_context::<SessionStore>();
    let mut session = use_context_provider({
        let store = store.clone();
        move || Signal::new(store.snapshot())
    });

    use_future(move || {
        let store = store.clone();
        async move {
            let mut rx = store.subscribe();
            loop {
                let latest = rx.borrow_and_update().clone();
                if *session.peek() != latest {
                    session.set(latest);
                }
                if rx.changed().await.is_err() {
                    break;
                }
            }
        }
    });

    rsx! {
        {children}
    }
}

/// Button to log out the current user.
#[component]
pub fn LogoutButton(
    #[props(default = "Log out".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
    #[props(default)] on_logout: EventHandler<()>,
) -> Element {
    let queries = crate::use_query_client();
    let mut loading = use_signal(|| false);

    let onclick = move |_| {
        let queries = queries.clone();
        async move {
            loading.set(true);
            api::auth::logout(&queries).await;
            loading.set(false);
            on_logout.call(());
        }
    };

    rsx! {
        button {
            class: "btn btn-ghost {class}",
            disabled: loading(),
            onclick: onclick,
            "{label}"
        }
    }
}

/// Banner for the transient auth error, if any.
#[component]
pub fn SessionError() -> Element {
    let session = use_session();
    let error = session().error;

    rsx! {
        if let Some(message) = error {
            div { class: "banner banner-danger", role: "alert", "{message}" }
        }
    }
}
