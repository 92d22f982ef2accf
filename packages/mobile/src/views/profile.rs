use api::auth::{self, ProfileUpdate};
use api::{Endpoint, FilePart};
use dioxus::prelude::*;
use store::views::format::format_date;
use store::User;

use crate::Route;

#[component]
pub fn Profile() -> Element {
    let session = ui::use_session();
    let nav = use_navigator();
    // Skipped until the session knows who is signed in.
    let account = ui::use_query::<User>(move || {
        session()
            .user_id()
            .map(|id| Endpoint::User { id: id.to_string() })
    });

    let Some(user) = session().user else {
        return rsx! {
            div { class: "state state-loading", "Loading..." }
        };
    };
    let state = account.state();
    let member_since = state
        .data
        .as_ref()
        .and_then(|u| u.created_at)
        .or(user.created_at);

    rsx! {
        div { class: "screen",
            h1 { "{user.display_name()}" }
            if let Some(avatar) = user.avatar.clone() {
                img { class: "avatar", src: "{avatar}", alt: "Avatar", width: "72" }
            }
            div { class: "card",
                p { "{user.email}" }
                if !user.role.is_empty() {
                    span { class: "badge badge-neutral", "{user.role}" }
                }
                p { class: "muted", "Member since {format_date(member_since)}" }
            }
            EditProfile { name: user.name.clone() }
            Link { class: "card", to: Route::Transactions {}, "Payment history" }
            ui::LogoutButton {
                on_logout: move |_| {
                    nav.replace(Route::Login {});
                },
            }
        }
    }
}

#[component]
fn EditProfile(name: String) -> Element {
    let queries = ui::use_query_client();
    let session = ui::use_session();
    let mut full_name = use_signal(|| name.clone());
    let mut avatar = use_signal(|| None::<FilePart>);
    let mut saved = use_signal(|| false);

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        let queries = queries.clone();
        async move {
            saved.set(false);
            let update = ProfileUpdate {
                full_name: Some(full_name.peek().clone()),
                avatar: avatar.peek().clone(),
            };
            if auth::update_profile(&queries, &update).await.is_ok() {
                avatar.set(None);
                saved.set(true);
            }
        }
    };

    let state = session();
    let selected = avatar.read().as_ref().map(|f| f.file_name.clone());
    rsx! {
        form { class: "form card",
            onsubmit: onsubmit,
            p { class: "card-title", "Edit profile" }
            ui::SessionError {}
            if saved() {
                div { class: "banner banner-success", "Profile updated." }
            }
            input {
                placeholder: "Full name",
                value: full_name(),
                oninput: move |e| full_name.set(e.value()),
            }
            ui::FilePicker {
                label: "New avatar",
                accept: "image/*",
                selected,
                on_pick: move |f| avatar.set(Some(f)),
            }
            button {
                class: "btn btn-primary",
                r#type: "submit",
                disabled: state.loading,
                if state.loading { "Saving..." } else { "Save" }
            }
        }
    }
}
