use api::auth::{self, Registration};
use dioxus::prelude::*;

use crate::Route;

#[component]
pub fn Login() -> Element {
    let queries = ui::use_query_client();
    let session = ui::use_session();
    let nav = use_navigator();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        let queries = queries.clone();
        async move {
            if auth::login(&queries, &email(), &password()).await.is_ok() {
                password.set(String::new());
                nav.replace(Route::Conferences {});
            }
        }
    };

    let state = session();
    rsx! {
        div { class: "screen",
            h1 { "Sign in" }
            ui::SessionError {}
            form { class: "form",
                onsubmit: onsubmit,
                input {
                    r#type: "email",
                    placeholder: "Email",
                    autocomplete: "email",
                    value: email(),
                    oninput: move |e| email.set(e.value()),
                }
                input {
                    r#type: "password",
                    placeholder: "Password",
                    autocomplete: "current-password",
                    value: password(),
                    oninput: move |e| password.set(e.value()),
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: state.loading,
                    if state.loading { "Signing in..." } else { "Sign in" }
                }
            }
            div { class: "row",
                Link { to: Route::ForgotPassword {}, "Forgot password?" }
                Link { to: Route::Register {}, "Create account" }
            }
        }
    }
}

#[component]
pub fn Register() -> Element {
    let queries = ui::use_query_client();
    let session = ui::use_session();
    let nav = use_navigator();
    let mut form = use_signal(Registration::default);
    let mut confirm_email = use_signal(|| false);

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        let queries = queries.clone();
        async move {
            let registration = form.peek().clone();
            match auth::register(&queries, &registration).await {
                Ok(Some(_)) => {
                    nav.replace(Route::Conferences {});
                }
                Ok(None) => confirm_email.set(true),
                Err(_) => {}
            }
        }
    };

    if confirm_email() {
        return rsx! {
            div { class: "screen",
                h1 { "Check your inbox" }
                p { "Your account was created. Confirm your email address, then sign in." }
                Link { to: Route::Login {}, class: "btn btn-primary", "Go to sign in" }
            }
        };
    }

    let state = session();
    let avatar_name = form.read().avatar.as_ref().map(|a| a.file_name.clone());
    rsx! {
        div { class: "screen",
            h1 { "Create account" }
            ui::SessionError {}
            form { class: "form",
                onsubmit: onsubmit,
                input {
                    placeholder: "Full name",
                    value: form.read().full_name.clone(),
                    oninput: move |e| form.write().full_name = e.value(),
                }
                input {
                    r#type: "email",
                    placeholder: "Email",
                    value: form.read().email.clone(),
                    oninput: move |e| form.write().email = e.value(),
                }
                input {
                    r#type: "password",
                    placeholder: "Password",
                    value: form.read().password.clone(),
                    oninput: move |e| form.write().password = e.value(),
                }
                input {
                    r#type: "password",
                    placeholder: "Confirm password",
                    value: form.read().confirm_password.clone(),
                    oninput: move |e| form.write().confirm_password = e.value(),
                }
                ui::FilePicker {
                    label: "Avatar (optional)",
                    accept: "image/*",
                    selected: avatar_name,
                    on_pick: move |file| form.write().avatar = Some(file),
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: state.loading,
                    if state.loading { "Creating account..." } else { "Create account" }
                }
            }
            Link { to: Route::Login {}, "Already have an account? Sign in" }
        }
    }
}

#[component]
pub fn ForgotPassword() -> Element {
    let queries = ui::use_query_client();
    let mutation = ui::use_mutation();
    let mut email = use_signal(String::new);
    let mut sent = use_signal(|| None::<String>);

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        let queries = queries.clone();
        async move {
            let address = email();
            if let Some(message) = mutation.run(auth::forget_password(&queries, &address)).await {
                let message = if message.trim().is_empty() {
                    format!("We sent a reset link to {}.", address.trim())
                } else {
                    message
                };
                sent.set(Some(message));
            }
        }
    };

    rsx! {
        div { class: "screen",
            h1 { "Reset password" }
            if let Some(message) = sent() {
                div { class: "banner banner-success", "{message}" }
            }
            if let Some(error) = mutation.error() {
                div { class: "banner banner-danger", role: "alert", "{error}" }
            }
            form { class: "form",
                onsubmit: onsubmit,
                input {
                    r#type: "email",
                    placeholder: "Email",
                    value: email(),
                    oninput: move |e| email.set(e.value()),
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: mutation.pending(),
                    "Send reset link"
                }
            }
            Link { to: Route::Login {}, "Back to sign in" }
        }
    }
}
