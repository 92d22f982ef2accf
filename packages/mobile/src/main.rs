use api::{ApiClient, QueryClient};
use dioxus::prelude::*;
use store::{AppConfig, SessionStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use views::{
    ConferenceDetail, Conferences, ForgotPassword, Login, Papers, Profile, Register, TabLayout,
    Tickets, Transactions,
};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Root {},
    #[route("/login")]
    Login {},
    #[route("/register")]
    Register {},
    #[route("/forgot-password")]
    ForgotPassword {},
    #[layout(TabLayout)]
        #[route("/conferences")]
        Conferences {},
        #[route("/conferences/:id")]
        ConferenceDetail { id: String },
        #[route("/tickets")]
        Tickets {},
        #[route("/transactions")]
        Transactions {},
        #[route("/papers")]
        Papers {},
        #[route("/profile")]
        Profile {},
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let dir = std::env::current_dir().unwrap_or_default();
    let config = AppConfig::load(&dir).unwrap_or_else(|e| {
        tracing::error!("Ignoring {}: {}", AppConfig::filename(), e);
        AppConfig::default()
    });
    tracing::info!("Using API at {}", config.api.base_url);

    let session = SessionStore::new();
    let tokens = ui::make_token_storage(&config);
    let api = match ApiClient::new(&config.api, tokens, session.clone()) {
        Ok(api) => api,
        Err(e) => {
            tracing::error!("Failed to build HTTP client: {}", e);
            return;
        }
    };
    let queries = QueryClient::new(api);

    dioxus::LaunchBuilder::new()
        .with_context(session)
        .with_context(queries)
        .launch(App);
}

#[component]
fn App() -> Element {
    let queries = ui::use_query_client();
    // Restored once per launch; the root route waits for it.
    let restored = use_resource(move || {
        let queries = queries.clone();
        async move { api::auth::restore_session(queries.api()).await.is_some() }
    });
    use_context_provider(|| restored);

    rsx! {
        document::Link { rel: "stylesheet", href: ui::CONFHUB_CSS }
        ui::SessionProvider {
            Router::<Route> {}
        }
    }
}

#[component]
fn Root() -> Element {
    let restored = use_context::<Resource<bool>>();
    let nav = use_navigator();

    use_effect(move || match restored() {
        Some(true) => {
            nav.replace(Route::Conferences {});
        }
        Some(false) => {
            nav.replace(Route::Login {});
        }
        None => {}
    });

    rsx! {
        div { class: "state state-loading", "Loading..." }
    }
}
