use dioxus::prelude::*;

use crate::Route;

/// Signed-in shell: the current screen plus the bottom tab bar. Losing the
/// session (logout, or a refresh that failed) sends the user to login.
#[component]
pub fn TabLayout() -> Element {
    let session = ui::use_session();
    let nav = use_navigator();

    use_effect(move || {
        if !session().is_authenticated {
            nav.replace(Route::Login {});
        }
    });

    rsx! {
        main { Outlet::<Route> {} }
        nav { class: "tabbar",
            Link { to: Route::Conferences {}, active_class: "active", "Explore" }
            Link { to: Route::Tickets {}, active_class: "active", "Tickets" }
            Link { to: Route::Papers {}, active_class: "active", "Papers" }
            Link { to: Route::Profile {}, active_class: "active", "Profile" }
        }
    }
}
