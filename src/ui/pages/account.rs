use dioxus::prelude::*;
use tracing::info;

use crate::{
    app::{sign_out, Route},
    domain::AppState,
    ui::{
        components::toast::{push_toast, ToastKind, ToastMessage},
        theme,
    },
    util::version::{version_label, APP_NAME},
};

#[component]
pub fn AccountPage() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let nav = use_navigator();

    let user = state.with(|st| st.user().cloned()).unwrap_or_default();
    let name = user.display_name();
    let email = user.email.clone().unwrap_or_else(|| "—".to_string());
    let organization = user.org_id.clone().unwrap_or_else(|| "—".to_string());

    let on_sign_out = move |_| {
        info!("signing out");
        sign_out(&mut state);
        push_toast(toasts, ToastKind::Info, "Signed out.");
        nav.replace(Route::Login {});
    };

    rsx! {
        div { class: "space-y-4",
            h2 { class: "text-xl font-semibold", "Account" }
            section { class: "{theme::PANEL} space-y-3",
                div {
                    p { class: theme::LABEL, "Name" }
                    p { class: "text-base font-semibold", "{name}" }
                }
                div {
                    p { class: theme::LABEL, "Email" }
                    p { class: "text-sm text-slate-200", "{email}" }
                }
                div {
                    p { class: theme::LABEL, "Organization" }
                    p { class: "text-sm text-slate-200", "{organization}" }
                }
            }
            section { class: "{theme::PANEL} flex items-center justify-between",
                p { class: "text-sm {theme::TEXT_MUTED}", "{APP_NAME}" }
                p { class: "text-sm text-slate-300", "{version_label()}" }
            }
            button { class: "{theme::BTN_DANGER} w-full", onclick: on_sign_out, "Sign out" }
        }
    }
}
