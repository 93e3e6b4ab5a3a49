use dioxus::{prelude::*, signals::Signal};
use tracing::{info, warn};

use crate::{
    domain::{AppState, LoadListKind, Session},
    infra::api::{ApiError, FreightClient},
    ui::{
        components::toast::{push_toast, Toast, ToastKind, ToastMessage},
        pages::{
            AccountPage, ForgotPasswordPage, LoadDetailsPage, LoadsPage, LoginPage, RegisterPage,
        },
        shell::Shell,
    },
    util::{
        assets,
        persistence::{clear_persisted_state, load_persisted_state, save_persisted_state},
    },
};

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    #[route("/login")]
    Login {},
    #[route("/register")]
    Register {},
    #[route("/forgot-password")]
    ForgotPassword {},
    #[route("/loads")]
    ActiveLoads {},
    #[route("/loads/delivered")]
    DeliveredLoads {},
    #[route("/loads/:id")]
    LoadDetails { id: String },
    #[route("/account")]
    Account {},
}

#[component]
pub fn App() -> Element {
    let state = use_signal(AppState::default);
    use_hook({
        let mut state = state.clone();
        move || {
            if let Some(saved) = load_persisted_state() {
                state.with_mut(|st| st.apply_persisted(saved));
                if state.with(|st| st.is_signed_in()) {
                    info!("restored saved session");
                }
            }
        }
    });
    use_context_provider(|| state.clone());

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts.clone());

    rsx! {
        document::Link { rel: "icon", href: assets::favicon_data_uri() }
        document::Meta {
            name: "viewport",
            content: "width=device-width, initial-scale=1, viewport-fit=cover",
        }
        document::Style { "{assets::main_css()}" }
        document::Style { "{assets::tailwind_css()}" }
        Router::<Route> {}
        Toast {}
    }
}

/// API client authenticated as the current session, if any.
pub fn session_client(base: &FreightClient, state: &Signal<AppState>) -> FreightClient {
    base.with_session(state.peek().session.as_ref())
}

pub fn sign_in(state: &mut Signal<AppState>, session: Session) {
    state.with_mut(|st| st.sign_in(session));
    persist_session(state);
}

pub fn sign_out(state: &mut Signal<AppState>) {
    state.with_mut(|st| st.sign_out());
    if let Err(err) = clear_persisted_state() {
        warn!(%err, "failed to remove saved session");
    }
}

pub fn persist_session(state: &Signal<AppState>) {
    let snapshot = state.with(|st| st.to_persisted());
    if let Err(err) = save_persisted_state(&snapshot) {
        warn!(%err, "failed to persist session");
    }
}

/// Shows `error` to the user. A rejected token also ends the session, which
/// sends the shell back to the login screen.
pub fn report_api_error(
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    error: &ApiError,
    fallback: &str,
) {
    if error.is_unauthorized() {
        sign_out(&mut state);
    }
    push_toast(toasts, ToastKind::Error, error.user_message(fallback));
}

#[component]
pub fn Login() -> Element {
    rsx! { LoginPage {} }
}

#[component]
pub fn Register() -> Element {
    rsx! { RegisterPage {} }
}

#[component]
pub fn ForgotPassword() -> Element {
    rsx! { ForgotPasswordPage {} }
}

#[component]
pub fn ActiveLoads() -> Element {
    rsx! { Shell { LoadsPage { kind: LoadListKind::Active } } }
}

#[component]
pub fn DeliveredLoads() -> Element {
    rsx! { Shell { LoadsPage { kind: LoadListKind::Delivered } } }
}

#[component]
pub fn LoadDetails(id: String) -> Element {
    rsx! { Shell { LoadDetailsPage { id } } }
}

#[component]
pub fn Account() -> Element {
    rsx! { Shell { AccountPage {} } }
}
