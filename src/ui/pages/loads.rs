use dioxus::prelude::*;

use crate::{
    app::{report_api_error, session_client, Route},
    domain::{
        listing::fetch_page, AppState, ListActivity, LoadListKind, LoadListState, PageRequest,
    },
    infra::api::FreightClient,
    ui::{
        components::{load_card::LoadCard, toast::ToastMessage},
        theme,
    },
    util::config::AppConfig,
};

/// Distance from the bottom, in pixels, at which the next page is requested.
const SCROLL_THRESHOLD: f64 = 240.0;

#[component]
pub fn LoadsPage(kind: LoadListKind) -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<FreightClient>();
    let config = use_context::<AppConfig>();
    let nav = use_navigator();

    let mut list = use_signal(|| LoadListState::new(kind));

    let run = use_callback(move |request: PageRequest| {
        let api = session_client(&client, &state);
        let limit = config.page_limit;
        spawn(async move {
            let response = fetch_page(&api, kind, request.page, limit).await;
            if let Err(err) = &response {
                if err.is_unauthorized() {
                    report_api_error(state, toasts, err, kind.error_message());
                }
            }
            list.with_mut(|list| list.apply(request, response));
        });
    });

    // Page 1 every time the screen is shown.
    use_effect(move || {
        let request = list.with_mut(|list| list.begin_initial());
        run.call(request);
    });

    let mut load_more = move || {
        if let Some(request) = list.with_mut(|list| list.begin_next_page()) {
            run.call(request);
        }
    };

    let snapshot = list.read();
    let activity = snapshot.activity();
    let blocking_error = snapshot.blocking_error().map(str::to_string);
    let inline_error = snapshot.inline_error().map(str::to_string);
    let views = snapshot.visible_views();
    let has_more = snapshot.has_more();
    let rows = snapshot.visible().into_iter().cloned().collect::<Vec<_>>();
    drop(snapshot);

    rsx! {
        div { class: "space-y-4 overflow-y-auto",
            style: "max-height: calc(100vh - 9rem);",
            onscroll: move |evt: ScrollEvent| {
                let data = evt.data();
                let remaining = data.scroll_height() as f64
                    - data.scroll_top() as f64
                    - data.client_height() as f64;
                if remaining < SCROLL_THRESHOLD {
                    load_more();
                }
            },
            div { class: "flex items-center justify-between",
                h2 { class: "text-xl font-semibold", "{kind.title()}" }
                button {
                    class: theme::BTN_SECONDARY,
                    disabled: activity != ListActivity::Idle,
                    onclick: move |_| {
                        let request = list.with_mut(|list| list.begin_refresh());
                        run.call(request);
                    },
                    if activity == ListActivity::Refreshing {
                        span { class: "spinner spinner-sm" }
                    } else {
                        "Refresh"
                    }
                }
            }

            if activity == ListActivity::Loading {
                div { class: "flex justify-center py-16", span { class: "spinner" } }
            } else if let Some(message) = blocking_error {
                div { class: "{theme::PANEL} text-center",
                    p { class: "text-sm text-rose-200", "{message}" }
                    button {
                        class: "{theme::BTN_SECONDARY} mt-3",
                        onclick: move |_| {
                            let request = list.with_mut(|list| list.begin_refresh());
                            run.call(request);
                        },
                        "Retry"
                    }
                }
            } else if views.is_empty() {
                p { class: "py-16 text-center text-sm {theme::TEXT_MUTED}", "{kind.empty_message()}" }
            } else {
                if let Some(message) = inline_error {
                    p { class: "rounded-xl border border-rose-900 bg-rose-950/40 px-3 py-2 text-sm text-rose-200",
                        "{message}"
                    }
                }
                ul { class: "space-y-3",
                    for (view, load) in views.into_iter().zip(rows) {
                        li { key: "{view.id}",
                            LoadCard {
                                view,
                                onselect: move |_| {
                                    let id = load.id.clone();
                                    state.with_mut(|st| st.select_load(load.clone()));
                                    nav.push(Route::LoadDetails { id });
                                },
                            }
                        }
                    }
                }
                if activity == ListActivity::FetchingMore {
                    div { class: "flex justify-center py-4", span { class: "spinner spinner-sm" } }
                } else if has_more {
                    button {
                        class: "{theme::BTN_SECONDARY} w-full",
                        onclick: move |_| load_more(),
                        "Load more"
                    }
                }
            }
        }
    }
}
