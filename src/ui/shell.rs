use dioxus::prelude::*;

use crate::app::Route;
use crate::domain::AppState;
use crate::ui::theme;
use crate::util::version::APP_NAME;

/// Frame of every signed-in screen: header and bottom tab bar.
#[component]
pub fn Shell(children: Element) -> Element {
    let state = use_context::<Signal<AppState>>();
    let current_route = use_route::<Route>();
    let nav = use_navigator();

    let signed_in = state.with(|s| s.is_signed_in());
    use_effect(move || {
        if !state.read().is_signed_in() {
            nav.replace(Route::Login {});
        }
    });

    if !signed_in {
        return rsx! { Fragment {} };
    }

    let on_loads = matches!(current_route, Route::ActiveLoads {} | Route::LoadDetails { .. });

    rsx! {
        div { class: "app-shell bg-slate-950 text-slate-100",
            header { class: "border-b border-slate-900 bg-slate-950/90 px-4 py-3 backdrop-blur",
                h1 { class: "text-lg font-semibold tracking-tight text-sky-200", "{APP_NAME}" }
            }
            main { class: "app-content mx-auto w-full max-w-xl px-4 py-4",
                {children}
            }
            nav { class: "tab-bar",
                TabButton {
                    active: on_loads,
                    onclick: move |_| { nav.push(Route::ActiveLoads {}); },
                    icon: "🚚",
                    label: "Active",
                }
                TabButton {
                    active: matches!(current_route, Route::DeliveredLoads {}),
                    onclick: move |_| { nav.push(Route::DeliveredLoads {}); },
                    icon: "📦",
                    label: "Delivered",
                }
                TabButton {
                    active: matches!(current_route, Route::Account {}),
                    onclick: move |_| { nav.push(Route::Account {}); },
                    icon: "👤",
                    label: "Account",
                }
            }
        }
    }
}

#[component]
fn TabButton(
    active: bool,
    onclick: EventHandler<()>,
    icon: &'static str,
    label: &'static str,
) -> Element {
    rsx! {
        button {
            class: theme::tab_button(active),
            onclick: move |_| onclick.call(()),
            span { class: "text-lg", "{icon}" }
            span { "{label}" }
        }
    }
}
