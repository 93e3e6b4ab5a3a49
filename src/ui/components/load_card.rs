use dioxus::prelude::*;

use crate::domain::NormalizedLoadView;
use crate::ui::{components::status_badge::StatusBadge, theme};

#[component]
pub fn LoadCard(view: NormalizedLoadView, onselect: EventHandler<()>) -> Element {
    rsx! {
        button {
            class: "{theme::PANEL} block w-full text-left transition hover:border-sky-700/60",
            onclick: move |_| onselect.call(()),
            div { class: "flex items-start justify-between gap-3",
                div {
                    p { class: "text-xs {theme::TEXT_MUTED}", "Load #{view.heading_number}" }
                    p { class: "mt-1 text-base font-semibold text-slate-100",
                        "{view.origin_label()} → {view.destination_label()}"
                    }
                }
                StatusBadge { status: view.status.clone() }
            }
            div { class: "mt-3 grid grid-cols-2 gap-2 text-sm",
                div {
                    p { class: theme::LABEL, "Pickup" }
                    p { class: "text-slate-200", "{view.pickup_date}" }
                }
                div {
                    p { class: theme::LABEL, "Delivery" }
                    p { class: "text-slate-200", "{view.delivery_date}" }
                }
                div {
                    p { class: theme::LABEL, "Equipment" }
                    p { class: "text-slate-200", "{view.equipment}" }
                }
                div {
                    p { class: theme::LABEL, "Rate" }
                    p { class: "font-semibold text-emerald-300", "{view.price_display}" }
                }
            }
        }
    }
}
