use dioxus::prelude::*;

use crate::domain::status::{status_color, status_label};
use crate::ui::theme;

#[component]
pub fn StatusBadge(status: String, #[props(default)] updating: bool) -> Element {
    let color = theme::status_badge(status_color(&status));
    let label = status_label(&status);

    rsx! {
        span {
            class: "inline-flex items-center gap-2 rounded-full border px-3 py-1 text-xs font-semibold {color}",
            if updating {
                span { class: "spinner spinner-sm" }
            }
            "{label}"
        }
    }
}
