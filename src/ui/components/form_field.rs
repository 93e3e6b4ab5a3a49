use dioxus::prelude::*;

use crate::ui::theme;

/// Labeled input with an optional validation message underneath.
#[component]
pub fn FormField(
    label: &'static str,
    value: String,
    oninput: EventHandler<String>,
    #[props(default = "text")] input_type: &'static str,
    #[props(default)] placeholder: &'static str,
    #[props(default)] autocomplete: &'static str,
    error: Option<String>,
) -> Element {
    rsx! {
        div {
            label { class: theme::LABEL, "{label}" }
            input {
                class: theme::input_class(error.is_some()),
                r#type: input_type,
                value,
                placeholder,
                autocomplete,
                oninput: move |evt| oninput.call(evt.value()),
            }
            if let Some(message) = error.as_deref() {
                p { class: theme::FIELD_ERROR, "{message}" }
            }
        }
    }
}
