use dioxus::prelude::*;
use tracing::warn;

use crate::domain::{DocumentCategory, DocumentFile, DocumentOpState, UploadFile};
use crate::ui::theme;

/// Files of one category with add/remove controls. Proof of delivery also
/// offers a camera capture input.
#[component]
pub fn DocumentSection(
    category: DocumentCategory,
    files: Vec<DocumentFile>,
    op: DocumentOpState,
    on_upload: EventHandler<UploadFile>,
    on_remove: EventHandler<String>,
) -> Element {
    let picker_id = format!("doc-{}", category.wire_name());
    let camera_id = format!("cam-{}", category.wire_name());
    let offers_camera = category == DocumentCategory::ProofOfDelivery;

    let read_selection = move |evt: FormEvent| async move {
        for file in evt.files() {
            let name = file.name();
            match file.read_bytes().await {
                Ok(bytes) => {
                    on_upload.call(UploadFile::new(name, file.content_type(), bytes.to_vec()))
                }
                Err(err) => warn!(file = %name, %err, "could not read picked file"),
            }
        }
    };

    rsx! {
        div { class: "{theme::PANEL} space-y-3",
            div { class: "flex items-center justify-between",
                h3 { class: "text-sm font-semibold text-slate-100", "{category.label()}" }
                if op.busy {
                    span { class: "spinner spinner-sm" }
                }
            }

            if files.is_empty() {
                p { class: "text-sm {theme::TEXT_MUTED}", "No documents uploaded." }
            } else {
                ul { class: "divide-y divide-slate-800",
                    for file in files {
                        DocumentRow {
                            key: "{file.name()}",
                            file: file.clone(),
                            disabled: op.busy,
                            on_remove,
                        }
                    }
                }
            }

            if let Some(error) = op.error.as_ref() {
                p { class: theme::FIELD_ERROR, "{error}" }
            }

            div { class: "flex gap-2",
                label {
                    class: "{theme::BTN_SECONDARY} cursor-pointer",
                    r#for: "{picker_id}",
                    "Add file"
                }
                input {
                    id: "{picker_id}",
                    class: "visually-hidden",
                    r#type: "file",
                    accept: "image/*,application/pdf",
                    disabled: op.busy,
                    onchange: read_selection,
                }
                if offers_camera {
                    label {
                        class: "{theme::BTN_SECONDARY} cursor-pointer",
                        r#for: "{camera_id}",
                        "Take photo"
                    }
                    input {
                        id: "{camera_id}",
                        class: "visually-hidden",
                        r#type: "file",
                        accept: "image/*",
                        "capture": "environment",
                        disabled: op.busy,
                        onchange: read_selection,
                    }
                }
            }
        }
    }
}

#[component]
fn DocumentRow(file: DocumentFile, disabled: bool, on_remove: EventHandler<String>) -> Element {
    let name = file.name().to_string();
    let display = file.display_name().to_string();

    rsx! {
        li { class: "flex items-center justify-between gap-3 py-2 text-sm",
            if let Some(url) = file.url() {
                a {
                    class: "truncate text-sky-300 hover:text-sky-100",
                    href: "{url}",
                    target: "_blank",
                    rel: "noreferrer",
                    "{display}"
                }
            } else {
                span { class: "truncate text-slate-200", "{display}" }
            }
            button {
                class: theme::BTN_ICON,
                disabled,
                onclick: move |_| on_remove.call(name.clone()),
                "Remove"
            }
        }
    }
}
