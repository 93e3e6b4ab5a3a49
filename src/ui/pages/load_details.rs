use dioxus::prelude::*;

use crate::{
    app::{session_client, sign_out, Route},
    domain::{
        AddressBlock, AppState, DocumentCategory, DocumentFile, DocumentOpState, Load,
        LoadDetailsWorkflow, LoadStatus, UploadFile,
    },
    infra::api::{FreightClient, LoadApi},
    ui::{
        components::{
            document_section::DocumentSection,
            status_badge::StatusBadge,
            toast::{push_notice, ToastMessage},
        },
        theme,
    },
};

#[component]
pub fn LoadDetailsPage(id: String) -> Element {
    let state = use_context::<Signal<AppState>>();
    let nav = use_navigator();
    let selected = state.with(|st| st.selected(&id).cloned());

    match selected {
        Some(load) => rsx! { LoadDetailsView { key: "{id}", load } },
        None => rsx! {
            div { class: "{theme::PANEL} text-center",
                p { class: "text-sm text-slate-300", "This load is no longer available." }
                button {
                    class: "{theme::BTN_SECONDARY} mt-3",
                    onclick: move |_| { nav.replace(Route::ActiveLoads {}); },
                    "Back to loads"
                }
            }
        },
    }
}

#[component]
fn LoadDetailsView(load: Load) -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let client = use_context::<FreightClient>();
    let nav = use_navigator();

    let mut workflow = use_signal(|| LoadDetailsWorkflow::new(load.clone()));

    // Push the workflow's copy back so the list hand-off stays current.
    let mut sync_selection = move |unauthorized: bool| {
        if unauthorized {
            sign_out(&mut state);
            return;
        }
        let current = workflow.peek().load().clone();
        state.with_mut(|st| st.update_selected(&current));
    };

    let change_status = use_callback({
        let client = client.clone();
        move |code: &'static str| {
            let Some(ticket) = workflow.with_mut(|wf| wf.begin_status_change(code)) else {
                workflow.with_mut(|wf| wf.close_menu());
                return;
            };
            let api = session_client(&client, &state);
            spawn(async move {
                let response = api.update_load_status(&ticket.load_id, &ticket.status).await;
                let unauthorized = matches!(&response, Err(err) if err.is_unauthorized());
                let settlement = workflow.with_mut(|wf| wf.settle_status_change(&ticket, response));
                if let Some(notice) = settlement.notice() {
                    push_notice(toasts, notice);
                }
                sync_selection(unauthorized);
            });
        }
    });

    let upload = use_callback({
        let client = client.clone();
        move |(category, file): (DocumentCategory, UploadFile)| {
            let Some(ticket) = workflow.with_mut(|wf| wf.begin_upload(category, &file)) else {
                return;
            };
            let api = session_client(&client, &state);
            spawn(async move {
                let response = api
                    .upload_load_document(&ticket.load_id, category, &file)
                    .await;
                let unauthorized = matches!(&response, Err(err) if err.is_unauthorized());
                let notice = workflow.with_mut(|wf| wf.settle_upload(&ticket, response));
                push_notice(toasts, &notice);
                sync_selection(unauthorized);
            });
        }
    });

    let remove = use_callback(move |(category, name): (DocumentCategory, String)| {
        let Some(ticket) = workflow.with_mut(|wf| wf.begin_removal(category, &name)) else {
            return;
        };
        let api = session_client(&client, &state);
        spawn(async move {
            let response = api
                .remove_load_document(&ticket.load_id, category, &ticket.file_name)
                .await;
            let unauthorized = matches!(&response, Err(err) if err.is_unauthorized());
            let notice = workflow.with_mut(|wf| wf.settle_removal(&ticket, response));
            push_notice(toasts, &notice);
            sync_selection(unauthorized);
        });
    });

    let wf = workflow.read();
    let view = wf.view();
    let status = wf.current_status();
    let updating = wf.is_updating();
    let menu_open = wf.menu_open();
    let suggestions = wf.suggested_statuses();
    let terminal = LoadStatus::from_code(&status).is_some_and(|s| s.is_terminal());
    let documents_enabled = wf.documents_enabled();
    let sections: Vec<(DocumentCategory, Vec<DocumentFile>, DocumentOpState)> =
        DocumentCategory::ALL
            .into_iter()
            .map(|category| {
                (
                    category,
                    wf.load().documents(category).to_vec(),
                    wf.document_state(category).clone(),
                )
            })
            .collect();
    drop(wf);

    rsx! {
        div { class: "space-y-4",
            button {
                class: theme::BTN_LINK,
                onclick: move |_| nav.go_back(),
                "← Back"
            }

            section { class: theme::PANEL,
                div { class: "flex items-start justify-between gap-3",
                    div {
                        p { class: "text-xs {theme::TEXT_MUTED}", "Load" }
                        h2 { class: "text-xl font-semibold", "#{view.heading_number}" }
                    }
                    button {
                        class: "flex items-center gap-1",
                        onclick: move |_| workflow.with_mut(|wf| wf.toggle_menu()),
                        StatusBadge { status: status.clone(), updating }
                        span { class: "text-xs text-slate-500", "▾" }
                    }
                }
                if menu_open {
                    ul { class: "status-menu mt-3 space-y-1 rounded-xl border border-slate-800 bg-slate-950 p-1",
                        for option in LoadStatus::MENU_ORDER {
                            li { key: "{option.code()}",
                                button {
                                    class: theme::status_option(option.code() == status),
                                    onclick: move |_| change_status.call(option.code()),
                                    span { "{option.label()}" }
                                    if option.code() == status {
                                        span { "✓" }
                                    }
                                }
                            }
                        }
                    }
                }
                if !suggestions.is_empty() {
                    div { class: "mt-4",
                        p { class: theme::LABEL, "Next step" }
                        div { class: "mt-2 flex flex-wrap gap-2",
                            for next in suggestions.iter().copied() {
                                button {
                                    key: "{next.code()}",
                                    class: theme::BTN_PRIMARY,
                                    onclick: move |_| change_status.call(next.code()),
                                    "{next.label()}"
                                }
                            }
                        }
                    }
                } else if terminal {
                    p { class: "mt-4 text-sm {theme::TEXT_MUTED}", "This load has reached its final status." }
                }
            }

            section { class: "{theme::PANEL} space-y-3",
                h3 { class: theme::PANEL_TITLE, "Route" }
                p { class: "text-base font-semibold",
                    "{view.origin_label()} → {view.destination_label()}"
                }
                div { class: "grid gap-3 sm:grid-cols-2",
                    AddressCard { title: "Pickup", block: view.pickup_address.clone() }
                    AddressCard { title: "Delivery", block: view.drop_address.clone() }
                }
            }

            section { class: "{theme::PANEL} grid grid-cols-2 gap-3",
                h3 { class: "{theme::PANEL_TITLE} col-span-2", "Schedule" }
                Detail { label: "Pickup", value: view.pickup_date.clone() }
                Detail { label: "Delivery", value: view.delivery_date.clone() }
            }

            section { class: "{theme::PANEL} grid grid-cols-2 gap-3",
                h3 { class: "{theme::PANEL_TITLE} col-span-2", "Details" }
                for (label, value) in view.detail_rows() {
                    Detail { key: "{label}", label, value }
                }
            }

            section { class: "space-y-3",
                h3 { class: theme::PANEL_TITLE, "Documents" }
                if documents_enabled {
                    for (category, files, op) in sections {
                        DocumentSection {
                            key: "{category.wire_name()}",
                            category,
                            files,
                            op,
                            on_upload: move |file| upload.call((category, file)),
                            on_remove: move |name| remove.call((category, name)),
                        }
                    }
                } else {
                    p { class: "{theme::PANEL} text-sm {theme::TEXT_MUTED}",
                        "Paperwork can be added once the load is delivered."
                    }
                }
            }
        }
    }
}

#[component]
fn Detail(label: &'static str, value: String) -> Element {
    rsx! {
        div {
            p { class: theme::LABEL, "{label}" }
            p { class: "mt-0.5 text-sm text-slate-200", "{value}" }
        }
    }
}

#[component]
fn AddressCard(title: &'static str, block: Option<AddressBlock>) -> Element {
    rsx! {
        div { class: "rounded-xl border border-slate-800 p-3",
            p { class: theme::LABEL, "{title}" }
            if let Some(block) = block {
                if !block.name.is_empty() {
                    p { class: "mt-1 text-sm font-semibold", "{block.name}" }
                }
                if !block.street.is_empty() {
                    p { class: "text-sm text-slate-300", "{block.street}" }
                }
                p { class: "text-sm text-slate-300", "{block.city_state_zip}" }
            } else {
                p { class: "mt-1 text-sm {theme::TEXT_MUTED}", "—" }
            }
        }
    }
}
