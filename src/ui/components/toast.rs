use std::time::Duration;

use dioxus::prelude::*;

use crate::domain::{Notice, NoticeKind};
use crate::util::generate_id;

const TOAST_AUTO_DISMISS: Duration = Duration::from_secs(4);
const MAX_TOASTS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

impl From<NoticeKind> for ToastKind {
    fn from(kind: NoticeKind) -> Self {
        match kind {
            NoticeKind::Success => ToastKind::Success,
            NoticeKind::Error => ToastKind::Error,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ToastMessage {
    pub id: String,
    pub kind: ToastKind,
    pub title: Option<String>,
    pub text: String,
}

impl ToastMessage {
    pub fn new(kind: ToastKind, text: impl Into<String>) -> Self {
        Self {
            id: generate_id("toast"),
            kind,
            title: None,
            text: text.into(),
        }
    }
}

pub fn push_toast(
    toasts: Signal<Vec<ToastMessage>>,
    kind: ToastKind,
    message: impl Into<String>,
) {
    push_message(toasts, ToastMessage::new(kind, message));
}

/// Shows the outcome of a workflow action.
pub fn push_notice(toasts: Signal<Vec<ToastMessage>>, notice: &Notice) {
    let mut message = ToastMessage::new(notice.kind.into(), notice.message.clone());
    message.title = Some(notice.title.to_string());
    push_message(toasts, message);
}

fn push_message(mut toasts: Signal<Vec<ToastMessage>>, message: ToastMessage) {
    toasts.with_mut(|entries| {
        if entries.len() >= MAX_TOASTS {
            entries.remove(0);
        }
        entries.push(message);
    });
}

#[component]
pub fn Toast() -> Element {
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let entries = toasts();

    if entries.is_empty() {
        return rsx! { Fragment {} };
    }

    rsx! {
        div {
            class: "pointer-events-none fixed inset-x-0 top-3 z-50 flex justify-center px-4",
            style: "padding-top: var(--safe-top);",
            ul {
                class: "w-full max-w-md space-y-2",
                for message in entries {
                    ToastCard { key: "{message.id}", message, toasts }
                }
            }
        }
    }
}

#[component]
fn ToastCard(message: ToastMessage, mut toasts: Signal<Vec<ToastMessage>>) -> Element {
    let toast_id = message.id.clone();
    let _auto_dismiss = use_future(move || {
        let id = toast_id.clone();
        async move {
            tokio::time::sleep(TOAST_AUTO_DISMISS).await;
            toasts.with_mut(|items| items.retain(|toast| toast.id != id));
        }
    });

    let theme = match message.kind {
        ToastKind::Info => "border-sky-500/40 bg-slate-900/95 text-sky-100",
        ToastKind::Success => "border-emerald-500/40 bg-slate-900/95 text-emerald-100",
        ToastKind::Error => "border-rose-500/40 bg-slate-900/95 text-rose-100",
    };
    let id = message.id.clone();

    rsx! {
        li {
            class: "pointer-events-auto rounded-2xl border px-4 py-3 shadow-lg {theme}",
            onclick: move |_| {
                let target = id.clone();
                toasts.with_mut(|items| items.retain(|toast| toast.id != target));
            },
            if let Some(title) = message.title.as_ref() {
                p { class: "text-sm font-semibold", "{title}" }
            }
            p { class: "text-sm", "{message.text}" }
        }
    }
}
