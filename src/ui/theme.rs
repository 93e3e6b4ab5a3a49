//! Shared class strings so screens stay visually consistent.

use crate::domain::StatusColor;

// ============================================
// BUTTON STYLES
// ============================================

pub const BTN_PRIMARY: &str = "w-full rounded-xl bg-sky-500 px-4 py-3 text-sm font-semibold text-white hover:bg-sky-400 disabled:opacity-50";
pub const BTN_SECONDARY: &str = "rounded-xl border border-slate-700 px-4 py-2.5 text-sm font-semibold text-slate-200 hover:bg-slate-800 disabled:opacity-50";
pub const BTN_DANGER: &str = "rounded-xl border border-rose-500/40 px-4 py-2.5 text-sm font-semibold text-rose-200 hover:bg-rose-500/10";
pub const BTN_LINK: &str = "text-sm font-semibold text-sky-300 hover:text-sky-100";
pub const BTN_ICON: &str = "rounded-lg px-2 py-1 text-xs text-slate-400 hover:bg-slate-800 hover:text-slate-100 disabled:opacity-40";

// ============================================
// INPUT STYLES
// ============================================

pub fn input_class(has_error: bool) -> &'static str {
    if has_error {
        "mt-1 w-full rounded-xl border border-rose-500/60 bg-slate-950 px-4 py-3 text-sm text-slate-100 focus:border-rose-400 focus:outline-none"
    } else {
        "mt-1 w-full rounded-xl border border-slate-700 bg-slate-950 px-4 py-3 text-sm text-slate-100 focus:border-sky-500 focus:outline-none"
    }
}

pub const LABEL: &str = "block text-xs font-semibold uppercase tracking-wide text-slate-500";
pub const FIELD_ERROR: &str = "mt-1 text-xs text-rose-300";

// ============================================
// PANELS
// ============================================

pub const PANEL: &str = "rounded-2xl border border-slate-800 bg-slate-900/50 p-4";
pub const PANEL_TITLE: &str = "text-xs font-semibold uppercase tracking-wide text-slate-500";
pub const TEXT_MUTED: &str = "text-slate-500";

// ============================================
// STATUS
// ============================================

pub fn status_badge(color: StatusColor) -> &'static str {
    match color {
        StatusColor::Primary => "border-sky-500/40 bg-sky-500/10 text-sky-200",
        StatusColor::Success => "border-emerald-500/40 bg-emerald-500/10 text-emerald-200",
        StatusColor::Warning => "border-amber-500/40 bg-amber-500/10 text-amber-200",
        StatusColor::Secondary => "border-slate-600/60 bg-slate-700/40 text-slate-300",
    }
}

pub fn status_option(active: bool) -> &'static str {
    if active {
        "flex w-full items-center justify-between rounded-xl bg-sky-500/15 px-4 py-3 text-left text-sm font-semibold text-sky-200"
    } else {
        "flex w-full items-center justify-between rounded-xl px-4 py-3 text-left text-sm text-slate-200 hover:bg-slate-800"
    }
}

pub fn tab_button(active: bool) -> &'static str {
    if active {
        "flex flex-col items-center gap-1 py-2 text-xs font-semibold text-sky-300"
    } else {
        "flex flex-col items-center gap-1 py-2 text-xs text-slate-500 hover:text-slate-300"
    }
}
