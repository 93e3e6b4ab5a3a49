//! Load details workflow: optimistic status changes with rollback, plus the
//! delivered-load paperwork actions.
//!
//! The state machine is split into `begin_*` (synchronous, applies the
//! optimistic change and hands out a ticket) and `settle_*` (applies the
//! server's answer for that ticket). The UI calls the API between the two, so
//! nothing here is held across an await point.
//!
//! Ordering policy for overlapping status changes: the last *request* wins.
//! Each request gets a monotonically increasing sequence number and only the
//! answer to the newest request may change what the user sees. Older answers
//! are dropped, except that an older success still advances the
//! last-confirmed status, which is what a later failure rolls back to.

use tracing::{debug, info, warn};

use super::documents::{DocumentCategory, DocumentOpState, DocumentOps, UploadFile};
use super::load::{Load, LoadId, StatusAck};
use super::normalize::{resolve_status, NormalizedLoadView, ViewContext};
use super::status::{is_delivered, suggested_next, LoadStatus};
use crate::infra::api::ApiError;

pub const STATUS_UPDATED: &str = "Status updated successfully";
pub const STATUS_UPDATE_FAILED: &str = "Failed to update status";
pub const UPLOAD_FAILED: &str = "Failed to upload document";
pub const REMOVE_FAILED: &str = "Failed to remove document";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpdatePhase {
    Idle,
    Updating { target: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// User-facing result of an action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: &'static str,
    pub message: String,
}

impl Notice {
    fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: "Success",
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: "Error",
            message: message.into(),
        }
    }
}

/// A status change that has been applied locally and still awaits the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusTicket {
    pub seq: u64,
    pub load_id: LoadId,
    pub status: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Settlement {
    /// Server accepted the newest request; the optimistic value stays.
    Confirmed(Notice),
    /// Newest request failed; status is back at the last confirmed value.
    RolledBack(Notice),
    /// A newer request was issued meanwhile; no notice is due. A success is
    /// still shown when the newest request has already been rolled back.
    Superseded,
}

impl Settlement {
    pub fn notice(&self) -> Option<&Notice> {
        match self {
            Settlement::Confirmed(notice) | Settlement::RolledBack(notice) => Some(notice),
            Settlement::Superseded => None,
        }
    }
}

/// A document action in flight for one category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentTicket {
    pub load_id: LoadId,
    pub category: DocumentCategory,
    pub file_name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoadDetailsWorkflow {
    load: Load,
    confirmed_status: Option<String>,
    confirmed_seq: u64,
    issued_seq: u64,
    phase: UpdatePhase,
    menu_open: bool,
    documents: DocumentOps,
}

impl LoadDetailsWorkflow {
    pub fn new(load: Load) -> Self {
        Self {
            confirmed_status: load.status.clone(),
            load,
            confirmed_seq: 0,
            issued_seq: 0,
            phase: UpdatePhase::Idle,
            menu_open: false,
            documents: DocumentOps::default(),
        }
    }

    pub fn load(&self) -> &Load {
        &self.load
    }

    pub fn view(&self) -> NormalizedLoadView {
        NormalizedLoadView::from_load(&self.load, ViewContext::Details)
    }

    pub fn current_status(&self) -> String {
        resolve_status(&self.load, ViewContext::Details)
    }

    pub fn phase(&self) -> &UpdatePhase {
        &self.phase
    }

    pub fn is_updating(&self) -> bool {
        matches!(self.phase, UpdatePhase::Updating { .. })
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    pub fn close_menu(&mut self) {
        self.menu_open = false;
    }

    pub fn suggested_statuses(&self) -> &'static [LoadStatus] {
        suggested_next(&self.current_status())
    }

    /// Applies `status` optimistically. Returns `None` when it is already the
    /// current status, in which case nothing is sent.
    pub fn begin_status_change(&mut self, status: &str) -> Option<StatusTicket> {
        if status == self.current_status() {
            debug!(load = %self.load.id, status, "status unchanged; skipping update");
            return None;
        }
        self.issued_seq += 1;
        self.load.status = Some(status.to_string());
        self.phase = UpdatePhase::Updating {
            target: status.to_string(),
        };
        info!(load = %self.load.id, status, seq = self.issued_seq, "status change requested");
        Some(StatusTicket {
            seq: self.issued_seq,
            load_id: self.load.id.clone(),
            status: status.to_string(),
        })
    }

    pub fn settle_status_change(
        &mut self,
        ticket: &StatusTicket,
        response: Result<StatusAck, ApiError>,
    ) -> Settlement {
        let outcome = match response {
            Ok(ack) if ack.success => Ok(()),
            Ok(ack) => Err(ack
                .message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| STATUS_UPDATE_FAILED.to_string())),
            Err(error) => {
                warn!(load = %ticket.load_id, %error, "status update call failed");
                Err(error.user_message(STATUS_UPDATE_FAILED))
            }
        };

        if outcome.is_ok() && ticket.seq > self.confirmed_seq {
            self.confirmed_seq = ticket.seq;
            self.confirmed_status = Some(ticket.status.clone());
            // Newest request already failed: the server now holds this status.
            if ticket.seq != self.issued_seq && !self.is_updating() {
                self.load.status = self.confirmed_status.clone();
                info!(load = %ticket.load_id, status = %ticket.status, "late confirmation applied");
            }
        }

        if ticket.seq != self.issued_seq {
            debug!(
                load = %ticket.load_id,
                seq = ticket.seq,
                latest = self.issued_seq,
                "dropping answer to superseded status request"
            );
            return Settlement::Superseded;
        }

        self.phase = UpdatePhase::Idle;
        match outcome {
            Ok(()) => {
                self.menu_open = false;
                self.load.status = Some(ticket.status.clone());
                info!(load = %ticket.load_id, status = %ticket.status, "status confirmed");
                Settlement::Confirmed(Notice::success(STATUS_UPDATED))
            }
            Err(message) => {
                self.load.status = self.confirmed_status.clone();
                warn!(
                    load = %ticket.load_id,
                    restored = ?self.confirmed_status,
                    "status update rejected; rolled back"
                );
                Settlement::RolledBack(Notice::error(message))
            }
        }
    }

    /// Paperwork can only be attached once the load is delivered.
    pub fn documents_enabled(&self) -> bool {
        is_delivered(&self.current_status())
    }

    pub fn document_state(&self, category: DocumentCategory) -> &DocumentOpState {
        self.documents.get(category)
    }

    fn begin_document_op(
        &mut self,
        category: DocumentCategory,
        file_name: &str,
    ) -> Option<DocumentTicket> {
        if !self.documents_enabled() {
            return None;
        }
        let state = self.documents.get_mut(category);
        if state.busy {
            debug!(%category, "document action already running for category");
            return None;
        }
        state.busy = true;
        state.error = None;
        Some(DocumentTicket {
            load_id: self.load.id.clone(),
            category,
            file_name: file_name.to_string(),
        })
    }

    pub fn begin_upload(
        &mut self,
        category: DocumentCategory,
        file: &UploadFile,
    ) -> Option<DocumentTicket> {
        self.begin_document_op(category, &file.name)
    }

    /// On success the server's copy of the load replaces the local one.
    pub fn settle_upload(
        &mut self,
        ticket: &DocumentTicket,
        response: Result<Load, ApiError>,
    ) -> Notice {
        match response {
            Ok(updated) => {
                self.documents.get_mut(ticket.category).busy = false;
                self.replace_load(updated);
                Notice::success(format!("{} uploaded", ticket.category.label()))
            }
            Err(error) => {
                warn!(load = %ticket.load_id, category = %ticket.category, %error, "upload failed");
                self.fail_document_op(ticket.category, error.user_message(UPLOAD_FAILED))
            }
        }
    }

    pub fn begin_removal(
        &mut self,
        category: DocumentCategory,
        file_name: &str,
    ) -> Option<DocumentTicket> {
        self.begin_document_op(category, file_name)
    }

    /// On success the file is filtered out of the local list; the server's view
    /// of the load is not re-read.
    pub fn settle_removal(
        &mut self,
        ticket: &DocumentTicket,
        response: Result<(), ApiError>,
    ) -> Notice {
        match response {
            Ok(()) => {
                self.documents.get_mut(ticket.category).busy = false;
                self.load
                    .documents_mut(ticket.category)
                    .retain(|file| file.name() != ticket.file_name);
                Notice::success(format!("{} removed", ticket.file_name))
            }
            Err(error) => {
                warn!(load = %ticket.load_id, category = %ticket.category, %error, "removal failed");
                self.fail_document_op(ticket.category, error.user_message(REMOVE_FAILED))
            }
        }
    }

    fn fail_document_op(&mut self, category: DocumentCategory, message: String) -> Notice {
        let state = self.documents.get_mut(category);
        state.busy = false;
        state.error = Some(message.clone());
        Notice::error(message)
    }

    /// Adopts a server-provided record. Its status becomes the rollback
    /// target; a status change still in flight stays visible and settles
    /// on its own.
    pub fn replace_load(&mut self, load: Load) {
        self.confirmed_status = load.status.clone();
        let pending = match &self.phase {
            UpdatePhase::Updating { target } => Some(target.clone()),
            UpdatePhase::Idle => None,
        };
        self.load = load;
        if let Some(target) = pending {
            self.load.status = Some(target);
        }
    }
}
