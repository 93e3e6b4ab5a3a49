//! In-memory [`LoadApi`] used by the workflow tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::sync::Mutex;

use super::api::{ApiError, LoadApi};
use crate::domain::{DocumentCategory, Load, LoadPage, NewAccount, Session, StatusAck, UploadFile};

/// Scripted reply for the next status update.
#[derive(Clone, Debug)]
pub enum StatusReply {
    Accept,
    Reject(Option<String>),
    TransportError,
}

#[derive(Default)]
pub struct FakeLoadApi {
    pub active_pages: Mutex<HashMap<u32, LoadPage>>,
    pub invoice_pages: Mutex<HashMap<u32, LoadPage>>,
    pub status_replies: Mutex<VecDeque<StatusReply>>,
    pub status_calls: Mutex<Vec<(String, String)>>,
    pub page_calls: Mutex<Vec<u32>>,
    pub uploaded: Mutex<Vec<(String, DocumentCategory, String)>>,
    pub removed: Mutex<Vec<(String, DocumentCategory, String)>>,
    pub upload_result: Mutex<Option<Load>>,
    pub fail_documents: AtomicBool,
}

impl FakeLoadApi {
    pub async fn with_active_page(self, page: u32, loads: Vec<Load>, total_pages: u32) -> Self {
        self.active_pages.lock().await.insert(
            page,
            LoadPage {
                loads,
                current_page: page,
                total_pages,
            },
        );
        self
    }

    pub async fn with_invoice_page(self, page: u32, loads: Vec<Load>, total_pages: u32) -> Self {
        self.invoice_pages.lock().await.insert(
            page,
            LoadPage {
                loads,
                current_page: page,
                total_pages,
            },
        );
        self
    }

    pub async fn reply_to_status(&self, reply: StatusReply) {
        self.status_replies.lock().await.push_back(reply);
    }

    pub async fn status_call_count(&self) -> usize {
        self.status_calls.lock().await.len()
    }

    fn transport_error() -> ApiError {
        ApiError::Status {
            status: StatusCode::BAD_GATEWAY,
            message: None,
        }
    }
}

#[async_trait]
impl LoadApi for FakeLoadApi {
    // Screens drive auth against the real client; the workflows never do.
    async fn login(&self, _email: &str, _password: &str) -> Result<Session, ApiError> {
        Err(ApiError::AuthenticationFailed)
    }

    async fn register(&self, _account: &NewAccount) -> Result<Session, ApiError> {
        Err(ApiError::AuthenticationFailed)
    }

    async fn forgot_password(&self, _email: &str) -> Result<(), ApiError> {
        Ok(())
    }

    async fn reset_password(&self, _token: &str, _password: &str) -> Result<(), ApiError> {
        Ok(())
    }

    async fn get_active_loads(&self, page: u32) -> Result<LoadPage, ApiError> {
        self.page_calls.lock().await.push(page);
        self.active_pages
            .lock()
            .await
            .get(&page)
            .cloned()
            .ok_or_else(Self::transport_error)
    }

    async fn get_invoice_loads(&self, page: u32, _limit: u32) -> Result<LoadPage, ApiError> {
        self.page_calls.lock().await.push(page);
        self.invoice_pages
            .lock()
            .await
            .get(&page)
            .cloned()
            .ok_or_else(Self::transport_error)
    }

    async fn update_load_status(&self, load_id: &str, status: &str) -> Result<StatusAck, ApiError> {
        self.status_calls
            .lock()
            .await
            .push((load_id.to_string(), status.to_string()));
        let reply = self
            .status_replies
            .lock()
            .await
            .pop_front()
            .unwrap_or(StatusReply::Accept);
        match reply {
            StatusReply::Accept => Ok(StatusAck {
                success: true,
                message: None,
            }),
            StatusReply::Reject(message) => Ok(StatusAck {
                success: false,
                message,
            }),
            StatusReply::TransportError => Err(Self::transport_error()),
        }
    }

    async fn upload_load_document(
        &self,
        load_id: &str,
        category: DocumentCategory,
        file: &UploadFile,
    ) -> Result<Load, ApiError> {
        if self.fail_documents.load(Ordering::Relaxed) {
            return Err(Self::transport_error());
        }
        self.uploaded
            .lock()
            .await
            .push((load_id.to_string(), category, file.name.clone()));
        self.upload_result
            .lock()
            .await
            .clone()
            .ok_or_else(Self::transport_error)
    }

    async fn remove_load_document(
        &self,
        load_id: &str,
        category: DocumentCategory,
        file_name: &str,
    ) -> Result<(), ApiError> {
        if self.fail_documents.load(Ordering::Relaxed) {
            return Err(ApiError::Rejected("Document is locked".into()));
        }
        self.removed
            .lock()
            .await
            .push((load_id.to_string(), category, file_name.to_string()));
        Ok(())
    }
}
