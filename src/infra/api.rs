//! Thin asynchronous client for the FreightDok REST API.
//!
//! - [`LoadApi`] is the seam the screens and workflows talk to.
//! - [`FreightClient`] implements it over `reqwest`; the auth token comes from
//!   an explicit [`Session`] rather than ambient storage.

use async_trait::async_trait;
use reqwest::{multipart, Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{
    load::{lenient, lenient_number, lenient_text},
    DocumentCategory, Load, LoadPage, NewAccount, Session, StatusAck, UploadFile, UserProfile,
};
use crate::util::config::AppConfig;

const USER_AGENT: &str = concat!("freight-load-tracker/", env!("CARGO_PKG_VERSION"));
const AUTH_HEADER: &str = "x-auth-token";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("session expired")]
    Unauthorized,
    #[error("request failed with status {status}")]
    Status {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("{0}")]
    Rejected(String),
    #[error("Authentication failed")]
    AuthenticationFailed,
}

impl ApiError {
    /// Message to show the user: whatever the server said, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Rejected(message) => message.clone(),
            ApiError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
            ApiError::AuthenticationFailed => "Authentication failed".to_string(),
            _ => fallback.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

/// Calls the load-tracking screens make against the backend.
#[async_trait]
pub trait LoadApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError>;

    async fn register(&self, account: &NewAccount) -> Result<Session, ApiError>;

    async fn forgot_password(&self, email: &str) -> Result<(), ApiError>;

    async fn reset_password(&self, token: &str, password: &str) -> Result<(), ApiError>;

    async fn get_active_loads(&self, page: u32) -> Result<LoadPage, ApiError>;

    async fn get_invoice_loads(&self, page: u32, limit: u32) -> Result<LoadPage, ApiError>;

    async fn update_load_status(&self, load_id: &str, status: &str) -> Result<StatusAck, ApiError>;

    async fn upload_load_document(
        &self,
        load_id: &str,
        category: DocumentCategory,
        file: &UploadFile,
    ) -> Result<Load, ApiError>;

    async fn remove_load_document(
        &self,
        load_id: &str,
        category: DocumentCategory,
        file_name: &str,
    ) -> Result<(), ApiError>;
}

#[derive(Clone)]
pub struct FreightClient {
    http: Client,
    base_url: Url,
    page_limit: u32,
    token: Option<String>,
}

impl FreightClient {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url: config.api_url.clone(),
            page_limit: config.page_limit,
            token: None,
        })
    }

    /// Same client, authenticated as `session`.
    pub fn with_session(&self, session: Option<&Session>) -> Self {
        Self {
            token: session.map(|s| s.token.clone()),
            ..self.clone()
        }
    }

    fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, path = url.path(), authenticated = self.token.is_some(), "api request");
        let builder = self.http.request(method, url);
        match self.token.as_deref() {
            Some(token) => builder.header(AUTH_HEADER, token),
            None => builder,
        }
    }

    /// Sends the request and maps 401 and other non-2xx statuses to errors,
    /// keeping any `message` the server put in the body.
    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), path = response.url().path(), "api response");

        if status == StatusCode::UNAUTHORIZED {
            warn!("api rejected the session token");
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            let message = response
                .json::<MessageBody>()
                .await
                .ok()
                .and_then(|body| body.message);
            return Err(ApiError::Status { status, message });
        }
        Ok(response)
    }

    async fn send_json<T>(&self, builder: RequestBuilder) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        Ok(self.send(builder).await?.json::<T>().await?)
    }

    async fn post_auth(&self, path: &str, body: serde_json::Value) -> Result<Response, ApiError> {
        let url = self.url(path)?;
        // A 401 here means bad credentials, not an expired session.
        match self.send(self.request(Method::POST, url).json(&body)).await {
            Err(ApiError::Unauthorized) => Err(ApiError::AuthenticationFailed),
            other => other,
        }
    }

    async fn session_from(response: Response) -> Result<Session, ApiError> {
        let payload: AuthResponse = response.json().await?;
        let token = payload
            .token
            .filter(|token| !token.is_empty())
            .ok_or(ApiError::AuthenticationFailed)?;
        Ok(Session::new(token, payload.user))
    }
}

#[async_trait]
impl LoadApi for FreightClient {
    async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let response = self
            .post_auth("api/auth", json!({ "email": email, "password": password }))
            .await
            .map_err(|err| match err {
                ApiError::Status { .. } => ApiError::AuthenticationFailed,
                other => other,
            })?;
        if response.status() != StatusCode::OK {
            return Err(ApiError::AuthenticationFailed);
        }
        let session = Self::session_from(response).await?;
        info!(user = %session.user.id, "signed in");
        Ok(session)
    }

    async fn register(&self, account: &NewAccount) -> Result<Session, ApiError> {
        let response = self
            .post_auth(
                "api/auth/register",
                json!({
                    "firstName": account.first_name.trim(),
                    "lastName": account.last_name.trim(),
                    "email": account.email.trim(),
                    "password": account.password,
                }),
            )
            .await?;
        let session = Self::session_from(response).await?;
        info!(user = %session.user.id, "registered");
        Ok(session)
    }

    async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        let url = self.url("api/auth/forgot-password")?;
        self.send(self.request(Method::POST, url).json(&json!({ "email": email })))
            .await?;
        Ok(())
    }

    async fn reset_password(&self, token: &str, password: &str) -> Result<(), ApiError> {
        let url = self.url("api/auth/reset-password")?;
        self.send(
            self.request(Method::POST, url)
                .json(&json!({ "token": token, "password": password })),
        )
        .await?;
        Ok(())
    }

    async fn get_active_loads(&self, page: u32) -> Result<LoadPage, ApiError> {
        let mut url = self.url("api/load/me")?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("limit", &self.page_limit.to_string());

        let body: ActiveLoadsBody = self.send_json(self.request(Method::GET, url)).await?;
        let result = LoadPage {
            loads: body.load,
            current_page: positive_or(body.current_page, page),
            total_pages: positive_or(body.total_pages, 1),
        };
        info!(
            page = result.current_page,
            total_pages = result.total_pages,
            count = result.loads.len(),
            "fetched active loads"
        );
        Ok(result)
    }

    async fn get_invoice_loads(&self, page: u32, limit: u32) -> Result<LoadPage, ApiError> {
        let mut url = self.url("api/load/invoice_loads")?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("limit", &limit.to_string());

        let body: InvoiceLoadsBody = self.send_json(self.request(Method::GET, url)).await?;
        let result = LoadPage {
            loads: body.loads,
            current_page: positive_or(body.page, page),
            total_pages: positive_or(body.total_pages, 1),
        };
        info!(
            page = result.current_page,
            total_pages = result.total_pages,
            count = result.loads.len(),
            "fetched delivered loads"
        );
        Ok(result)
    }

    async fn update_load_status(&self, load_id: &str, status: &str) -> Result<StatusAck, ApiError> {
        let url = self.url("api/load/modify")?;
        let form = multipart::Form::new()
            .text("_id", load_id.to_string())
            .text("status", status.to_string());

        let ack: StatusAck = self
            .send_json(self.request(Method::PATCH, url).multipart(form))
            .await?;
        info!(load = load_id, status, success = ack.success, "status update answered");
        Ok(ack)
    }

    async fn upload_load_document(
        &self,
        load_id: &str,
        category: DocumentCategory,
        file: &UploadFile,
    ) -> Result<Load, ApiError> {
        let url = self.url(&format!(
            "api/load/upload/load/{load_id}/{}",
            category.wire_name()
        ))?;
        let part = multipart::Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)?;
        let form = multipart::Form::new().part(category.wire_name(), part);

        let load: Load = self
            .send_json(self.request(Method::PATCH, url).multipart(form))
            .await?;
        info!(load = load_id, %category, file = %file.name, "document uploaded");
        Ok(load)
    }

    async fn remove_load_document(
        &self,
        load_id: &str,
        category: DocumentCategory,
        file_name: &str,
    ) -> Result<(), ApiError> {
        let mut url = self.url(&format!(
            "api/load/remove/doc/{load_id}/{}",
            category.wire_name()
        ))?;
        url.query_pairs_mut().append_pair("doc_name", file_name);

        self.send(self.request(Method::DELETE, url)).await?;
        info!(load = load_id, %category, file = file_name, "document removed");
        Ok(())
    }
}

fn positive_or(value: Option<f64>, fallback: u32) -> u32 {
    value
        .filter(|v| v.is_finite() && *v >= 1.0)
        .map(|v| v as u32)
        .unwrap_or(fallback)
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    #[serde(default, deserialize_with = "lenient_text")]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default, deserialize_with = "lenient_text")]
    token: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    user: UserProfile,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActiveLoadsBody {
    #[serde(default, deserialize_with = "lenient")]
    load: Vec<Load>,
    #[serde(default, deserialize_with = "lenient_number")]
    current_page: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    total_pages: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvoiceLoadsBody {
    #[serde(default, deserialize_with = "lenient")]
    loads: Vec<Load>,
    #[serde(default, deserialize_with = "lenient_number")]
    page: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    total_pages: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answers one request with `status_line` and a JSON `body`, returning a
    /// client pointed at it.
    async fn answer_once(status_line: &'static str, body: &'static str) -> FreightClient {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        let mut config = AppConfig::built_in().unwrap();
        config.api_url = Url::parse(&format!("http://{addr}/")).unwrap();
        FreightClient::new(&config).unwrap()
    }

    // Reads headers and the full body so the socket closes cleanly.
    async fn read_request(socket: &mut tokio::net::TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    return;
                }
            }
        }
    }

    fn account() -> NewAccount {
        NewAccount {
            first_name: "Dana".into(),
            last_name: "Reyes".into(),
            email: "dana@example.com".into(),
            password: "hunter22".into(),
            confirm_password: "hunter22".into(),
        }
    }

    #[tokio::test]
    async fn login_returns_session_on_ok() {
        let client = answer_once("200 OK", r#"{"token":"tok-1","user":{"_id":"u1"}}"#).await;
        let session = client.login("dana@example.com", "hunter22").await.unwrap();
        assert_eq!(session.token, "tok-1");
        assert_eq!(session.user.id, "u1");
    }

    #[tokio::test]
    async fn login_requires_plain_ok() {
        let client = answer_once("201 Created", r#"{"token":"tok-1","user":{}}"#).await;
        let err = client.login("dana@example.com", "hunter22").await.unwrap_err();
        assert!(matches!(err, ApiError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn login_without_token_fails() {
        let client = answer_once("200 OK", r#"{"user":{"_id":"u1"}}"#).await;
        let err = client.login("dana@example.com", "hunter22").await.unwrap_err();
        assert!(matches!(err, ApiError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn bad_credentials_are_not_an_expired_session() {
        let client = answer_once("401 Unauthorized", r#"{"message":"Invalid credentials"}"#).await;
        let err = client.login("dana@example.com", "wrong-pass").await.unwrap_err();
        assert!(matches!(err, ApiError::AuthenticationFailed));
        assert!(!err.is_unauthorized());
        assert_eq!(err.user_message("Sign-in failed"), "Authentication failed");
    }

    #[tokio::test]
    async fn login_server_error_reads_as_authentication_failure() {
        let client = answer_once("500 Internal Server Error", "{}").await;
        let err = client.login("dana@example.com", "hunter22").await.unwrap_err();
        assert!(matches!(err, ApiError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn register_accepts_created() {
        let client = answer_once("201 Created", r#"{"token":"tok-new","user":{"_id":"u9"}}"#).await;
        let session = client.register(&account()).await.unwrap();
        assert_eq!(session.token, "tok-new");
        assert_eq!(session.user.id, "u9");
    }

    #[tokio::test]
    async fn register_keeps_server_rejection_message() {
        let client = answer_once("409 Conflict", r#"{"message":"Email already registered"}"#).await;
        let err = client.register(&account()).await.unwrap_err();
        assert_eq!(err.user_message("Registration failed"), "Email already registered");
    }

    #[test]
    fn page_bodies_fall_back_to_defaults() {
        let body: ActiveLoadsBody = serde_json::from_value(json!({ "total": 3 })).unwrap();
        assert!(body.load.is_empty());
        assert_eq!(positive_or(body.current_page, 4), 4);
        assert_eq!(positive_or(body.total_pages, 1), 1);

        let body: InvoiceLoadsBody = serde_json::from_value(json!({
            "loads": [{ "_id": "a" }, { "_id": "b" }],
            "page": "2",
            "totalPages": 5
        }))
        .unwrap();
        assert_eq!(body.loads.len(), 2);
        assert_eq!(positive_or(body.page, 1), 2);
        assert_eq!(positive_or(body.total_pages, 1), 5);
    }

    #[test]
    fn user_message_prefers_server_text() {
        let rejected = ApiError::Rejected("Load is locked".into());
        assert_eq!(rejected.user_message("Failed"), "Load is locked");

        let status = ApiError::Status {
            status: StatusCode::BAD_REQUEST,
            message: None,
        };
        assert_eq!(status.user_message("Failed to update status"), "Failed to update status");

        let with_body = ApiError::Status {
            status: StatusCode::CONFLICT,
            message: Some("Stale load".into()),
        };
        assert_eq!(with_body.user_message("Failed"), "Stale load");
    }

    #[test]
    fn session_token_is_attached_only_when_present() {
        let config = AppConfig::built_in().unwrap();
        let anonymous = FreightClient::new(&config).unwrap();
        assert!(anonymous.token.is_none());

        let session = Session::new("tok-123", UserProfile::default());
        let signed_in = anonymous.with_session(Some(&session));
        assert_eq!(signed_in.token.as_deref(), Some("tok-123"));

        let request = signed_in
            .request(Method::GET, signed_in.url("api/load/me").unwrap())
            .build()
            .unwrap();
        assert_eq!(request.headers()[AUTH_HEADER], "tok-123");
        assert_eq!(request.url().as_str(), format!("{}api/load/me", config.api_url));
    }
}
