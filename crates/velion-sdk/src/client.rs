//! VelionClient, the HTTP client for a running gateway

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::RwLock;
use std::time::Duration;
use tracing::debug;

use crate::error::{SdkError, SdkResult};
use crate::models::{
    GraphRequest, Health, NewWorkspace, Registration, SearchPage, SearchRequest, Session, Upload,
};

/// Largest file `upload_document` will send
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// MIME types the knowledge network accepts
pub const ALLOWED_FILE_TYPES: [&str; 11] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "text/plain",
    "image/jpeg",
    "image/png",
    "image/gif",
];

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Reject an upload that the gateway would refuse, without touching the network
pub fn check_upload(upload: &Upload) -> SdkResult<()> {
    if upload.data.len() > MAX_UPLOAD_BYTES {
        return Err(SdkError::FileTooLarge {
            size: upload.data.len(),
            limit: MAX_UPLOAD_BYTES,
        });
    }
    if !ALLOWED_FILE_TYPES.contains(&upload.mime_type.as_str()) {
        return Err(SdkError::UnsupportedFileType(upload.mime_type.clone()));
    }
    Ok(())
}

fn data_of<T: DeserializeOwned>(mut body: Value) -> SdkResult<T> {
    let data = body.get_mut("data").map(Value::take).unwrap_or(Value::Null);
    Ok(serde_json::from_value(data)?)
}

/// Typed client for the gateway's REST API.
///
/// The bearer token is kept inside the client: login and register store it,
/// logout and any 401 answer clear it.
///
/// # Example
/// ```no_run
/// # use velion_sdk::VelionClient;
/// # async fn run() -> velion_sdk::SdkResult<()> {
/// let client = VelionClient::new("http://localhost:3002")?;
/// client.login("admin@velion.app", "admin123").await?;
/// let page = client.search(&velion_sdk::SearchRequest::new("data mesh")).await?;
/// println!("{} hits", page.pagination.total);
/// # Ok(())
/// # }
/// ```
pub struct VelionClient {
    base_url: String,
    http: Client,
    token: RwLock<Option<String>>,
}

impl VelionClient {
    pub fn new(base_url: &str) -> SdkResult<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> SdkResult<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| SdkError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            http,
            token: RwLock::new(None),
        })
    }

    /// Use an existing access token
    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.set_token(Some(token.into()));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<String> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn set_token(&self, token: Option<String>) {
        let mut guard = match self.token.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = token;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    fn url(&self, path: &str, pairs: &[(&str, String)]) -> SdkResult<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| SdkError::InvalidUrl(format!("{}: {}", path, e)))?;
        if !pairs.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!("{} {}", method, url);
        let builder = self.http.request(method, url);
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> SdkResult<T> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        if status == StatusCode::UNAUTHORIZED {
            self.set_token(None);
        }

        let body: Value = response.json().await.unwrap_or(Value::Null);
        let message = body
            .get("error")
            .or_else(|| body.get("message"))
            .and_then(Value::as_str)
            .or_else(|| status.canonical_reason())
            .unwrap_or("Request failed")
            .to_string();
        let code = body.get("code").and_then(Value::as_str).map(str::to_string);
        Err(SdkError::Api {
            status: status.as_u16(),
            message,
            code,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, pairs: &[(&str, String)]) -> SdkResult<T> {
        let url = self.url(path, pairs)?;
        self.send(self.request(Method::GET, url)).await
    }

    async fn write<B, T>(&self, method: Method, path: &str, body: &B) -> SdkResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path, &[])?;
        self.send(self.request(method, url).json(body)).await
    }

    // ============================================================
    // Auth
    // ============================================================

    pub async fn health(&self) -> SdkResult<Health> {
        self.get("/health", &[]).await
    }

    /// Log in and keep the session token
    pub async fn login(&self, email: &str, password: &str) -> SdkResult<Session> {
        let body = json!({ "email": email, "password": password });
        let session: Session = self.write(Method::POST, "/api/auth/login", &body).await?;
        self.set_token(Some(session.token.clone()));
        Ok(session)
    }

    /// Register and keep the session token
    pub async fn register(&self, registration: &Registration) -> SdkResult<Session> {
        let session: Session = self
            .write(Method::POST, "/api/auth/register", registration)
            .await?;
        self.set_token(Some(session.token.clone()));
        Ok(session)
    }

    /// The user behind the current token
    pub async fn verify(&self) -> SdkResult<Value> {
        let mut body: Value = self.get("/api/auth/verify", &[]).await?;
        Ok(body.get_mut("user").map(Value::take).unwrap_or(Value::Null))
    }

    /// Trade a refresh token for a new session token and keep it
    pub async fn refresh(&self, refresh_token: &str) -> SdkResult<String> {
        let body = json!({ "refreshToken": refresh_token });
        let response: Value = self.write(Method::POST, "/api/auth/refresh", &body).await?;
        let token = response
            .get("token")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| SdkError::Api {
                status: 200,
                message: "Refresh response carried no token".to_string(),
                code: None,
            })?;
        self.set_token(Some(token.clone()));
        Ok(token)
    }

    pub async fn logout(&self) -> SdkResult<()> {
        let result: SdkResult<Value> = self.write(Method::POST, "/api/auth/logout", &json!({})).await;
        self.set_token(None);
        result.map(|_| ())
    }

    // ============================================================
    // Documents and search
    // ============================================================

    /// Upload a file; size and MIME type are checked before any request is made
    pub async fn upload_document(&self, upload: &Upload) -> SdkResult<Value> {
        check_upload(upload)?;

        let mut metadata = upload.metadata.clone();
        metadata.insert("fileName".to_string(), json!(upload.file_name));
        metadata.insert("fileSize".to_string(), json!(upload.data.len()));
        metadata.insert("fileType".to_string(), json!(upload.mime_type));
        if let Some(kind) = &upload.document_type {
            metadata.insert("documentType".to_string(), json!(kind));
        }
        let body = json!({
            "title": upload.title,
            "description": upload.description,
            "fileData": STANDARD.encode(&upload.data),
            "metadata": metadata,
        });
        let response: Value = self
            .write(Method::POST, "/api/documents/upload", &body)
            .await?;
        data_of(response)
    }

    pub async fn search(&self, request: &SearchRequest) -> SdkResult<SearchPage> {
        let response: Value = self.get("/api/search", &request.pairs()).await?;
        data_of(response)
    }

    /// Review a submitted document: `APPROVE`, `REJECT` or `REQUEST_CHANGES`.
    /// Returns the updated document.
    pub async fn validate_document(&self, id: &str, action: &str, feedback: &str) -> SdkResult<Value> {
        let body = json!({ "action": action, "feedback": feedback });
        let response: Value = self
            .write(Method::POST, &format!("/api/documents/{}/validate", id), &body)
            .await?;
        let mut data: Value = data_of(response)?;
        Ok(data.get_mut("document").map(Value::take).unwrap_or(Value::Null))
    }

    /// Documents awaiting review, with pagination
    pub async fn pending_validations(&self, page: u32, limit: u32) -> SdkResult<Value> {
        let pairs = [("page", page.to_string()), ("limit", limit.to_string())];
        let response: Value = self.get("/api/documents/pending-validations", &pairs).await?;
        data_of(response)
    }

    pub async fn record_view(&self, id: &str) -> SdkResult<()> {
        let _: Value = self
            .write(Method::POST, &format!("/api/documents/{}/view", id), &json!({}))
            .await?;
        Ok(())
    }

    /// Where to fetch the file; counts as a download
    pub async fn download_url(&self, id: &str) -> SdkResult<String> {
        let response: Value = self.get(&format!("/api/documents/{}/download", id), &[]).await?;
        let data: Value = data_of(response)?;
        Ok(data["url"].as_str().unwrap_or_default().to_string())
    }

    /// Ledger verification status of a document
    pub async fn verify_document(&self, id: &str) -> SdkResult<Value> {
        let response: Value = self.get(&format!("/api/documents/{}/verify", id), &[]).await?;
        data_of(response)
    }

    // ============================================================
    // Knowledge graph
    // ============================================================

    /// The full response, `metadata` included
    pub async fn graph(&self, request: &GraphRequest) -> SdkResult<Value> {
        self.get("/api/graph", &request.pairs()).await
    }

    pub async fn connections(&self, source_id: &str, target_id: &str) -> SdkResult<Value> {
        let pairs = [
            ("sourceId", source_id.to_string()),
            ("targetId", target_id.to_string()),
        ];
        let response: Value = self.get("/api/graph/connections", &pairs).await?;
        data_of(response)
    }

    // ============================================================
    // Workspaces
    // ============================================================

    pub async fn create_workspace(&self, workspace: &NewWorkspace) -> SdkResult<Value> {
        let response: Value = self.write(Method::POST, "/api/workspaces", workspace).await?;
        data_of(response)
    }

    pub async fn workspace(&self, id: &str) -> SdkResult<Value> {
        let response: Value = self.get(&format!("/api/workspaces/{}", id), &[]).await?;
        data_of(response)
    }

    pub async fn add_workspace_document(&self, workspace: &str, document: &str) -> SdkResult<()> {
        let body = json!({ "documentId": document });
        let _: Value = self
            .write(Method::POST, &format!("/api/workspaces/{}/documents", workspace), &body)
            .await?;
        Ok(())
    }

    /// Invite people; returns the outcome counts
    pub async fn invite_members(&self, workspace: &str, user_ids: &[i64]) -> SdkResult<Value> {
        let body = json!({ "userIds": user_ids });
        let response: Value = self
            .write(Method::POST, &format!("/api/workspaces/{}/invite", workspace), &body)
            .await?;
        data_of(response)
    }

    // ============================================================
    // Profile, settings and analytics
    // ============================================================

    pub async fn profile(&self) -> SdkResult<Value> {
        self.get("/api/users/profile", &[]).await
    }

    pub async fn update_profile(&self, changes: &Value) -> SdkResult<Value> {
        self.write(Method::PUT, "/api/users/profile", changes).await
    }

    pub async fn settings(&self) -> SdkResult<Value> {
        self.get("/api/settings", &[]).await
    }

    pub async fn update_settings(&self, settings: &Value) -> SdkResult<Value> {
        self.write(Method::PUT, "/api/settings", settings).await
    }

    pub async fn analytics(&self, timeframe: Option<&str>) -> SdkResult<Value> {
        let pairs: Vec<(&str, String)> = timeframe
            .map(|t| vec![("timeframe", t.to_string())])
            .unwrap_or_default();
        self.get("/api/analytics", &pairs).await
    }

    pub async fn dashboard_stats(&self) -> SdkResult<Value> {
        self.get("/api/dashboard/stats", &[]).await
    }

    pub async fn recommendations(&self) -> SdkResult<Value> {
        self.get("/api/dashboard/recommendations", &[]).await
    }

    pub async fn activity(&self) -> SdkResult<Value> {
        self.get("/api/dashboard/activity", &[]).await
    }
}
