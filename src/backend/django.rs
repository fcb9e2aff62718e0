//! Django REST backend
//!
//! Thin reqwest client over the knowledge service's REST API. List endpoints
//! may answer with a bare array or a paginated `{"count": n, "results": [...]}`
//! page; a bare array is the full result set and is paginated here.

use super::{
    BackendError, BackendResult, DashboardStats, DocumentPage, KnowledgeBackend, NetworkTotals,
    SearchParams, Timeframe,
};
use crate::config::ServerConfig;
use crate::models::{
    Comment, Document, DocumentReview, DocumentUpdate, KnowledgeComponent, Membership,
    NewDocument, NewPerson, NewWorkspace, Person, ProfileUpdate, Project, UserId, Workspace,
    WorkspaceActivity, WorkspaceMember,
};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Page {
        #[serde(default)]
        count: Option<u64>,
        results: Vec<T>,
    },
    Bare(Vec<T>),
}

impl<T> Listing<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Page { results, .. } => results,
            Listing::Bare(items) => items,
        }
    }
}

impl Listing<Document> {
    fn into_page(self, page: u32, limit: u32) -> DocumentPage {
        match self {
            Listing::Page { count, results } => DocumentPage {
                total: count.unwrap_or(results.len() as u64),
                documents: results,
            },
            Listing::Bare(all) => DocumentPage::slice(all, page, limit),
        }
    }
}

/// Body of `POST /documents/search/`
#[derive(Debug, PartialEq, Serialize)]
struct SearchBody {
    #[serde(skip_serializing_if = "String::is_empty")]
    query: String,
    status: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    document_type: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
    page: u32,
    limit: u32,
}

impl From<&SearchParams> for SearchBody {
    fn from(params: &SearchParams) -> Self {
        Self {
            query: params.query.clone(),
            status: wire_name(&params.effective_status()),
            document_type: params.filters.document_type.iter().map(wire_name).collect(),
            tags: params.filters.tag.iter().cloned().collect(),
            page: params.page,
            limit: params.limit,
        }
    }
}

#[derive(Deserialize)]
struct Download {
    url: String,
}

fn page_query(page: u32, limit: u32) -> [(&'static str, String); 2] {
    [("page", page.to_string()), ("limit", limit.to_string())]
}

#[derive(Deserialize)]
struct Count {
    count: u64,
}

/// Wire name of a serde unit enum ("PUBLISHED", "RESEARCH", ...)
fn wire_name<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        _ => String::new(),
    }
}

/// Map a 404 to `None`
fn optional<T>(result: BackendResult<T>) -> BackendResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(BackendError::Status { status: 404, .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Client for the Django knowledge service
pub struct DjangoBackend {
    client: Client,
    base_url: String,
}

impl DjangoBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> BackendResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Network(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| BackendError::Network(format!("{}: {}", base_url, e)))?;
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ServerConfig) -> BackendResult<Self> {
        Self::new(config.django_api_url.clone(), config.django_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> BackendResult<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| BackendError::Network(e.to_string()))?;
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    async fn execute(&self, request: RequestBuilder) -> BackendResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        if status.is_server_error() {
            warn!(status = status.as_u16(), "Knowledge backend error: {}", body);
        }
        Err(BackendError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> BackendResult<T> {
        response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> BackendResult<T> {
        let url = self.url(path, params)?;
        debug!("GET {}", url);
        let response = self.execute(self.client.get(url)).await?;
        Self::decode(response).await
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> BackendResult<Vec<T>> {
        let listing: Listing<T> = self.get(path, params).await?;
        Ok(listing.into_vec())
    }

    async fn send<B, T>(&self, method: Method, path: &str, body: &B) -> BackendResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.send_to(method, self.url(path, &[])?, body).await
    }

    async fn send_to<B, T>(&self, method: Method, url: Url, body: &B) -> BackendResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        debug!("{} {}", method, url);
        let response = self.execute(self.client.request(method, url).json(body)).await?;
        Self::decode(response).await
    }

    async fn send_unit<B>(&self, method: Method, path: &str, body: &B) -> BackendResult<()>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.url(path, &[])?;
        debug!("{} {}", method, url);
        self.execute(self.client.request(method, url).json(body)).await?;
        Ok(())
    }
}

#[async_trait]
impl KnowledgeBackend for DjangoBackend {
    async fn user_by_email(&self, email: &str) -> BackendResult<Option<Person>> {
        // `search` is a substring match over several fields
        let users: Vec<Person> = self.get_list("/users/", &[("search", email.to_string())]).await?;
        Ok(users.into_iter().find(|u| u.email.eq_ignore_ascii_case(email)))
    }

    async fn user_by_id(&self, id: UserId) -> BackendResult<Option<Person>> {
        optional(self.get(&format!("/users/{}/", id), &[]).await)
    }

    async fn create_user(&self, user: NewPerson) -> BackendResult<Person> {
        self.send(Method::POST, "/users/", &user).await
    }

    async fn update_user(&self, id: UserId, update: &ProfileUpdate) -> BackendResult<Option<Person>> {
        optional(self.send(Method::PATCH, &format!("/users/{}/", id), update).await)
    }

    async fn create_document(&self, document: NewDocument) -> BackendResult<Document> {
        self.send(Method::POST, "/documents/", &document).await
    }

    async fn document_by_id(&self, id: Uuid) -> BackendResult<Option<Document>> {
        optional(self.get(&format!("/documents/{}/", id), &[]).await)
    }

    async fn update_document(&self, id: Uuid, update: &DocumentUpdate) -> BackendResult<Document> {
        self.send(Method::PATCH, &format!("/documents/{}/", id), update).await
    }

    async fn search_documents(&self, params: &SearchParams) -> BackendResult<DocumentPage> {
        // The page travels in the query string too, where the paginator reads it
        let url = self.url("/documents/search/", &page_query(params.page, params.limit))?;
        let listing: Listing<Document> = self
            .send_to(Method::POST, url, &SearchBody::from(params))
            .await?;
        Ok(listing.into_page(params.page, params.limit))
    }

    async fn recent_documents(&self, limit: usize) -> BackendResult<Vec<Document>> {
        self.get_list("/documents/recent/", &[("limit", limit.to_string())])
            .await
    }

    async fn validate_document(
        &self,
        id: Uuid,
        review: &DocumentReview,
    ) -> BackendResult<Option<Document>> {
        optional(
            self.send(Method::POST, &format!("/documents/{}/validate/", id), review)
                .await,
        )
    }

    async fn pending_validations(&self, page: u32, limit: u32) -> BackendResult<DocumentPage> {
        let listing: Listing<Document> = self
            .get("/documents/pending_validations/", &page_query(page, limit))
            .await?;
        Ok(listing.into_page(page, limit))
    }

    async fn record_view(&self, id: Uuid) -> BackendResult<bool> {
        let sent = self
            .send_unit(Method::POST, &format!("/documents/{}/view/", id), &json!({}))
            .await;
        Ok(optional(sent)?.is_some())
    }

    async fn record_download(&self, id: Uuid) -> BackendResult<Option<String>> {
        let download: Option<Download> =
            optional(self.get(&format!("/documents/{}/download/", id), &[]).await)?;
        Ok(download.map(|d| d.url))
    }

    async fn create_knowledge_component(
        &self,
        component: KnowledgeComponent,
    ) -> BackendResult<KnowledgeComponent> {
        self.send(Method::POST, "/knowledge-components/", &component).await
    }

    async fn knowledge_component(&self, document: Uuid) -> BackendResult<Option<KnowledgeComponent>> {
        optional(self.get(&format!("/knowledge-components/{}/", document), &[]).await)
    }

    async fn project_by_id(&self, id: Uuid) -> BackendResult<Option<Project>> {
        optional(self.get(&format!("/projects/{}/", id), &[]).await)
    }

    async fn create_workspace(&self, workspace: NewWorkspace) -> BackendResult<Workspace> {
        self.send(Method::POST, "/workspaces/", &workspace).await
    }

    async fn workspace_by_id(&self, id: Uuid) -> BackendResult<Option<Workspace>> {
        optional(self.get(&format!("/workspaces/{}/", id), &[]).await)
    }

    async fn add_workspace_member(&self, membership: Membership) -> BackendResult<Membership> {
        self.send(Method::POST, "/workspace-memberships/", &membership)
            .await
    }

    async fn workspace_membership(
        &self,
        workspace: Uuid,
        person: UserId,
    ) -> BackendResult<Option<Membership>> {
        let rows: Vec<Membership> = self
            .get_list(
                "/workspace-memberships/",
                &[("workspace", workspace.to_string()), ("person", person.to_string())],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn workspace_members(&self, workspace: Uuid) -> BackendResult<Vec<WorkspaceMember>> {
        self.get_list(&format!("/workspaces/{}/members/", workspace), &[])
            .await
    }

    async fn workspace_documents(&self, workspace: Uuid) -> BackendResult<Vec<Document>> {
        self.get_list(&format!("/workspaces/{}/documents/", workspace), &[])
            .await
    }

    async fn add_document_to_workspace(&self, workspace: Uuid, document: Uuid) -> BackendResult<()> {
        self.send_unit(
            Method::POST,
            &format!("/workspaces/{}/documents/", workspace),
            &json!({ "document": document }),
        )
        .await
    }

    async fn record_workspace_activity(&self, activity: WorkspaceActivity) -> BackendResult<()> {
        self.send_unit(
            Method::POST,
            &format!("/workspaces/{}/activity/", activity.workspace),
            &activity,
        )
        .await
    }

    async fn recent_workspace_documents(
        &self,
        workspace: Uuid,
        limit: usize,
    ) -> BackendResult<Vec<Document>> {
        let mut docs: Vec<Document> = self
            .get_list(
                &format!("/workspaces/{}/documents/", workspace),
                &[("ordering", "-created_at".to_string()), ("limit", limit.to_string())],
            )
            .await?;
        docs.truncate(limit);
        Ok(docs)
    }

    async fn recent_workspace_comments(
        &self,
        workspace: Uuid,
        limit: usize,
    ) -> BackendResult<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .get_list(
                &format!("/workspaces/{}/comments/", workspace),
                &[("limit", limit.to_string())],
            )
            .await?;
        comments.truncate(limit);
        Ok(comments)
    }

    async fn activity_count(
        &self,
        workspace: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BackendResult<u64> {
        let count: Count = self
            .get(
                &format!("/workspaces/{}/activity/count/", workspace),
                &[
                    ("start", start.to_rfc3339_opts(SecondsFormat::Millis, true)),
                    ("end", end.to_rfc3339_opts(SecondsFormat::Millis, true)),
                ],
            )
            .await?;
        Ok(count.count)
    }

    async fn dashboard_stats(&self, timeframe: Timeframe) -> BackendResult<DashboardStats> {
        self.get(
            "/analytics/dashboard/",
            &[("timeframe", timeframe.as_str().to_string())],
        )
        .await
    }

    async fn network_totals(&self) -> BackendResult<NetworkTotals> {
        self.get("/analytics/totals/", &[]).await
    }
}
