//! Knowledge backend
//!
//! The gateway owns no persistent data. Everything it reads or writes goes
//! through [`KnowledgeBackend`], implemented by [`DjangoBackend`] (the Django
//! REST service) and [`MemoryBackend`] (an in-process store for local runs
//! and tests).

pub mod demo;
pub mod django;
pub mod memory;

pub use django::DjangoBackend;
pub use memory::MemoryBackend;

use crate::models::{
    Comment, Document, DocumentReview, DocumentStatus, DocumentType, DocumentUpdate,
    KnowledgeComponent, Membership, NewDocument, NewPerson, NewWorkspace, Person, ProfileUpdate,
    Project, UserId, Workspace, WorkspaceActivity, WorkspaceMember,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Backend errors
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status
    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The backend answered with a payload we could not decode
    #[error("Decode error: {0}")]
    Decode(String),

    /// A uniqueness constraint was violated
    #[error("Conflict: {0}")]
    Conflict(String),
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Optional narrowing of a document search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DocumentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<DocumentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// A keyword search request
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub query: String,
    pub filters: SearchFilters,
    /// 1-based page number
    pub page: u32,
    pub limit: u32,
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            filters: SearchFilters::default(),
            page: 1,
            limit: 20,
        }
    }

    /// Number of results skipped before this page
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize) * self.limit as usize
    }

    /// Status searched when the caller does not ask for one
    pub fn effective_status(&self) -> DocumentStatus {
        self.filters.status.unwrap_or(DocumentStatus::Published)
    }
}

/// One page of documents plus the number of matches across all pages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentPage {
    pub documents: Vec<Document>,
    pub total: u64,
}

impl DocumentPage {
    /// Cut page `page` (1-based) of `limit` out of a full, ordered result set
    pub fn slice(all: Vec<Document>, page: u32, limit: u32) -> Self {
        let total = all.len() as u64;
        let offset = (page.saturating_sub(1) as usize) * limit as usize;
        Self {
            documents: all.into_iter().skip(offset).take(limit as usize).collect(),
            total,
        }
    }
}

/// Reporting window for dashboard analytics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeframe {
    #[default]
    Week,
    Month,
    Quarter,
    Year,
}

impl Timeframe {
    /// Unknown names fall back to a week
    pub fn parse(value: &str) -> Self {
        match value {
            "30days" => Timeframe::Month,
            "90days" => Timeframe::Quarter,
            "year" => Timeframe::Year,
            _ => Timeframe::Week,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Week => "7days",
            Timeframe::Month => "30days",
            Timeframe::Quarter => "90days",
            Timeframe::Year => "year",
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            Timeframe::Week => Duration::days(7),
            Timeframe::Month => Duration::days(30),
            Timeframe::Quarter => Duration::days(90),
            Timeframe::Year => Duration::days(365),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub documents: u64,
    pub users: u64,
    pub quality: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeCount {
    pub document_type: DocumentType,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Network-wide analytics for one timeframe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_documents: u64,
    /// Percent change in uploads against the preceding period
    pub document_growth: f64,
    pub active_users: u64,
    pub avg_quality_score: f64,
    pub active_workspaces: u64,
    pub activity_trend: Vec<TrendPoint>,
    pub document_types: Vec<TypeCount>,
    pub timeframe: String,
    pub period: Period,
}

/// Headline counters for the home dashboard
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkTotals {
    pub documents: u64,
    pub users: u64,
    pub published_documents: u64,
    pub total_views: u64,
    pub learning_minutes: u64,
}

/// Operations the gateway needs from the knowledge store.
///
/// Lookups return `Ok(None)` when the record does not exist; errors are
/// reserved for transport and protocol failures.
#[async_trait]
pub trait KnowledgeBackend: Send + Sync {
    async fn user_by_email(&self, email: &str) -> BackendResult<Option<Person>>;
    async fn user_by_id(&self, id: UserId) -> BackendResult<Option<Person>>;
    async fn create_user(&self, user: NewPerson) -> BackendResult<Person>;
    async fn update_user(&self, id: UserId, update: &ProfileUpdate) -> BackendResult<Option<Person>>;

    async fn create_document(&self, document: NewDocument) -> BackendResult<Document>;
    async fn document_by_id(&self, id: Uuid) -> BackendResult<Option<Document>>;
    async fn update_document(&self, id: Uuid, update: &DocumentUpdate) -> BackendResult<Document>;
    /// The requested page of matches, newest first, with the total across pages
    async fn search_documents(&self, params: &SearchParams) -> BackendResult<DocumentPage>;
    /// Most recently created published documents
    async fn recent_documents(&self, limit: usize) -> BackendResult<Vec<Document>>;

    /// Apply a review decision and record it. `None` when the document does
    /// not exist.
    async fn validate_document(
        &self,
        id: Uuid,
        review: &DocumentReview,
    ) -> BackendResult<Option<Document>>;
    /// Documents waiting for a reviewer, newest first
    async fn pending_validations(&self, page: u32, limit: u32) -> BackendResult<DocumentPage>;
    /// Count one view; `false` when the document does not exist
    async fn record_view(&self, id: Uuid) -> BackendResult<bool>;
    /// Count one download and return the file location
    async fn record_download(&self, id: Uuid) -> BackendResult<Option<String>>;

    async fn create_knowledge_component(
        &self,
        component: KnowledgeComponent,
    ) -> BackendResult<KnowledgeComponent>;
    async fn knowledge_component(&self, document: Uuid) -> BackendResult<Option<KnowledgeComponent>>;

    async fn project_by_id(&self, id: Uuid) -> BackendResult<Option<Project>>;

    async fn create_workspace(&self, workspace: NewWorkspace) -> BackendResult<Workspace>;
    async fn workspace_by_id(&self, id: Uuid) -> BackendResult<Option<Workspace>>;
    async fn add_workspace_member(&self, membership: Membership) -> BackendResult<Membership>;
    async fn workspace_membership(
        &self,
        workspace: Uuid,
        person: UserId,
    ) -> BackendResult<Option<Membership>>;
    async fn workspace_members(&self, workspace: Uuid) -> BackendResult<Vec<WorkspaceMember>>;
    async fn workspace_documents(&self, workspace: Uuid) -> BackendResult<Vec<Document>>;
    async fn add_document_to_workspace(&self, workspace: Uuid, document: Uuid) -> BackendResult<()>;
    async fn record_workspace_activity(&self, activity: WorkspaceActivity) -> BackendResult<()>;
    async fn recent_workspace_documents(
        &self,
        workspace: Uuid,
        limit: usize,
    ) -> BackendResult<Vec<Document>>;
    async fn recent_workspace_comments(
        &self,
        workspace: Uuid,
        limit: usize,
    ) -> BackendResult<Vec<Comment>>;
    /// Activity entries recorded in `[start, end]`
    async fn activity_count(
        &self,
        workspace: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BackendResult<u64>;

    async fn dashboard_stats(&self, timeframe: Timeframe) -> BackendResult<DashboardStats>;
    async fn network_totals(&self) -> BackendResult<NetworkTotals>;
}
