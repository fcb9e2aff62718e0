//! Documents and the knowledge extracted from them

use super::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Review lifecycle of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    #[default]
    Draft,
    PendingReview,
    UnderReview,
    Approved,
    Published,
    Archived,
    Rejected,
}

impl DocumentStatus {
    pub fn parse(value: &str) -> Option<Self> {
        serde_json::from_value(Value::String(value.trim().to_ascii_uppercase())).ok()
    }
}

/// Kind of business document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    Proposal,
    Report,
    Presentation,
    Contract,
    Research,
    Guideline,
    Template,
    #[default]
    Other,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Proposal => "PROPOSAL",
            DocumentType::Report => "REPORT",
            DocumentType::Presentation => "PRESENTATION",
            DocumentType::Contract => "CONTRACT",
            DocumentType::Research => "RESEARCH",
            DocumentType::Guideline => "GUIDELINE",
            DocumentType::Template => "TEMPLATE",
            DocumentType::Other => "OTHER",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        serde_json::from_value(Value::String(value.trim().to_ascii_uppercase())).ok()
    }
}

/// A document record as stored by the knowledge backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content_hash: String,
    #[serde(default)]
    pub blockchain_tx_id: Option<String>,
    pub uploader: UserId,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub document_type: DocumentType,
    #[serde(default)]
    pub quality_score: Option<f64>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub file_url: String,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub file_type: String,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub download_count: u64,
    #[serde(default)]
    pub project: Option<Uuid>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

fn default_version() -> u32 {
    1
}

impl Document {
    /// Age of the document in fractional days relative to `now`
    pub fn age_in_days(&self, now: DateTime<Utc>) -> f64 {
        (now - self.created_at).num_milliseconds() as f64 / 86_400_000.0
    }
}

/// Fields written when a document is first registered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDocument {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub content_hash: String,
    pub uploader: UserId,
    pub metadata: Map<String, Value>,
    pub file_url: String,
    pub file_size: u64,
    pub file_type: String,
    pub document_type: DocumentType,
    pub status: DocumentStatus,
}

/// Partial document update (PATCH semantics)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DocumentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain_tx_id: Option<String>,
}

impl DocumentUpdate {
    pub fn apply(&self, doc: &mut Document) {
        if let Some(tags) = &self.tags {
            doc.tags = tags.clone();
        }
        if let Some(score) = self.quality_score {
            doc.quality_score = Some(score);
        }
        if let Some(summary) = &self.summary {
            doc.summary = Some(summary.clone());
        }
        if let Some(status) = self.status {
            if status == DocumentStatus::Published && doc.published_at.is_none() {
                doc.published_at = Some(Utc::now());
            }
            doc.status = status;
        }
        if let Some(tx) = &self.blockchain_tx_id {
            doc.blockchain_tx_id = Some(tx.clone());
        }
        doc.updated_at = Utc::now();
    }
}

/// A reviewer's decision on a submitted document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewAction {
    Approve,
    Reject,
    RequestChanges,
}

impl ReviewAction {
    pub fn parse(value: &str) -> Option<Self> {
        serde_json::from_value(Value::String(value.trim().to_ascii_uppercase())).ok()
    }

    /// Status the document moves to after this decision
    pub fn resulting_status(&self) -> DocumentStatus {
        match self {
            ReviewAction::Approve => DocumentStatus::Published,
            ReviewAction::Reject => DocumentStatus::Rejected,
            ReviewAction::RequestChanges => DocumentStatus::Draft,
        }
    }
}

/// Review decision submitted to the knowledge backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentReview {
    pub validator: UserId,
    pub action: ReviewAction,
    #[serde(default)]
    pub feedback: String,
}

/// Audit record of one review decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationActivity {
    pub document: Uuid,
    pub validator: UserId,
    pub action: ReviewAction,
    #[serde(default)]
    pub feedback: String,
    pub previous_status: DocumentStatus,
    pub new_status: DocumentStatus,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// Outcome of automated review of a knowledge component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    #[default]
    Pending,
    Validated,
    Flagged,
    RequiresReview,
}

/// Knowledge extracted from a document by the AI pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeComponent {
    pub document: Uuid,
    pub summary: String,
    #[serde(default)]
    pub key_topics: Vec<String>,
    #[serde(default)]
    pub entities: Vec<Value>,
    #[serde(default)]
    pub sentiment_score: Option<f64>,
    #[serde(default)]
    pub complexity_score: Option<f64>,
    #[serde(default)]
    pub validation_status: ValidationStatus,
}
