//! Document upload, review and access

use super::resource_id;
use super::search::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::auth::{AuthUser, Validator};
use crate::error::{ApiError, ApiResult, FieldError};
use crate::http::{ApiJson, AppState};
use crate::models::{
    DocumentReview, DocumentStatus, DocumentType, DocumentUpdate, KnowledgeComponent,
    NewDocument, NotificationKind, ReviewAction, Role, UserId, ValidationStatus,
};
use crate::search::total_pages;
use crate::services::DocumentInput;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use uuid::Uuid;

/// Largest decoded file accepted
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Quality at which a document goes straight to review
pub const REVIEW_THRESHOLD: f64 = 80.0;

/// Quality at which a document is anchored on the ledger
pub const VERIFICATION_THRESHOLD: f64 = 90.0;

/// Roles allowed to review submitted documents
pub const REVIEWER_ROLES: &[Role] = &[Role::Admin, Role::KnowledgeChampion];

const NOT_FOUND: &str = "Document not found";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub title: Option<String>,
    #[serde(default)]
    pub description: String,
    pub file_data: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub uploader_id: Option<UserId>,
}

/// Hex SHA-256 of the payload as sent
pub fn content_hash(file_data: &str) -> String {
    Sha256::digest(file_data.as_bytes())
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

#[derive(Debug, Default, Deserialize)]
pub struct ValidateRequest {
    pub action: Option<String>,
    #[serde(default)]
    pub feedback: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

fn metadata_str<'a>(metadata: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    metadata.get(key).and_then(Value::as_str)
}

/// POST /api/documents/upload
pub async fn upload(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(body): ApiJson<UploadRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut validator = Validator::new();
    let title = validator.required("title", body.title.as_deref());
    let file_data = validator.required("fileData", body.file_data.as_deref());
    validator.finish()?;
    let (Some(title), Some(file_data)) = (title, file_data) else {
        return Err(ApiError::BadRequest("Validation failed".to_string()));
    };

    let bytes = STANDARD
        .decode(file_data.trim())
        .map_err(|_| ApiError::BadRequest("fileData must be base64 encoded".to_string()))?;
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(ApiError::PayloadTooLarge);
    }

    let now = Utc::now();
    let id = Uuid::new_v4();
    let hash = content_hash(file_data);
    let mut metadata = body.metadata.clone();
    metadata.insert(
        "uploadTimestamp".to_string(),
        json!(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
    );

    let new_document = NewDocument {
        id,
        title: title.to_string(),
        description: body.description.clone(),
        content_hash: hash.clone(),
        uploader: body.uploader_id.unwrap_or(caller.user_id),
        file_url: format!(
            "{}/{}_{}",
            state.config.storage_base_url.trim_end_matches('/'),
            id,
            now.timestamp_millis()
        ),
        file_size: bytes.len() as u64,
        file_type: metadata_str(&body.metadata, "fileType").unwrap_or_default().to_string(),
        document_type: metadata_str(&body.metadata, "documentType")
            .and_then(DocumentType::parse)
            .unwrap_or_default(),
        status: DocumentStatus::PendingReview,
        metadata,
    };
    let saved = state.backend.create_document(new_document).await?;

    let ai = state
        .ai
        .process_document(&DocumentInput {
            title: title.to_string(),
            description: body.description.clone(),
            content: file_data.to_string(),
        })
        .await?;
    let reviewable = ai.quality_score >= REVIEW_THRESHOLD;

    let mut document = state
        .backend
        .update_document(
            saved.id,
            &DocumentUpdate {
                tags: Some(ai.tags.clone()),
                quality_score: Some(ai.quality_score),
                summary: Some(ai.summary.clone()),
                status: Some(if reviewable {
                    DocumentStatus::UnderReview
                } else {
                    DocumentStatus::PendingReview
                }),
                ..Default::default()
            },
        )
        .await?;

    state
        .backend
        .create_knowledge_component(KnowledgeComponent {
            document: saved.id,
            summary: ai.summary.clone(),
            key_topics: ai.key_topics.clone(),
            entities: ai.entities.clone(),
            sentiment_score: Some(ai.sentiment_score),
            complexity_score: Some(ai.complexity_score),
            validation_status: if reviewable {
                ValidationStatus::Pending
            } else {
                ValidationStatus::RequiresReview
            },
        })
        .await?;

    if ai.quality_score >= VERIFICATION_THRESHOLD {
        match state.ledger.initiate_verification(saved.id, &hash, title).await {
            Ok(tx) => {
                document = state
                    .backend
                    .update_document(
                        saved.id,
                        &DocumentUpdate {
                            blockchain_tx_id: Some(tx.transaction_id),
                            ..Default::default()
                        },
                    )
                    .await?;
            }
            Err(e) => warn!(document = %saved.id, "Ledger verification failed: {}", e),
        }
    }

    info!(
        document = %saved.id,
        quality = ai.quality_score,
        size = bytes.len(),
        "Document uploaded"
    );

    let next_steps = if reviewable {
        "Document under review for publication"
    } else {
        "Document requires manual review"
    };
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": {
                "document": document,
                "aiResults": {
                    "qualityScore": ai.quality_score,
                    "tags": ai.tags,
                    "summary": ai.summary,
                },
                "nextSteps": next_steps,
            },
            "message": "Document uploaded successfully",
        })),
    ))
}

/// POST /api/documents/:id/validate
pub async fn validate(
    State(state): State<AppState>,
    caller: AuthUser,
    path: Result<Path<String>, PathRejection>,
    ApiJson(body): ApiJson<ValidateRequest>,
) -> ApiResult<Json<Value>> {
    caller.require_role(REVIEWER_ROLES)?;
    let id = resource_id(path, NOT_FOUND)?;
    let action = body
        .action
        .as_deref()
        .and_then(ReviewAction::parse)
        .ok_or_else(|| {
            ApiError::validation(vec![FieldError::new(
                "action",
                "action must be APPROVE, REJECT or REQUEST_CHANGES",
            )])
        })?;

    let review = DocumentReview {
        validator: caller.user_id,
        action,
        feedback: body.feedback.trim().to_string(),
    };
    let document = state
        .backend
        .validate_document(id, &review)
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;

    let message = match action {
        ReviewAction::Approve => format!("\"{}\" was approved and published", document.title),
        ReviewAction::Reject => format!("\"{}\" was rejected", document.title),
        ReviewAction::RequestChanges => format!("Changes were requested on \"{}\"", document.title),
    };
    if let Err(e) = state
        .notifications
        .send_notification(document.uploader, &message, NotificationKind::Validation)
        .await
    {
        warn!(document = %id, "Review notification failed: {}", e);
    }

    info!(document = %id, validator = caller.user_id, action = ?action, "Document reviewed");
    Ok(Json(json!({
        "success": true,
        "data": { "document": document },
        "message": "Document validated successfully",
    })))
}

/// GET /api/documents/pending-validations
pub async fn pending_validations(
    State(state): State<AppState>,
    caller: AuthUser,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    caller.require_role(REVIEWER_ROLES)?;
    let Query(query) = query?;
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

    let pending = state.backend.pending_validations(page, limit).await?;
    Ok(Json(json!({
        "success": true,
        "data": {
            "documents": pending.documents,
            "pagination": {
                "page": page,
                "limit": limit,
                "total": pending.total,
                "totalPages": total_pages(pending.total, limit),
            },
        },
    })))
}

/// POST /api/documents/:id/view
pub async fn view(
    State(state): State<AppState>,
    _caller: AuthUser,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let id = resource_id(path, NOT_FOUND)?;
    if !state.backend.record_view(id).await? {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }
    Ok(Json(json!({ "success": true })))
}

/// GET /api/documents/:id/download
pub async fn download(
    State(state): State<AppState>,
    _caller: AuthUser,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let id = resource_id(path, NOT_FOUND)?;
    let url = state
        .backend
        .record_download(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;
    Ok(Json(json!({ "success": true, "data": { "url": url } })))
}

/// GET /api/documents/:id/verify
///
/// Documents never anchored on the ledger report `verified: false` without
/// consulting it.
pub async fn verify(
    State(state): State<AppState>,
    _caller: AuthUser,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let id = resource_id(path, NOT_FOUND)?;
    let document = state
        .backend
        .document_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.to_string()))?;

    let verified = match &document.blockchain_tx_id {
        Some(_) => state.ledger.verify_document(&document.content_hash).await?,
        None => false,
    };
    Ok(Json(json!({
        "success": true,
        "data": {
            "documentId": document.id,
            "contentHash": document.content_hash,
            "blockchainTxId": document.blockchain_tx_id,
            "verified": verified,
        },
    })))
}
