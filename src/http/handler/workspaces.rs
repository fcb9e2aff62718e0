//! Collaborative workspaces

use super::resource_id;
use crate::auth::{AuthUser, Validator};
use crate::error::{ApiError, ApiResult, FieldError};
use crate::http::{ApiJson, AppState};
use crate::models::{
    Document, MemberRole, Membership, NewWorkspace, NotificationKind, Person, UserId,
    WorkspaceActivity, WorkspaceMember, WorkspaceType,
};
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Duration, NaiveTime, Utc};
use futures::future::{join_all, try_join_all};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};
use uuid::Uuid;

const ACTIVITY_LIMIT: usize = 20;
const TREND_DAYS: i64 = 30;
const ACTIVE_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkspaceRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub workspace_type: WorkspaceType,
    pub project_id: Option<String>,
    #[serde(default)]
    pub members: Vec<UserId>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_private: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDocumentRequest {
    pub document_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    pub user_ids: Option<Vec<UserId>>,
    #[serde(default)]
    pub role: MemberRole,
}

/// Outcome counts of one invitation batch
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct InviteSummary {
    pub total: usize,
    pub invited: usize,
    pub already_member: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum InviteOutcome {
    Invited,
    AlreadyMember,
}

/// One entry of the workspace feed
#[derive(Debug, Clone, Serialize)]
pub struct ActivityItem {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub timestamp: DateTime<Utc>,
    pub user: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<Value>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendDay {
    pub date: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceStatistics {
    pub total_documents: usize,
    pub total_members: usize,
    pub active_members: usize,
    pub storage_used: u64,
    pub document_types: IndexMap<&'static str, u64>,
    pub activity_trend: Vec<TrendDay>,
}

fn with_fields(base: Value, extra: Map<String, Value>) -> Value {
    match base {
        Value::Object(mut map) => {
            map.extend(extra);
            Value::Object(map)
        }
        other => other,
    }
}

fn to_json<T: Serialize>(value: &T) -> ApiResult<Value> {
    serde_json::to_value(value).map_err(|e| ApiError::Internal(e.to_string()))
}

/// POST /api/workspaces
pub async fn create(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(body): ApiJson<CreateWorkspaceRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut validator = Validator::new();
    let name = validator.required("name", body.name.as_deref());
    validator.finish()?;
    let Some(name) = name else {
        return Err(ApiError::BadRequest("name is required".to_string()));
    };

    let project = match body.project_id.as_deref().filter(|p| !p.is_empty()) {
        Some(raw) => {
            let not_found = || ApiError::NotFound("Project not found".to_string());
            let id = Uuid::parse_str(raw).map_err(|_| not_found())?;
            state.backend.project_by_id(id).await?.ok_or_else(not_found)?;
            Some(id)
        }
        None => None,
    };

    let workspace = state
        .backend
        .create_workspace(NewWorkspace {
            name: name.trim().to_string(),
            description: body.description.clone(),
            workspace_type: body.workspace_type,
            project,
            created_by: caller.user_id,
            is_private: body.is_private,
            tags: body.tags.clone(),
        })
        .await?;

    state
        .backend
        .add_workspace_member(Membership {
            workspace: workspace.id,
            person: caller.user_id,
            role: MemberRole::Owner,
            joined_at: Utc::now(),
        })
        .await?;

    let mut seen = HashSet::from([caller.user_id]);
    let invitees: Vec<UserId> = body.members.iter().copied().filter(|m| seen.insert(*m)).collect();
    try_join_all(invitees.into_iter().map(|person| {
        state.backend.add_workspace_member(Membership {
            workspace: workspace.id,
            person,
            role: MemberRole::Member,
            joined_at: Utc::now(),
        })
    }))
    .await?;

    let populated = state
        .backend
        .workspace_by_id(workspace.id)
        .await?
        .unwrap_or(workspace);
    let members = state.backend.workspace_members(populated.id).await?;
    info!(workspace = %populated.id, owner = caller.user_id, "Workspace created");

    let mut extra = Map::new();
    extra.insert("members".to_string(), to_json(&members)?);
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": with_fields(to_json(&populated)?, extra),
            "message": "Workspace created successfully",
        })),
    ))
}

/// GET /api/workspaces/:id
pub async fn get(
    State(state): State<AppState>,
    caller: AuthUser,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let id = resource_id(path, "Workspace not found")?;
    let workspace = state
        .backend
        .workspace_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Workspace not found".to_string()))?;

    if workspace.is_private
        && state
            .backend
            .workspace_membership(id, caller.user_id)
            .await?
            .is_none()
    {
        return Err(ApiError::Forbidden(
            "Access denied to private workspace".to_string(),
        ));
    }

    let (activity, documents, members) = futures::join!(
        activity_feed(&state, id, ACTIVITY_LIMIT),
        state.backend.workspace_documents(id),
        state.backend.workspace_members(id)
    );
    let (activity, documents, members) = (activity?, documents?, members?);
    let statistics = statistics(&state, id, &documents, &members, Utc::now()).await?;

    let mut extra = Map::new();
    extra.insert("activity".to_string(), to_json(&activity)?);
    extra.insert("documents".to_string(), to_json(&documents)?);
    extra.insert("members".to_string(), to_json(&members)?);
    extra.insert("statistics".to_string(), to_json(&statistics)?);
    Ok(Json(json!({
        "success": true,
        "data": with_fields(to_json(&workspace)?, extra),
    })))
}

/// Uploads and comments, newest first
async fn activity_feed(state: &AppState, workspace: Uuid, limit: usize) -> ApiResult<Vec<ActivityItem>> {
    let (documents, comments) = futures::join!(
        state.backend.recent_workspace_documents(workspace, limit),
        state.backend.recent_workspace_comments(workspace, limit)
    );
    let (documents, comments) = (documents?, comments?);

    let uploader_ids: HashSet<UserId> = documents.iter().map(|d| d.uploader).collect();
    let uploaders: HashMap<UserId, Person> = join_all(
        uploader_ids
            .into_iter()
            .map(|id| async move { state.backend.user_by_id(id).await }),
    )
    .await
    .into_iter()
    .filter_map(|found| found.ok().flatten())
    .map(|p| (p.id, p))
    .collect();

    let mut feed = Vec::with_capacity(documents.len() + comments.len());
    for doc in &documents {
        let uploader = uploaders.get(&doc.uploader);
        let name = uploader.map(|p| p.first_name.as_str()).unwrap_or("Someone");
        feed.push(ActivityItem {
            kind: "DOCUMENT_UPLOAD",
            timestamp: doc.created_at,
            user: match uploader {
                Some(p) => to_json(p)?,
                None => json!(doc.uploader),
            },
            message: format!("{} uploaded \"{}\"", name, doc.title),
            document: Some(to_json(doc)?),
            comment: None,
        });
    }
    for comment in &comments {
        feed.push(ActivityItem {
            kind: "COMMENT",
            timestamp: comment.created_at,
            user: to_json(&comment.author)?,
            message: format!("{} commented on a document", comment.author.first_name),
            document: None,
            comment: Some(to_json(comment)?),
        });
    }
    feed.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    feed.truncate(limit);
    Ok(feed)
}

/// Count documents per type, in first-seen order
pub fn document_types(documents: &[Document]) -> IndexMap<&'static str, u64> {
    let mut types = IndexMap::new();
    for doc in documents {
        *types.entry(doc.document_type.as_str()).or_insert(0) += 1;
    }
    types
}

/// Members whose last activity falls within the past week
pub fn active_members(members: &[WorkspaceMember], now: DateTime<Utc>) -> usize {
    let cutoff = now - Duration::days(ACTIVE_WINDOW_DAYS);
    members
        .iter()
        .filter(|m| m.person.last_activity > cutoff)
        .count()
}

async fn statistics(
    state: &AppState,
    workspace: Uuid,
    documents: &[Document],
    members: &[WorkspaceMember],
    now: DateTime<Utc>,
) -> ApiResult<WorkspaceStatistics> {
    let today = now.date_naive();
    let days: Vec<_> = (0..TREND_DAYS)
        .rev()
        .map(|offset| today - Duration::days(offset))
        .collect();
    let counts = try_join_all(days.iter().map(|day| {
        let start = day.and_time(NaiveTime::MIN).and_utc();
        let end = start + Duration::days(1) - Duration::milliseconds(1);
        state.backend.activity_count(workspace, start, end)
    }))
    .await?;
    let activity_trend = days
        .iter()
        .zip(counts)
        .map(|(day, count)| TrendDay {
            date: day.format("%Y-%m-%d").to_string(),
            count,
        })
        .collect();

    Ok(WorkspaceStatistics {
        total_documents: documents.len(),
        total_members: members.len(),
        active_members: active_members(members, now),
        storage_used: documents.iter().map(|d| d.file_size).sum(),
        document_types: document_types(documents),
        activity_trend,
    })
}

/// POST /api/workspaces/:id/documents
pub async fn add_document(
    State(state): State<AppState>,
    caller: AuthUser,
    path: Result<Path<String>, PathRejection>,
    ApiJson(body): ApiJson<AddDocumentRequest>,
) -> ApiResult<Json<Value>> {
    let workspace = resource_id(path, "Workspace not found")?;
    let membership = state
        .backend
        .workspace_membership(workspace, caller.user_id)
        .await?;
    if !membership.is_some_and(|m| m.role.can_contribute()) {
        return Err(ApiError::Forbidden("Insufficient permissions".to_string()));
    }

    let not_found = || ApiError::NotFound("Document not found".to_string());
    let document_id = body
        .document_id
        .as_deref()
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .ok_or_else(not_found)?;
    let document = state
        .backend
        .document_by_id(document_id)
        .await?
        .ok_or_else(not_found)?;

    state
        .backend
        .add_document_to_workspace(workspace, document.id)
        .await?;
    state
        .backend
        .record_workspace_activity(WorkspaceActivity {
            workspace,
            user: caller.user_id,
            activity_type: "DOCUMENT_ADDED".to_string(),
            details: json!({
                "documentId": document.id,
                "documentTitle": document.title,
            }),
            created_at: Utc::now(),
        })
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Document added to workspace",
    })))
}

/// POST /api/workspaces/:id/invite
pub async fn invite(
    State(state): State<AppState>,
    caller: AuthUser,
    path: Result<Path<String>, PathRejection>,
    ApiJson(body): ApiJson<InviteRequest>,
) -> ApiResult<Json<Value>> {
    let workspace_id = resource_id(path, "Workspace not found")?;
    let inviter = state
        .backend
        .workspace_membership(workspace_id, caller.user_id)
        .await?;
    if !inviter.is_some_and(|m| m.role.can_invite()) {
        return Err(ApiError::Forbidden(
            "Only owners and admins can invite members".to_string(),
        ));
    }
    let user_ids = body
        .user_ids
        .ok_or_else(|| {
            ApiError::validation(vec![FieldError::new("userIds", "userIds is required")])
        })?;

    let (workspace, inviter) = futures::join!(
        state.backend.workspace_by_id(workspace_id),
        state.backend.user_by_id(caller.user_id)
    );
    let workspace_name = workspace
        .ok()
        .flatten()
        .map(|w| w.name)
        .unwrap_or_else(|| "a workspace".to_string());
    let inviter_name = inviter
        .ok()
        .flatten()
        .map(|p| p.first_name)
        .unwrap_or_else(|| caller.email.clone());
    let message = format!(
        "{} invited you to join workspace \"{}\"",
        inviter_name, workspace_name
    );

    let outcomes = join_all(
        user_ids
            .iter()
            .map(|&user_id| invite_one(&state, workspace_id, user_id, body.role, &message)),
    )
    .await;

    let mut summary = InviteSummary {
        total: outcomes.len(),
        ..Default::default()
    };
    for (user_id, outcome) in user_ids.iter().zip(outcomes) {
        match outcome {
            Ok(InviteOutcome::Invited) => summary.invited += 1,
            Ok(InviteOutcome::AlreadyMember) => summary.already_member += 1,
            Err(e) => {
                warn!(workspace = %workspace_id, user_id, "Invitation failed: {}", e);
                summary.failed += 1;
            }
        }
    }

    Ok(Json(json!({
        "success": true,
        "message": format!("Invited {} new members to workspace", summary.invited),
        "data": summary,
    })))
}

async fn invite_one(
    state: &AppState,
    workspace: Uuid,
    user_id: UserId,
    role: MemberRole,
    message: &str,
) -> ApiResult<InviteOutcome> {
    if state
        .backend
        .workspace_membership(workspace, user_id)
        .await?
        .is_some()
    {
        return Ok(InviteOutcome::AlreadyMember);
    }
    state
        .backend
        .add_workspace_member(Membership {
            workspace,
            person: user_id,
            role,
            joined_at: Utc::now(),
        })
        .await?;
    state
        .notifications
        .send_notification(user_id, message, NotificationKind::Collaboration)
        .await?;
    Ok(InviteOutcome::Invited)
}
