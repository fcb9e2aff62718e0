//! Knowledge search

use crate::auth::AuthUser;
use crate::backend::{SearchFilters, SearchParams};
use crate::error::{ApiError, ApiResult, FieldError};
use crate::http::AppState;
use crate::models::{Document, DocumentStatus, DocumentType};
use crate::search::{enhance_result, is_natural_language_query, total_pages, EnhancedResult};
use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use futures::future::try_join_all;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Raw query string; numbers are parsed by hand so bad input gets field errors
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub query: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
    pub document_type: Option<String>,
    pub tag: Option<String>,
}

impl SearchQuery {
    /// Validate into backend parameters, collecting every bad field
    pub fn into_params(self) -> ApiResult<SearchParams> {
        let mut errors = Vec::new();

        let query = self.query.as_deref().map(str::trim).unwrap_or_default();
        if query.is_empty() {
            errors.push(FieldError::new("query", "query is required"));
        }

        let page = match self.page.as_deref() {
            None | Some("") => Some(1),
            Some(raw) => raw.trim().parse::<u32>().ok().filter(|p| *p >= 1),
        };
        if page.is_none() {
            errors.push(FieldError::new("page", "page must be a positive integer"));
        }

        let limit = match self.limit.as_deref() {
            None | Some("") => Some(DEFAULT_PAGE_SIZE),
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|l| (1..=MAX_PAGE_SIZE).contains(l)),
        };
        if limit.is_none() {
            errors.push(FieldError::new(
                "limit",
                format!("limit must be between 1 and {}", MAX_PAGE_SIZE),
            ));
        }

        let mut filters = SearchFilters {
            tag: self.tag.filter(|t| !t.trim().is_empty()),
            ..Default::default()
        };
        if let Some(raw) = self.status.as_deref().filter(|s| !s.is_empty()) {
            match DocumentStatus::parse(raw) {
                Some(status) => filters.status = Some(status),
                None => errors.push(FieldError::new("status", "Unknown document status")),
            }
        }
        if let Some(raw) = self.document_type.as_deref().filter(|s| !s.is_empty()) {
            match DocumentType::parse(raw) {
                Some(kind) => filters.document_type = Some(kind),
                None => errors.push(FieldError::new("documentType", "Unknown document type")),
            }
        }

        match (page, limit) {
            (Some(page), Some(limit)) if errors.is_empty() => Ok(SearchParams {
                query: query.to_string(),
                filters,
                page,
                limit,
            }),
            _ => Err(ApiError::validation(errors)),
        }
    }
}

async fn enhance(state: &AppState, doc: Document) -> ApiResult<EnhancedResult> {
    let (component, uploader) = futures::join!(
        state.backend.knowledge_component(doc.id),
        state.backend.user_by_id(doc.uploader)
    );
    let (component, uploader) = (component?, uploader?);
    Ok(enhance_result(doc, uploader.as_ref(), component.as_ref(), Utc::now()))
}

/// GET /api/search
pub async fn search(
    State(state): State<AppState>,
    _caller: AuthUser,
    query: Result<Query<SearchQuery>, axum::extract::rejection::QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(raw) = query?;
    let mut params = raw.into_params()?;
    let original_query = params.query.clone();

    if is_natural_language_query(&params.query) {
        let rewritten = state.ai.semantic_search(&params.query).await?;
        debug!(query = %params.query, rewritten = %rewritten, "Semantic rewrite");
        params.query = rewritten;
    }

    let page = state.backend.search_documents(&params).await?;
    let total = page.total;
    let results = try_join_all(page.documents.into_iter().map(|doc| enhance(&state, doc))).await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "results": results,
            "pagination": {
                "page": params.page,
                "limit": params.limit,
                "total": total,
                "totalPages": total_pages(total, params.limit),
            },
            "query": original_query,
            "filters": params.filters,
        },
    })))
}
