//! Request handlers, one module per route group

pub mod analytics;
pub mod auth;
pub mod dashboard;
pub mod documents;
pub mod graph;
pub mod health;
pub mod search;
pub mod settings;
pub mod users;
pub mod workspaces;

use crate::error::{ApiError, ApiResult};
use axum::extract::rejection::PathRejection;
use axum::extract::Path;
use uuid::Uuid;

/// Parse a `:id` path segment, treating anything that is not a UUID as an
/// unknown resource
pub(crate) fn resource_id(
    path: Result<Path<String>, PathRejection>,
    not_found: &str,
) -> ApiResult<Uuid> {
    let Path(raw) = path?;
    Uuid::parse_str(&raw).map_err(|_| ApiError::NotFound(not_found.to_string()))
}
