//! Login, registration and token lifecycle

use crate::auth::{bearer_token, hash_password, verify_password, AuthUser, Validator};
use crate::backend::BackendError;
use crate::error::{ApiError, ApiResult};
use crate::http::{ApiJson, AppState};
use crate::models::{NewPerson, Person, Role};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub employee_id: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid credentials".to_string())
}

/// Argon2 is deliberately slow; keep it off the async workers
async fn hash_off_thread(password: String) -> ApiResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::from)
}

async fn verify_off_thread(password: String, stored: String) -> ApiResult<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &stored))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))
}

fn session(state: &AppState, user: &Person) -> ApiResult<Value> {
    Ok(json!({
        "success": true,
        "token": state.tokens.issue_session(user)?,
        "refreshToken": state.tokens.issue_refresh(user)?,
        "user": user,
    }))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> ApiResult<Json<Value>> {
    let mut validator = Validator::new();
    let email = validator.email("email", body.email.as_deref());
    let password = validator.required("password", body.password.as_deref());
    validator.finish()?;
    let (Some(email), Some(password)) = (email, password) else {
        return Err(invalid_credentials());
    };

    let user = state
        .backend
        .user_by_email(&email)
        .await?
        .ok_or_else(invalid_credentials)?;
    let stored = user.password.clone().unwrap_or_default();
    if stored.is_empty() || !verify_off_thread(password.to_string(), stored).await? {
        warn!(email = %email, "Failed login attempt");
        return Err(invalid_credentials());
    }

    info!(user_id = user.id, "User logged in");
    Ok(Json(session(&state, &user)?))
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut validator = Validator::new();
    let email = validator.email("email", body.email.as_deref());
    let password = validator.min_length("password", body.password.as_deref(), 6);
    let first_name = validator.required("firstName", body.first_name.as_deref());
    let last_name = validator.required("lastName", body.last_name.as_deref());
    let employee_id = validator.required("employeeId", body.employee_id.as_deref());
    validator.finish()?;
    let (Some(email), Some(password), Some(first_name), Some(last_name), Some(employee_id)) =
        (email, password, first_name, last_name, employee_id)
    else {
        return Err(ApiError::BadRequest("Validation failed".to_string()));
    };

    if state.backend.user_by_email(&email).await?.is_some() {
        return Err(ApiError::BadRequest("User already exists".to_string()));
    }

    let new_user = NewPerson {
        email,
        password: hash_off_thread(password.to_string()).await?,
        first_name: first_name.trim().to_string(),
        last_name: last_name.trim().to_string(),
        employee_id: employee_id.trim().to_string(),
        role: body.role.as_deref().and_then(Role::parse).unwrap_or_default(),
        is_active: true,
    };
    let user = match state.backend.create_user(new_user).await {
        Ok(user) => user,
        Err(BackendError::Conflict(_)) => {
            return Err(ApiError::BadRequest("User already exists".to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = user.id, "User registered");
    Ok((StatusCode::CREATED, Json(session(&state, &user)?)))
}

/// GET /api/auth/verify
pub async fn verify(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<Value>> {
    let token = bearer_token(&headers)
        .ok_or_else(|| ApiError::Unauthorized("No token provided".to_string()))?;
    let claims = state
        .tokens
        .verify_access(token)
        .map_err(|_| ApiError::Unauthorized("Invalid token".to_string()))?;
    let user = state
        .backend
        .user_by_id(claims.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;
    Ok(Json(json!({ "success": true, "user": user })))
}

/// POST /api/auth/refresh
///
/// The body is optional; anything unreadable counts as a missing token.
pub async fn refresh(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<Value>> {
    let request: RefreshRequest = serde_json::from_slice(&body).unwrap_or_default();
    let token = request
        .refresh_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Refresh token required".to_string()))?;
    let claims = state
        .tokens
        .verify_refresh(&token)
        .map_err(|_| ApiError::Unauthorized("Invalid refresh token".to_string()))?;
    let user = state
        .backend
        .user_by_id(claims.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;
    Ok(Json(json!({
        "success": true,
        "token": state.tokens.issue_refreshed(&user)?,
    })))
}

/// POST /api/auth/logout
///
/// Tokens are stateless, so there is nothing to revoke server-side.
pub async fn logout(caller: Option<AuthUser>) -> Json<Value> {
    if let Some(caller) = caller {
        info!(user_id = caller.user_id, "User logged out");
    }
    Json(json!({ "success": true, "message": "Logged out successfully" }))
}
