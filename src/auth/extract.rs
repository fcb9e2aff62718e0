//! Bearer-token extractor for protected handlers

use super::jwt::{Claims, TokenIssuer};
use crate::error::{ApiError, ApiResult};
use crate::models::{Role, UserId};
use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use std::sync::Arc;

/// The authenticated caller, taken from a verified access token
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
    pub employee_id: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
            role: claims.role,
            employee_id: claims.employee_id,
        }
    }
}

impl AuthUser {
    /// Reject callers whose role is not in `allowed`
    pub fn require_role(&self, allowed: &[Role]) -> ApiResult<()> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Insufficient permissions".to_string()))
        }
    }
}

/// Second word of an `Authorization` header value ("Bearer <token>")
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .split_whitespace()
        .nth(1)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<TokenIssuer>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::Unauthorized("Access token required".to_string()))?;
        let issuer = Arc::<TokenIssuer>::from_ref(state);
        let claims = issuer.verify_access(token)?;
        Ok(AuthUser::from(claims))
    }
}
