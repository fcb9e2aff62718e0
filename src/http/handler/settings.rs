//! Caller preferences

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::http::{ApiJson, AppState};
use axum::extract::State;
use axum::Json;
use serde_json::{Map, Value};

/// GET /api/settings
pub async fn get(State(state): State<AppState>, caller: AuthUser) -> Json<Map<String, Value>> {
    Json(state.settings.get(caller.user_id).await)
}

/// PUT /api/settings
pub async fn update(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(body): ApiJson<Value>,
) -> ApiResult<Json<Map<String, Value>>> {
    let Value::Object(patch) = body else {
        return Err(ApiError::BadRequest(
            "Settings must be a JSON object".to_string(),
        ));
    };
    Ok(Json(state.settings.update(caller.user_id, patch).await))
}
