//! Caller profile

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::http::{ApiJson, AppState};
use crate::models::{ExpertiseLevel, Person, ProfileUpdate};
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::info;

/// Fields a user may change on their own profile; anything else is ignored
#[derive(Debug, Default, Deserialize)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department: Option<String>,
    pub region: Option<String>,
    pub skills: Option<Vec<String>>,
    pub expertise_level: Option<ExpertiseLevel>,
}

impl ProfileChanges {
    fn into_update(self) -> ProfileUpdate {
        ProfileUpdate {
            first_name: self.first_name,
            last_name: self.last_name,
            department: self.department,
            region: self.region,
            skills: self.skills,
            expertise_level: self.expertise_level,
            profile_completion: None,
        }
    }
}

fn not_found() -> ApiError {
    ApiError::NotFound("User not found".to_string())
}

/// GET /api/users/profile
pub async fn profile(State(state): State<AppState>, caller: AuthUser) -> ApiResult<Json<Person>> {
    let user = state
        .backend
        .user_by_id(caller.user_id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(user))
}

/// PUT /api/users/profile
pub async fn update_profile(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiJson(changes): ApiJson<ProfileChanges>,
) -> ApiResult<Json<Person>> {
    let mut update = changes.into_update();
    let current = state
        .backend
        .user_by_id(caller.user_id)
        .await?
        .ok_or_else(not_found)?;

    let mut preview = current.clone();
    update.apply(&mut preview);
    let completion = preview.compute_profile_completion();
    if completion != current.profile_completion {
        update.profile_completion = Some(completion);
    }

    let user = state
        .backend
        .update_user(caller.user_id, &update)
        .await?
        .ok_or_else(not_found)?;
    info!(user_id = user.id, completion = user.profile_completion, "Profile updated");
    Ok(Json(user))
}
