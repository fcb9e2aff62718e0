//! Network analytics

use crate::auth::AuthUser;
use crate::backend::{DashboardStats, Timeframe};
use crate::http::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    pub timeframe: Option<String>,
}

/// GET /api/analytics
///
/// Returns the backend's stats unwrapped; failures keep the bare
/// `{"error": ...}` shape the dashboard client expects.
pub async fn analytics(
    State(state): State<AppState>,
    _caller: AuthUser,
    Query(query): Query<AnalyticsQuery>,
) -> Response {
    let timeframe = Timeframe::parse(query.timeframe.as_deref().unwrap_or_default());
    match state.backend.dashboard_stats(timeframe).await {
        Ok(stats) => Json::<DashboardStats>(stats).into_response(),
        Err(e) => {
            error!(timeframe = timeframe.as_str(), "Analytics error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch analytics" })),
            )
                .into_response()
        }
    }
}
