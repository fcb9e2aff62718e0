//! Home dashboard widgets
//!
//! Each widget degrades to a fixed showcase payload when the backend is
//! unavailable, so the landing page always renders.

use crate::auth::AuthUser;
use crate::backend::{BackendResult, NetworkTotals};
use crate::http::AppState;
use crate::models::{Document, Person, UserId};
use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use tracing::warn;

const RECOMMENDATION_LIMIT: usize = 10;
const ACTIVITY_LIMIT: usize = 5;

/// Headline numbers for the dashboard cards
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub documents: u64,
    pub collaborators: u64,
    pub learning_hours: u64,
    pub efficiency: u64,
    pub published_documents: u64,
    pub total_views: u64,
}

impl DashboardSummary {
    pub fn fallback() -> Self {
        Self {
            documents: 2450,
            collaborators: 187,
            learning_hours: 245,
            efficiency: 33,
            published_documents: 124,
            total_views: 5678,
        }
    }

    /// Zero counts are shown as the showcase figures
    pub fn from_totals(totals: &NetworkTotals) -> Self {
        let fallback = Self::fallback();
        let or = |value: u64, default: u64| if value == 0 { default } else { value };
        Self {
            documents: or(totals.documents, fallback.documents),
            collaborators: or(totals.users, fallback.collaborators),
            learning_hours: or(
                (totals.learning_minutes as f64 / 60.0).round() as u64,
                fallback.learning_hours,
            ),
            efficiency: fallback.efficiency,
            published_documents: or(totals.published_documents, fallback.published_documents),
            total_views: or(totals.total_views, fallback.total_views),
        }
    }
}

/// "Just now", "5 min ago", "1 hour ago", "3 days ago"
pub fn format_time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    if seconds < 60 {
        return "Just now".to_string();
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{} min ago", minutes);
    }
    let plural = |n: i64| if n > 1 { "s" } else { "" };
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{} hour{} ago", hours, plural(hours));
    }
    let days = hours / 24;
    format!("{} day{} ago", days, plural(days))
}

async fn uploaders(state: &AppState, documents: &[Document]) -> HashMap<UserId, Person> {
    let ids: HashSet<UserId> = documents.iter().map(|d| d.uploader).collect();
    join_all(ids.into_iter().map(|id| state.backend.user_by_id(id)))
        .await
        .into_iter()
        .filter_map(|found| found.ok().flatten())
        .map(|p| (p.id, p))
        .collect()
}

fn author_of(people: &HashMap<UserId, Person>, doc: &Document) -> Option<(String, String)> {
    people
        .get(&doc.uploader)
        .map(|p| (p.full_name(), p.initials()))
}

/// GET /api/dashboard/stats
pub async fn stats(State(state): State<AppState>, _caller: AuthUser) -> Json<DashboardSummary> {
    match state.backend.network_totals().await {
        Ok(totals) => Json(DashboardSummary::from_totals(&totals)),
        Err(e) => {
            warn!("Dashboard stats unavailable, serving fallback: {}", e);
            Json(DashboardSummary::fallback())
        }
    }
}

async fn load_recommendations(state: &AppState) -> BackendResult<Vec<Value>> {
    let documents = state.backend.recent_documents(RECOMMENDATION_LIMIT).await?;
    let people = uploaders(state, &documents).await;
    Ok(documents
        .iter()
        .map(|doc| {
            let (author, initials) = author_of(&people, doc).unzip();
            json!({
                "id": doc.id,
                "title": doc.title,
                "description": doc.description,
                "type": doc.document_type.as_str().to_lowercase(),
                "author": author.unwrap_or_else(|| "Unknown".to_string()),
                "date": doc.created_at.format("%-m/%-d/%Y").to_string(),
                "tags": doc.tags,
                "contributors": initials.into_iter().collect::<Vec<_>>(),
                "views": doc.view_count,
                "rating": 0,
                "status": doc.status,
                "qualityScore": doc.quality_score,
            })
        })
        .collect())
}

fn fallback_recommendations() -> Value {
    json!([
        {
            "id": "1",
            "title": "AI-Powered Logistics Optimization",
            "description": "Advanced machine learning techniques for supply chain optimization",
            "type": "research",
            "author": "Dr. Sarah Chen",
            "date": "2 days ago",
            "tags": ["AI", "Logistics", "Machine Learning"],
            "contributors": ["SC"],
            "views": 1245,
            "rating": 4.8,
            "status": "published",
            "qualityScore": 92
        },
        {
            "id": "2",
            "title": "Blockchain Implementation Guide",
            "description": "Step-by-step guide for implementing blockchain in enterprise systems",
            "type": "guide",
            "author": "Michael Rodriguez",
            "date": "1 week ago",
            "tags": ["Blockchain", "Enterprise", "Security"],
            "contributors": ["MR"],
            "views": 892,
            "rating": 4.5,
            "status": "published",
            "qualityScore": 88
        }
    ])
}

/// GET /api/dashboard/recommendations
pub async fn recommendations(State(state): State<AppState>, _caller: AuthUser) -> Json<Value> {
    match load_recommendations(&state).await {
        Ok(items) => Json(Value::Array(items)),
        Err(e) => {
            warn!("Recommendations unavailable, serving fallback: {}", e);
            Json(fallback_recommendations())
        }
    }
}

async fn load_activity(state: &AppState, now: DateTime<Utc>) -> BackendResult<Vec<Value>> {
    let documents = state.backend.recent_documents(ACTIVITY_LIMIT).await?;
    let people = uploaders(state, &documents).await;
    Ok(documents
        .iter()
        .map(|doc| {
            let (author, initials) = author_of(&people, doc).unzip();
            json!({
                "id": doc.id,
                "time": format_time_ago(doc.created_at, now),
                "description": format!(
                    "{} uploaded \"{}\"",
                    author.unwrap_or_else(|| "Someone".to_string()),
                    doc.title
                ),
                "participants": [initials.unwrap_or_else(|| "U".to_string())],
                "type": "upload",
            })
        })
        .collect())
}

fn fallback_activity() -> Value {
    json!([
        {
            "id": 1,
            "time": "Just now",
            "description": "You uploaded \"AI Ethics Guidelines\"",
            "participants": ["JD"],
            "type": "upload"
        },
        {
            "id": 2,
            "time": "5 min ago",
            "description": "Sarah validated your document",
            "participants": ["SC", "JD"],
            "type": "validation"
        },
        {
            "id": 3,
            "time": "1 hour ago",
            "description": "New collaboration workspace created",
            "participants": ["JD", "MR", "EW"],
            "type": "collaboration"
        },
        {
            "id": 4,
            "time": "2 hours ago",
            "description": "You completed \"Machine Learning Basics\"",
            "participants": ["JD"],
            "type": "learning"
        }
    ])
}

/// GET /api/dashboard/activity
pub async fn activity(State(state): State<AppState>, _caller: AuthUser) -> Json<Value> {
    match load_activity(&state, Utc::now()).await {
        Ok(items) => Json(Value::Array(items)),
        Err(e) => {
            warn!("Activity feed unavailable, serving fallback: {}", e);
            Json(fallback_activity())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_time_ago() {
        let now = Utc::now();
        assert_eq!(format_time_ago(now - Duration::seconds(59), now), "Just now");
        assert_eq!(format_time_ago(now - Duration::minutes(5), now), "5 min ago");
        assert_eq!(format_time_ago(now - Duration::minutes(60), now), "1 hour ago");
        assert_eq!(format_time_ago(now - Duration::hours(5), now), "5 hours ago");
        assert_eq!(format_time_ago(now - Duration::hours(24), now), "1 day ago");
        assert_eq!(format_time_ago(now - Duration::days(3), now), "3 days ago");
        // clock skew
        assert_eq!(format_time_ago(now + Duration::minutes(2), now), "Just now");
    }

    #[test]
    fn test_summary_from_totals() {
        let summary = DashboardSummary::from_totals(&NetworkTotals {
            documents: 3,
            users: 2,
            published_documents: 0,
            total_views: 78,
            learning_minutes: 40,
        });
        assert_eq!(summary.documents, 3);
        assert_eq!(summary.collaborators, 2);
        assert_eq!(summary.learning_hours, 1);
        assert_eq!(summary.published_documents, 124);
        assert_eq!(summary.total_views, 78);
        assert_eq!(summary.efficiency, 33);
    }

    #[test]
    fn test_fallback_shape() {
        let wire = serde_json::to_value(DashboardSummary::fallback()).unwrap();
        assert_eq!(wire["learningHours"], 245);
        assert_eq!(wire["publishedDocuments"], 124);
        assert_eq!(fallback_activity()[1]["time"], "5 min ago");
        assert_eq!(fallback_recommendations()[0]["qualityScore"], 92);
    }
}
