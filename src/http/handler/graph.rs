//! Knowledge graph views

use crate::error::{ApiError, ApiResult};
use crate::http::AppState;
use crate::knowledge_graph::{enhance_graph, format_path, shortest_path, FormattedPath};
use crate::services::{EntityQuery, PathQuery};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

const DEFAULT_DEPTH: u32 = 2;
const DEFAULT_LIMIT: usize = 50;
const MAX_PATH_DEPTH: u32 = 4;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQuery {
    pub entity_id: Option<String>,
    pub entity_type: Option<String>,
    pub depth: Option<u32>,
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionsQuery {
    pub source_id: Option<String>,
    pub target_id: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// GET /api/graph
pub async fn graph(
    State(state): State<AppState>,
    query: Result<Query<GraphQuery>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(query) = query?;
    let depth = query.depth.unwrap_or(DEFAULT_DEPTH);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    let entity_id = present(query.entity_id);
    let entity_type = present(query.entity_type);

    let data = match (&entity_id, &entity_type) {
        (Some(id), Some(kind)) => {
            state
                .graph
                .entity_graph(&EntityQuery {
                    entity_id: id.clone(),
                    entity_type: kind.clone(),
                    depth,
                    limit,
                })
                .await?
        }
        _ => state.graph.overview_graph(limit).await?,
    };
    let now = Utc::now();
    let enhanced = enhance_graph(data, now);

    Ok(Json(json!({
        "success": true,
        "metadata": {
            "generatedAt": now.to_rfc3339_opts(SecondsFormat::Millis, true),
            "entityId": entity_id,
            "entityType": entity_type,
            "depth": depth,
            "totalNodes": enhanced.nodes.len(),
            "totalEdges": enhanced.edges.len(),
        },
        "data": enhanced,
    })))
}

/// GET /api/graph/connections
pub async fn connections(
    State(state): State<AppState>,
    query: Result<Query<ConnectionsQuery>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(query) = query?;
    let paths = state
        .graph
        .find_paths(&PathQuery {
            source_id: present(query.source_id),
            target_id: present(query.target_id),
            max_depth: MAX_PATH_DEPTH,
        })
        .await
        .map_err(ApiError::from)?;
    let formatted: Vec<FormattedPath> = paths.iter().map(format_path).collect();

    Ok(Json(json!({
        "success": true,
        "data": {
            "shortestPath": shortest_path(&formatted),
            "totalPaths": formatted.len(),
            "paths": formatted,
        },
    })))
}
