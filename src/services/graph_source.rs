//! Graph store access
//!
//! [`FixtureGraph`] answers every query with the same small graphs until a
//! real graph database is connected behind [`GraphSource`].

use super::ServiceResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub edge_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Node as returned inside a path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathNode {
    pub id: String,
    pub labels: Vec<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathRelationship {
    pub start_node_element_id: String,
    pub end_node_element_id: String,
    #[serde(rename = "type")]
    pub rel_type: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphPath {
    pub nodes: Vec<PathNode>,
    pub relationships: Vec<PathRelationship>,
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityQuery {
    pub entity_id: String,
    pub entity_type: String,
    pub depth: u32,
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathQuery {
    pub source_id: Option<String>,
    pub target_id: Option<String>,
    pub max_depth: u32,
}

#[async_trait]
pub trait GraphSource: Send + Sync {
    /// Neighbourhood of one entity
    async fn entity_graph(&self, query: &EntityQuery) -> ServiceResult<GraphData>;

    /// Sample of the whole network
    async fn overview_graph(&self, limit: usize) -> ServiceResult<GraphData>;

    async fn find_paths(&self, query: &PathQuery) -> ServiceResult<Vec<GraphPath>>;

    async fn create_node(&self, label: &str, properties: Map<String, Value>) -> ServiceResult<Value>;

    async fn create_relationship(
        &self,
        from: &str,
        to: &str,
        rel_type: &str,
        properties: Map<String, Value>,
    ) -> ServiceResult<Value>;

    async fn find_connections(&self, node_id: &str, depth: u32) -> ServiceResult<Vec<Value>>;
}

#[derive(Debug, Clone, Default)]
pub struct FixtureGraph;

impl FixtureGraph {
    pub fn new() -> Self {
        Self
    }
}

fn props(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn node(id: &str, label: &str, properties: Value) -> GraphNode {
    GraphNode {
        id: id.to_string(),
        label: label.to_string(),
        properties: props(properties),
    }
}

fn edge(from: &str, to: &str, edge_type: &str) -> GraphEdge {
    GraphEdge {
        from: from.to_string(),
        to: to.to_string(),
        edge_type: edge_type.to_string(),
    }
}

#[async_trait]
impl GraphSource for FixtureGraph {
    async fn entity_graph(&self, _query: &EntityQuery) -> ServiceResult<GraphData> {
        Ok(GraphData {
            nodes: vec![
                node("1", "Document", json!({"title": "Sample Document", "type": "pdf"})),
                node("2", "User", json!({"name": "John Doe", "role": "consultant"})),
                node("3", "Project", json!({"name": "AI Project", "status": "active"})),
            ],
            edges: vec![
                edge("1", "2", "CREATED_BY"),
                edge("2", "3", "WORKS_ON"),
                edge("1", "3", "BELONGS_TO"),
            ],
        })
    }

    async fn overview_graph(&self, _limit: usize) -> ServiceResult<GraphData> {
        Ok(GraphData {
            nodes: vec![
                node("1", "Document", json!({"title": "Overview Doc 1"})),
                node("2", "User", json!({"name": "User 1"})),
                node("3", "Project", json!({"name": "Project 1"})),
                node("4", "Knowledge", json!({"topic": "AI"})),
            ],
            edges: vec![
                edge("1", "2", "LINKED"),
                edge("2", "3", "PARTICIPATES"),
                edge("3", "4", "USES"),
            ],
        })
    }

    async fn find_paths(&self, query: &PathQuery) -> ServiceResult<Vec<GraphPath>> {
        let source = query.source_id.clone().unwrap_or_else(|| "1".to_string());
        let target = query.target_id.clone().unwrap_or_else(|| "3".to_string());
        let path_node = |id: &str, label: &str, properties: Value| PathNode {
            id: id.to_string(),
            labels: vec![label.to_string()],
            properties: props(properties),
        };
        let rel = |from: &str, to: &str, rel_type: &str| PathRelationship {
            start_node_element_id: from.to_string(),
            end_node_element_id: to.to_string(),
            rel_type: rel_type.to_string(),
            properties: Map::new(),
        };
        Ok(vec![GraphPath {
            nodes: vec![
                path_node(&source, "Document", json!({"title": "Source Doc"})),
                path_node("2", "User", json!({"name": "Connector"})),
                path_node(&target, "Project", json!({"name": "Target Project"})),
            ],
            relationships: vec![rel(&source, "2", "LINKED"), rel("2", &target, "WORKS_ON")],
            length: 2,
        }])
    }

    async fn create_node(&self, label: &str, properties: Map<String, Value>) -> ServiceResult<Value> {
        let mut node = properties;
        node.insert("id".to_string(), json!(Uuid::new_v4()));
        node.insert("label".to_string(), json!(label));
        Ok(Value::Object(node))
    }

    async fn create_relationship(
        &self,
        from: &str,
        to: &str,
        rel_type: &str,
        properties: Map<String, Value>,
    ) -> ServiceResult<Value> {
        let mut rel = properties;
        rel.insert("id".to_string(), json!(Uuid::new_v4()));
        rel.insert("from".to_string(), json!(from));
        rel.insert("to".to_string(), json!(to));
        rel.insert("type".to_string(), json!(rel_type));
        Ok(Value::Object(rel))
    }

    async fn find_connections(&self, _node_id: &str, _depth: u32) -> ServiceResult<Vec<Value>> {
        Ok(Vec::new())
    }
}
