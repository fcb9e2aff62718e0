//! Display heuristics for knowledge graph views
//!
//! Raw graphs from a [`GraphSource`](crate::services::GraphSource) are
//! decorated with colours, sizes, widths and labels for the web client.

pub mod paths;

pub use paths::{format_path, path_weight, shortest_path, FormattedPath};

use crate::services::{GraphData, GraphEdge, GraphNode};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};

const DEFAULT_COLOR: &str = "#757575";
const BASE_NODE_SIZE: f64 = 20.0;
const MAX_NODE_SIZE: f64 = 100.0;

pub fn node_color(label: &str) -> &'static str {
    match label {
        "Document" => "#4caf50",
        "User" => "#2196f3",
        "Project" => "#9c27b0",
        "Knowledge" => "#ff9800",
        "Client" => "#f44336",
        "Department" => "#607d8b",
        _ => DEFAULT_COLOR,
    }
}

pub fn edge_color(edge_type: &str) -> &'static str {
    match edge_type {
        "AUTHORED" => "#4caf50",
        "BELONGS_TO" => "#2196f3",
        "TAGGED_WITH" => "#ff9800",
        "RELATED_TO" => "#9c27b0",
        "WORKS_ON" => "#f44336",
        "MENTORS" => "#607d8b",
        _ => DEFAULT_COLOR,
    }
}

pub fn edge_width(edge_type: &str) -> u32 {
    match edge_type {
        "AUTHORED" | "MENTORS" => 3,
        "BELONGS_TO" | "TAGGED_WITH" | "WORKS_ON" => 2,
        _ => 1,
    }
}

/// "WORKS_ON" -> "WORKS ON"
pub fn edge_label(edge_type: &str) -> String {
    edge_type.replace('_', " ")
}

fn text_or(properties: &Map<String, Value>, key: &str, fallback: &str) -> Value {
    match properties.get(key).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => Value::String(s.to_string()),
        _ => Value::String(fallback.to_string()),
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Display attributes added to a node, keyed by its label
pub fn enrich_node(node: &GraphNode, now: DateTime<Utc>) -> Map<String, Value> {
    let p = &node.properties;
    match node.label.as_str() {
        "Document" => object(json!({
            "title": text_or(p, "title", "Sample Document"),
            "qualityScore": 85,
            "status": "approved",
            "tags": ["sample"],
            "createdDate": now.to_rfc3339_opts(SecondsFormat::Millis, true),
            "icon": "description",
        })),
        "User" => object(json!({
            "name": text_or(p, "name", "Sample User"),
            "department": "IT",
            "expertiseLevel": "intermediate",
            "icon": "person",
        })),
        "Project" => object(json!({
            "name": text_or(p, "name", "Sample Project"),
            "status": "active",
            "client": "Sample Client",
            "icon": "project",
        })),
        _ => object(json!({ "icon": "default" })),
    }
}

/// Node radius in [20, 100]
pub fn node_size(label: &str, details: &Map<String, Value>) -> f64 {
    let bonus = match label {
        "Document" => details.get("qualityScore").and_then(Value::as_f64).unwrap_or(0.0) / 10.0,
        "User" => match details.get("expertiseLevel").and_then(Value::as_str) {
            Some("SENIOR") => 15.0,
            Some("LEAD") => 20.0,
            _ => 0.0,
        },
        "Project" => 10.0,
        _ => 0.0,
    };
    (BASE_NODE_SIZE + bonus).clamp(BASE_NODE_SIZE, MAX_NODE_SIZE)
}

#[derive(Debug, Clone, Serialize)]
pub struct EnhancedNode {
    #[serde(flatten)]
    pub node: GraphNode,
    #[serde(flatten)]
    pub details: Map<String, Value>,
    pub color: &'static str,
    pub size: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnhancedEdge {
    #[serde(flatten)]
    pub edge: GraphEdge,
    pub width: u32,
    pub label: String,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnhancedGraph {
    pub nodes: Vec<EnhancedNode>,
    pub edges: Vec<EnhancedEdge>,
}

pub fn enhance_graph(graph: GraphData, now: DateTime<Utc>) -> EnhancedGraph {
    let nodes = graph
        .nodes
        .into_iter()
        .map(|node| {
            let details = enrich_node(&node, now);
            EnhancedNode {
                color: node_color(&node.label),
                size: node_size(&node.label, &details),
                node,
                details,
            }
        })
        .collect();
    let edges = graph
        .edges
        .into_iter()
        .map(|edge| EnhancedEdge {
            width: edge_width(&edge.edge_type),
            label: edge_label(&edge.edge_type),
            color: edge_color(&edge.edge_type),
            edge,
        })
        .collect();
    EnhancedGraph { nodes, edges }
}
