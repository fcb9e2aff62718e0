//! Path formatting and weighting

use crate::services::GraphPath;
use serde::Serialize;
use serde_json::{Map, Value};

/// Weight contributed by one relationship of the given type
pub fn relationship_weight(rel_type: &str) -> u32 {
    match rel_type {
        "AUTHORED" => 10,
        "MENTORS" => 8,
        "WORKS_ON" => 6,
        "TAGGED_WITH" => 4,
        "RELATED_TO" => 2,
        _ => 1,
    }
}

pub fn path_weight(path: &GraphPath) -> u32 {
    path.relationships
        .iter()
        .map(|rel| relationship_weight(&rel.rel_type))
        .sum()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathNodeView {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: Option<String>,
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathEdgeView {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub edge_type: String,
    pub properties: Map<String, Value>,
}

/// A path shaped for visualisation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedPath {
    pub nodes: Vec<PathNodeView>,
    pub edges: Vec<PathEdgeView>,
    pub length: usize,
    pub weight: u32,
}

pub fn format_path(path: &GraphPath) -> FormattedPath {
    FormattedPath {
        nodes: path
            .nodes
            .iter()
            .map(|n| PathNodeView {
                id: n.id.clone(),
                node_type: n.labels.first().cloned(),
                properties: n.properties.clone(),
            })
            .collect(),
        edges: path
            .relationships
            .iter()
            .map(|r| PathEdgeView {
                source: r.start_node_element_id.clone(),
                target: r.end_node_element_id.clone(),
                edge_type: r.rel_type.clone(),
                properties: r.properties.clone(),
            })
            .collect(),
        length: path.length,
        weight: path_weight(path),
    }
}

/// Path with the fewest hops; the earliest one wins ties
pub fn shortest_path(paths: &[FormattedPath]) -> Option<&FormattedPath> {
    paths.iter().min_by_key(|p| p.length)
}
