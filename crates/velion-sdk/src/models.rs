//! Request and response types of the gateway API

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// GET /health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub timestamp: String,
    pub service: String,
    pub version: String,
}

/// Tokens and profile returned by login and register
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: Value,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub employee_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// A file to upload; `data` holds the raw bytes
#[derive(Debug, Clone, Default)]
pub struct Upload {
    pub title: String,
    pub description: String,
    pub file_name: String,
    pub mime_type: String,
    pub document_type: Option<String>,
    pub data: Vec<u8>,
    pub metadata: Map<String, Value>,
}

/// Search parameters; unset fields use the gateway defaults
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub query: String,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub document_type: Option<String>,
    pub tag: Option<String>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub(crate) fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("query", self.query.clone())];
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status", status.clone()));
        }
        if let Some(kind) = &self.document_type {
            pairs.push(("documentType", kind.clone()));
        }
        if let Some(tag) = &self.tag {
            pairs.push(("tag", tag.clone()));
        }
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

/// The `data` member of a search response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPage {
    pub results: Vec<Value>,
    pub pagination: Pagination,
    pub query: String,
    #[serde(default)]
    pub filters: Value,
}

/// Graph view parameters; both entity fields select the entity-centred view
#[derive(Debug, Clone, Default)]
pub struct GraphRequest {
    pub entity_id: Option<String>,
    pub entity_type: Option<String>,
    pub depth: Option<u32>,
    pub limit: Option<usize>,
}

impl GraphRequest {
    pub fn entity(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            entity_id: Some(id.into()),
            entity_type: Some(kind.into()),
            ..Self::default()
        }
    }

    pub(crate) fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(id) = &self.entity_id {
            pairs.push(("entityId", id.clone()));
        }
        if let Some(kind) = &self.entity_type {
            pairs.push(("entityType", kind.clone()));
        }
        if let Some(depth) = self.depth {
            pairs.push(("depth", depth.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkspace {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub members: Vec<i64>,
    pub tags: Vec<String>,
    pub is_private: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_pairs() {
        let mut request = SearchRequest::new("data mesh");
        assert_eq!(request.pairs(), vec![("query", "data mesh".to_string())]);

        request.limit = Some(5);
        request.document_type = Some("RESEARCH".into());
        let pairs = request.pairs();
        assert_eq!(pairs[1], ("limit", "5".to_string()));
        assert_eq!(pairs[2], ("documentType", "RESEARCH".to_string()));
    }

    #[test]
    fn test_session_decoding() {
        let session: Session = serde_json::from_value(serde_json::json!({
            "success": true,
            "token": "a.b.c",
            "user": {"id": 1}
        }))
        .unwrap();
        assert_eq!(session.token, "a.b.c");
        assert!(session.refresh_token.is_none());
    }
}
