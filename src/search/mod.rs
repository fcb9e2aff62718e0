//! Knowledge search helpers
//!
//! Query classification, relevance scoring and the per-result decorations
//! shown by the search page.

use crate::models::{Document, DocumentStatus, KnowledgeComponent, Person};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

const QUESTION_WORDS: [&str; 7] = ["what", "how", "why", "when", "where", "who", "which"];

/// Queries that read like a question are routed through semantic search
pub fn is_natural_language_query(query: &str) -> bool {
    let words: Vec<&str> = query.split_whitespace().collect();
    if words.len() > 3 {
        return true;
    }
    let first = words.first().map(|w| w.to_lowercase()).unwrap_or_default();
    QUESTION_WORDS.contains(&first.as_str()) || query.contains('?')
}

/// Relevance in [0, 100]: 40% quality, 30% recency, 30% popularity
pub fn relevance_score(doc: &Document, now: DateTime<Utc>) -> u32 {
    let quality = doc.quality_score.unwrap_or(0.0);
    let recency = (100.0 - doc.age_in_days(now) * 0.5).max(0.0);
    let popularity = (doc.view_count as f64 * 2.0).min(100.0);
    let score = quality * 0.4 + recency * 0.3 + popularity * 0.3;
    score.round().clamp(0.0, 100.0) as u32
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickAction {
    pub label: &'static str,
    pub action: &'static str,
    pub icon: &'static str,
}

const fn action(label: &'static str, action: &'static str, icon: &'static str) -> QuickAction {
    QuickAction { label, action, icon }
}

pub fn quick_actions(doc: &Document) -> Vec<QuickAction> {
    let mut actions = vec![
        action("View", "view", "visibility"),
        action("Download", "download", "download"),
    ];
    if doc.status == DocumentStatus::Published {
        actions.push(action("Share", "share", "share"));
        actions.push(action("Add to Workspace", "add_to_workspace", "workspace"));
    }
    if doc.blockchain_tx_id.is_some() {
        actions.push(action("Verify", "verify", "verified"));
    }
    actions
}

/// A search hit decorated for display
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedResult {
    #[serde(flatten)]
    pub document: Document,
    pub knowledge_component: Option<Value>,
    pub relevance_score: u32,
    pub quick_actions: Vec<QuickAction>,
}

/// Fold uploader details and knowledge into a search hit
pub fn enhance_result(
    mut doc: Document,
    uploader: Option<&Person>,
    component: Option<&KnowledgeComponent>,
    now: DateTime<Utc>,
) -> EnhancedResult {
    let (name, department, level) = match uploader {
        Some(p) => (
            p.full_name(),
            json!(p.department),
            serde_json::to_value(p.expertise_level).unwrap_or(Value::Null),
        ),
        None => ("Unknown".to_string(), Value::Null, Value::Null),
    };
    doc.metadata.insert("uploaderName".to_string(), json!(name));
    doc.metadata.insert("uploaderDepartment".to_string(), department);
    doc.metadata.insert("expertiseLevel".to_string(), level);

    let knowledge_component = component.map(|c| {
        json!({
            "summary": c.summary,
            "keyTopics": c.key_topics,
            "sentimentScore": c.sentiment_score,
            "complexityScore": c.complexity_score,
        })
    });

    EnhancedResult {
        relevance_score: relevance_score(&doc, now),
        quick_actions: quick_actions(&doc),
        knowledge_component,
        document: doc,
    }
}

/// `ceil(total / limit)`, zero when `limit` is zero
pub fn total_pages(total: u64, limit: u32) -> u64 {
    if limit == 0 {
        0
    } else {
        total.div_ceil(limit as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn doc() -> Document {
        serde_json::from_value(json!({
            "id": Uuid::new_v4(),
            "title": "Data Mesh Guide",
            "uploader": 1,
            "status": "DRAFT"
        }))
        .unwrap()
    }

    #[test]
    fn test_natural_language_detection() {
        assert!(is_natural_language_query("What is a data mesh"));
        assert!(is_natural_language_query("HOW to migrate"));
        assert!(is_natural_language_query("data mesh?"));
        assert!(is_natural_language_query("one two three four"));
        assert!(!is_natural_language_query("data mesh guide"));
        assert!(!is_natural_language_query("kubernetes"));
        assert!(!is_natural_language_query(""));
    }

    #[test]
    fn test_relevance_score() {
        let now = Utc::now();
        let mut d = doc();
        d.created_at = now;
        d.quality_score = Some(90.0);
        d.view_count = 10;
        // 36 + 30 + 6
        assert_eq!(relevance_score(&d, now), 72);

        d.created_at = now - Duration::days(400);
        d.quality_score = None;
        d.view_count = 500;
        // 0 + 0 + 30
        assert_eq!(relevance_score(&d, now), 30);

        d.created_at = now - Duration::days(20);
        d.quality_score = Some(100.0);
        // 40 + 27 + 30
        assert_eq!(relevance_score(&d, now), 97);
    }

    #[test]
    fn test_quick_actions() {
        let mut d = doc();
        let labels = |d: &Document| quick_actions(d).iter().map(|a| a.label).collect::<Vec<_>>();
        assert_eq!(labels(&d), vec!["View", "Download"]);
        d.status = DocumentStatus::Published;
        d.blockchain_tx_id = Some("tx_1".into());
        assert_eq!(
            labels(&d),
            vec!["View", "Download", "Share", "Add to Workspace", "Verify"]
        );
    }

    #[test]
    fn test_enhance_without_uploader() {
        let result = enhance_result(doc(), None, None, Utc::now());
        let wire = serde_json::to_value(&result).unwrap();
        assert_eq!(wire["metadata"]["uploaderName"], "Unknown");
        assert!(wire["knowledgeComponent"].is_null());
        assert_eq!(wire["title"], "Data Mesh Guide");
        assert_eq!(wire["quickActions"][0]["action"], "view");
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(41, 20), 3);
        assert_eq!(total_pages(40, 20), 2);
        assert_eq!(total_pages(5, 0), 0);
    }
}
