//! Per-user preferences

use crate::models::UserId;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use tokio::sync::RwLock;

fn defaults() -> Map<String, Value> {
    match json!({ "theme": "light", "notifications": true, "language": "en" }) {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// In-memory preference store; stored keys override the defaults
#[derive(Debug, Default)]
pub struct SettingsStore {
    stored: RwLock<HashMap<UserId, Map<String, Value>>>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, user: UserId) -> Map<String, Value> {
        let mut settings = defaults();
        if let Some(saved) = self.stored.read().await.get(&user) {
            settings.extend(saved.clone());
        }
        settings
    }

    /// Merge `patch` into the stored preferences and return the result
    pub async fn update(&self, user: UserId, patch: Map<String, Value>) -> Map<String, Value> {
        {
            let mut stored = self.stored.write().await;
            stored.entry(user).or_default().extend(patch);
        }
        self.get(user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_defaults_and_merge() {
        let store = SettingsStore::new();
        assert_eq!(Value::Object(store.get(1).await), json!({"theme": "light", "notifications": true, "language": "en"}));

        let mut patch = Map::new();
        patch.insert("theme".into(), json!("dark"));
        patch.insert("digest".into(), json!("weekly"));
        let merged = store.update(1, patch).await;
        assert_eq!(merged["theme"], "dark");
        assert_eq!(merged["language"], "en");
        assert_eq!(merged["digest"], "weekly");

        // other users keep the defaults
        assert_eq!(store.get(2).await["theme"], "light");
    }
}
