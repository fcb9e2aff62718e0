//! Microlearning modules and user notifications

use super::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LearningFormat {
    Video,
    Article,
    Quiz,
    Interactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// A short training unit; completions feed the dashboard's learning hours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MicrolearningModule {
    pub id: Uuid,
    pub title: String,
    pub format: LearningFormat,
    pub difficulty: Difficulty,
    pub duration_minutes: u32,
    #[serde(default)]
    pub completed_by: Vec<UserId>,
}

impl MicrolearningModule {
    /// Minutes spent on this module across everyone who completed it
    pub fn total_minutes(&self) -> u64 {
        self.duration_minutes as u64 * self.completed_by.len() as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    #[default]
    System,
    Validation,
    Collaboration,
    Learning,
    Achievement,
}

/// An in-app notification addressed to one person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub recipient: UserId,
    pub kind: NotificationKind,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(recipient: UserId, kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient,
            kind,
            message: message.into(),
            read: false,
            created_at: Utc::now(),
        }
    }
}
