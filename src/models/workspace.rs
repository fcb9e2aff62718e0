//! Projects, collaborative workspaces and their activity

use super::user::{Person, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    #[default]
    Planning,
    Active,
    OnHold,
    Completed,
    Archived,
}

/// A client engagement that documents and workspaces can belong to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: ProjectStatus,
    pub created_by: UserId,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkspaceType {
    #[default]
    Project,
    Department,
    Interest,
    Client,
}

/// A collaborative space grouping people and documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub workspace_type: WorkspaceType,
    #[serde(default)]
    pub project: Option<Uuid>,
    pub created_by: UserId,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when a workspace is created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorkspace {
    pub name: String,
    pub description: String,
    pub workspace_type: WorkspaceType,
    pub project: Option<Uuid>,
    pub created_by: UserId,
    pub is_private: bool,
    pub tags: Vec<String>,
}

/// Role of a person inside one workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberRole {
    Owner,
    Admin,
    #[default]
    Member,
    Guest,
}

impl MemberRole {
    /// Roles allowed to attach documents
    pub fn can_contribute(&self) -> bool {
        matches!(self, MemberRole::Owner | MemberRole::Admin | MemberRole::Member)
    }

    /// Roles allowed to invite other people
    pub fn can_invite(&self) -> bool {
        matches!(self, MemberRole::Owner | MemberRole::Admin)
    }
}

/// Membership of a person in a workspace; unique per (workspace, person)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub workspace: Uuid,
    pub person: UserId,
    #[serde(default)]
    pub role: MemberRole,
    #[serde(default = "Utc::now")]
    pub joined_at: DateTime<Utc>,
}

/// A member listing entry: the person together with their workspace role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceMember {
    #[serde(flatten)]
    pub person: Person,
    pub membership_role: MemberRole,
}

/// A comment left on a document inside a workspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub document: Uuid,
    pub workspace: Uuid,
    pub author: Person,
    pub body: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// An entry in a workspace's audit trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceActivity {
    pub workspace: Uuid,
    pub user: UserId,
    pub activity_type: String,
    #[serde(default)]
    pub details: Value,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}
