//! Domain records exchanged with the knowledge backend
//!
//! Field names are snake_case on the wire, matching what the backend stores.

pub mod document;
pub mod learning;
pub mod user;
pub mod workspace;

pub use document::{
    Document, DocumentReview, DocumentStatus, DocumentType, DocumentUpdate, KnowledgeComponent,
    NewDocument, ReviewAction, ValidationActivity, ValidationStatus,
};
pub use learning::{Difficulty, LearningFormat, MicrolearningModule, Notification, NotificationKind};
pub use user::{ExpertiseLevel, NewPerson, Person, ProfileUpdate, Role, UserId};
pub use workspace::{
    Comment, MemberRole, Membership, NewWorkspace, Project, ProjectStatus, Workspace,
    WorkspaceActivity, WorkspaceMember, WorkspaceType,
};
