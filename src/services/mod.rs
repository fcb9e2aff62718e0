//! Integrations behind the gateway
//!
//! AI enrichment, the ledger, the graph store and notifications are not
//! wired to real systems yet. Each is a small service returning canned or
//! derived values so the rest of the gateway can be exercised end to end.

pub mod ai;
pub mod blockchain;
pub mod graph_source;
pub mod notification;
pub mod settings;

use thiserror::Error;

pub use ai::{AiResults, DocumentAnalysis, DocumentInput, KnowledgeAi, StubAi};
pub use blockchain::{BlockchainService, Transaction};
pub use graph_source::{
    EntityQuery, FixtureGraph, GraphData, GraphEdge, GraphNode, GraphPath, GraphSource, PathNode,
    PathQuery, PathRelationship,
};
pub use notification::NotificationService;
pub use settings::SettingsStore;

/// Integration errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("AI service error: {0}")]
    Ai(String),

    #[error("Blockchain error: {0}")]
    Blockchain(String),

    #[error("Graph store error: {0}")]
    Graph(String),

    #[error("Notification error: {0}")]
    Notification(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
