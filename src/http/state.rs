//! Shared handler state

use super::rate_limit::RateLimiter;
use crate::auth::TokenIssuer;
use crate::backend::KnowledgeBackend;
use crate::config::ServerConfig;
use crate::services::{
    BlockchainService, FixtureGraph, GraphSource, KnowledgeAi, NotificationService, SettingsStore,
    StubAi,
};
use axum::extract::FromRef;
use std::sync::Arc;

/// Everything a handler can reach; cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub backend: Arc<dyn KnowledgeBackend>,
    pub tokens: Arc<TokenIssuer>,
    pub ai: Arc<dyn KnowledgeAi>,
    pub ledger: Arc<BlockchainService>,
    pub graph: Arc<dyn GraphSource>,
    pub notifications: Arc<NotificationService>,
    pub settings: Arc<SettingsStore>,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    /// State with the stub integrations
    pub fn new(config: ServerConfig, backend: Arc<dyn KnowledgeBackend>) -> Self {
        Self {
            tokens: Arc::new(TokenIssuer::from_config(&config)),
            limiter: Arc::new(RateLimiter::new(&config.rate_limit)),
            config: Arc::new(config),
            backend,
            ai: Arc::new(StubAi::new()),
            ledger: Arc::new(BlockchainService::new()),
            graph: Arc::new(FixtureGraph::new()),
            notifications: Arc::new(NotificationService::new()),
            settings: Arc::new(SettingsStore::new()),
        }
    }

    pub fn with_ai(mut self, ai: Arc<dyn KnowledgeAi>) -> Self {
        self.ai = ai;
        self
    }

    pub fn with_graph(mut self, graph: Arc<dyn GraphSource>) -> Self {
        self.graph = graph;
        self
    }
}

impl FromRef<AppState> for Arc<TokenIssuer> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.tokens)
    }
}
