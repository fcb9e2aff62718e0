//! Velion DKN API Gateway
//!
//! The REST gateway of the Velion Digital Knowledge Network. It authenticates
//! callers, validates input, and orchestrates the knowledge backend (a Django
//! REST service) together with the enrichment, ledger, graph and notification
//! integrations.
//!
//! # Architecture
//!
//! - [`http`]: axum router, middleware stack and request handlers
//! - [`auth`]: argon2 password hashes, HS256 bearer tokens, field validation
//! - [`backend`]: the [`KnowledgeBackend`] seam with Django and in-memory
//!   implementations
//! - [`services`]: stand-ins for the AI, ledger, graph and notification
//!   integrations
//! - [`knowledge_graph`] / [`search`]: display and ranking heuristics
//! - [`config`]: environment-driven [`ServerConfig`]
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use velion::{AppState, MemoryBackend, ServerConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = MemoryBackend::with_demo_data()?;
//! let state = AppState::new(ServerConfig::default(), Arc::new(backend));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3002").await?;
//! velion::http::serve(listener, state).await?;
//! # Ok(())
//! # }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod http;
pub mod knowledge_graph;
pub mod models;
pub mod search;
pub mod services;

// Re-export main types for convenience
pub use auth::{AuthError, AuthResult, AuthUser, TokenIssuer};
pub use backend::{BackendError, BackendResult, DjangoBackend, KnowledgeBackend, MemoryBackend};
pub use config::{BackendKind, ConfigError, ConfigResult, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use http::{router, AppState};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
