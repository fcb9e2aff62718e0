//! HTTP gateway
//!
//! Router, middleware and request handlers in front of the knowledge backend.

pub mod extract;
pub mod handler;
pub mod rate_limit;
pub mod server;
pub mod state;

pub use extract::ApiJson;
pub use rate_limit::RateLimiter;
pub use server::{router, serve};
pub use state::AppState;
