//! Router assembly and the listening loop

use super::handler::{
    analytics, auth, dashboard, documents, graph, health, search, settings, users, workspaces,
};
use super::rate_limit::rate_limit;
use super::state::AppState;
use crate::config::ServerConfig;
use axum::extract::DefaultBodyLimit;
use axum::http::header::{
    AUTHORIZATION, CONTENT_SECURITY_POLICY, CONTENT_TYPE, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
    X_FRAME_OPTIONS,
};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

const CONTENT_SECURITY: &str = "default-src 'self'; style-src 'self' 'unsafe-inline'; \
script-src 'self'; img-src 'self' data: https:; frame-ancestors 'self'; object-src 'none'";

async fn endpoint_not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "error": "Endpoint not found" })),
    )
}

fn cors(config: &ServerConfig) -> CorsLayer {
    let origin = match HeaderValue::from_str(&config.client_url) {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(_) => {
            warn!(client_url = %config.client_url, "CLIENT_URL is not a valid origin; CORS disabled");
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}

/// Routes under `/api`, rate limited per client
fn api_routes(state: &AppState) -> Router<AppState> {
    let upload_limit = DefaultBodyLimit::max(state.config.upload_body_limit_bytes);

    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/auth/verify", get(auth::verify))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/documents/upload", post(documents::upload).layer(upload_limit))
        .route("/documents/pending-validations", get(documents::pending_validations))
        .route("/documents/:id/validate", post(documents::validate))
        .route("/documents/:id/view", post(documents::view))
        .route("/documents/:id/download", get(documents::download))
        .route("/documents/:id/verify", get(documents::verify))
        .route("/search", get(search::search))
        .route("/graph", get(graph::graph))
        .route("/graph/connections", get(graph::connections))
        .route("/workspaces", post(workspaces::create))
        .route("/workspaces/:id", get(workspaces::get))
        .route("/workspaces/:id/documents", post(workspaces::add_document))
        .route("/workspaces/:id/invite", post(workspaces::invite))
        .route("/users/profile", get(users::profile).put(users::update_profile))
        .route("/settings", get(settings::get).put(settings::update))
        .route("/analytics", get(analytics::analytics))
        .route("/dashboard/stats", get(dashboard::stats))
        .route("/dashboard/recommendations", get(dashboard::recommendations))
        .route("/dashboard/activity", get(dashboard::activity))
        .fallback(endpoint_not_found)
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
}

/// The full gateway with its middleware stack
pub fn router(state: AppState) -> Router {
    let config = state.config.clone();

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api_routes(&state))
        .fallback(endpoint_not_found)
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(SetResponseHeaderLayer::if_not_present(
            CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(CONTENT_SECURITY),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(CompressionLayer::new())
        .layer(cors(&config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on `listener` until SIGINT or SIGTERM
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let environment = state.config.environment.as_str();
    info!(
        "DKN API listening on {} ({})",
        listener.local_addr()?,
        environment
    );
    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    info!("DKN API stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received, draining connections");
}
