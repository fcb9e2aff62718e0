use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use velion::backend::demo::{DEMO_EMAIL, TEST_EMAIL};
use velion::{AppState, BackendKind, DjangoBackend, KnowledgeBackend, MemoryBackend, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env().context("invalid configuration")?;
    info!("Velion DKN API v{}", velion::version());

    let backend: Arc<dyn KnowledgeBackend> = match config.backend {
        BackendKind::Django => {
            let django = DjangoBackend::from_config(&config).context("invalid DJANGO_API_URL")?;
            info!("Knowledge backend: Django at {}", django.base_url());
            Arc::new(django)
        }
        BackendKind::Memory => {
            let memory = MemoryBackend::with_demo_data().context("failed to seed demo data")?;
            info!(
                "Knowledge backend: in-memory demo store ({} documents; sign in as {} or {})",
                memory.document_count().await,
                DEMO_EMAIL,
                TEST_EMAIL
            );
            Arc::new(memory)
        }
    };
    if config.is_development() && config.jwt_secret == ServerConfig::default().jwt_secret {
        warn!("Using the development JWT secret; set JWT_SECRET outside development");
    }

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;
    velion::http::serve(listener, AppState::new(config, backend)).await?;
    Ok(())
}
