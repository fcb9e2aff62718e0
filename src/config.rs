//! Gateway configuration
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file. Every field has a development default except the token secrets in
//! production.

use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Configuration errors
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    /// A variable is present but cannot be parsed
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    /// A variable required in this environment is absent
    #[error("Missing required variable: {0}")]
    Missing(String),

    /// The `.env` file exists but could not be read
    #[error("Failed to load env file: {0}")]
    EnvFile(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Where persistent knowledge lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Proxy to the Django knowledge service over HTTP
    Django,
    /// In-process store seeded with demo data
    Memory,
}

/// Deployment environment, mirrors NODE_ENV of the web stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        }
    }
}

/// Fixed-window rate limiting applied to `/api/*`
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitConfig {
    /// Requests allowed per client key in one window
    pub max_requests: u32,
    /// Window length
    pub window: Duration,
    /// Upper bound on tracked client keys
    pub max_tracked_clients: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(15 * 60),
            max_tracked_clients: 10_000,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub address: String,
    /// Port
    pub port: u16,
    /// Secret for access tokens
    pub jwt_secret: String,
    /// Secret for refresh tokens
    pub jwt_refresh_secret: String,
    /// Base URL of the Django REST API
    pub django_api_url: String,
    /// Timeout for backend calls
    pub django_timeout: Duration,
    /// Which knowledge backend to use
    pub backend: BackendKind,
    /// Allowed CORS origin (the web client)
    pub client_url: String,
    /// Deployment environment
    pub environment: Environment,
    /// Prefix of generated file URLs
    pub storage_base_url: String,
    /// Rate limiting for API routes
    pub rate_limit: RateLimitConfig,
    /// JSON body limit for ordinary routes
    pub body_limit_bytes: usize,
    /// JSON body limit for the upload route
    pub upload_body_limit_bytes: usize,
}

const DEV_JWT_SECRET: &str = "velion-dev-secret";
const DEV_JWT_REFRESH_SECRET: &str = "velion-dev-refresh-secret";

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 3002,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_refresh_secret: DEV_JWT_REFRESH_SECRET.to_string(),
            django_api_url: "http://localhost:8000/api".to_string(),
            django_timeout: Duration::from_secs(10),
            backend: BackendKind::Django,
            client_url: "http://localhost:3000".to_string(),
            environment: Environment::Development,
            storage_base_url: "https://storage.dkn.com/documents".to_string(),
            rate_limit: RateLimitConfig::default(),
            body_limit_bytes: 10 * 1024 * 1024,
            upload_body_limit_bytes: 70 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Load `.env` from the working directory (if any) and read the environment
    pub fn from_env() -> ConfigResult<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(ConfigError::EnvFile(e.to_string())),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load a specific env file into the process environment, then read it
    pub fn from_env_file(path: &Path) -> ConfigResult<Self> {
        dotenvy::from_path(path).map_err(|e| ConfigError::EnvFile(e.to_string()))?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let env_name = lookup("VELION_ENV").or_else(|| lookup("NODE_ENV"));
        config.environment = match env_name.as_deref().map(str::trim) {
            None | Some("") | Some("development") => Environment::Development,
            Some("production") => Environment::Production,
            Some("test") => Environment::Test,
            Some(other) => return Err(invalid("NODE_ENV", other)),
        };

        if let Some(address) = lookup("VELION_BIND") {
            config.address = address;
        }
        if let Some(port) = lookup("PORT") {
            config.port = port.trim().parse().map_err(|_| invalid("PORT", &port))?;
        }

        match lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => config.jwt_secret = secret,
            None if config.environment == Environment::Production => {
                return Err(ConfigError::Missing("JWT_SECRET".to_string()));
            }
            None => warn!("JWT_SECRET not set, using development secret"),
        }
        match lookup("JWT_REFRESH_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => config.jwt_refresh_secret = secret,
            None if config.environment == Environment::Production => {
                return Err(ConfigError::Missing("JWT_REFRESH_SECRET".to_string()));
            }
            None => config.jwt_refresh_secret = format!("{}-refresh", config.jwt_secret),
        }

        if let Some(url) = lookup("DJANGO_API_URL") {
            config.django_api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = lookup("DJANGO_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| invalid("DJANGO_TIMEOUT_SECS", &secs))?;
            config.django_timeout = Duration::from_secs(secs);
        }
        if let Some(kind) = lookup("VELION_BACKEND") {
            config.backend = match kind.trim().to_ascii_lowercase().as_str() {
                "django" => BackendKind::Django,
                "memory" => BackendKind::Memory,
                _ => return Err(invalid("VELION_BACKEND", &kind)),
            };
        }
        if let Some(url) = lookup("CLIENT_URL").or_else(|| lookup("CORS_ORIGIN")) {
            config.client_url = url;
        }
        if let Some(url) = lookup("STORAGE_BASE_URL") {
            config.storage_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(max) = lookup("RATE_LIMIT_MAX") {
            config.rate_limit.max_requests =
                max.trim().parse().map_err(|_| invalid("RATE_LIMIT_MAX", &max))?;
        }
        if let Some(window) = lookup("RATE_LIMIT_WINDOW_SECS") {
            let secs: u64 = window
                .trim()
                .parse()
                .map_err(|_| invalid("RATE_LIMIT_WINDOW_SECS", &window))?;
            config.rate_limit.window = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Socket address string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}
