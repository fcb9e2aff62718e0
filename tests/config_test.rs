use std::time::Duration;
use velion::config::{BackendKind, ConfigError, ServerConfig};

#[test]
fn test_env_file_loading() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    std::fs::write(
        &path,
        "DJANGO_API_URL=http://django.internal:8000/api\n\
         DJANGO_TIMEOUT_SECS=3\n\
         VELION_BACKEND=django\n\
         RATE_LIMIT_MAX=7\n",
    )
    .unwrap();

    let config = ServerConfig::from_env_file(&path).unwrap();
    assert_eq!(config.django_api_url, "http://django.internal:8000/api");
    assert_eq!(config.django_timeout, Duration::from_secs(3));
    assert_eq!(config.backend, BackendKind::Django);
    assert_eq!(config.rate_limit.max_requests, 7);
}

#[test]
fn test_missing_env_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = ServerConfig::from_env_file(&dir.path().join("absent.env"));
    assert!(matches!(result, Err(ConfigError::EnvFile(_))));
}
