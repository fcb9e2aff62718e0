//! VelionClient against a live gateway on a loopback port

use std::sync::Arc;
use velion::backend::demo::{DEMO_EMAIL, DEMO_PASSWORD};
use velion::{AppState, MemoryBackend, ServerConfig};
use velion_sdk::{GraphRequest, SdkError, SearchRequest, Upload, VelionClient, MAX_UPLOAD_BYTES};

async fn spawn_gateway() -> String {
    let backend = MemoryBackend::with_demo_data().unwrap();
    let state = AppState::new(ServerConfig::default(), Arc::new(backend));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        velion::http::serve(listener, state).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_session_lifecycle() {
    let client = VelionClient::new(&spawn_gateway().await).unwrap();

    let health = client.health().await.unwrap();
    assert_eq!(health.status, "OK");
    assert_eq!(health.service, "DKN API");

    let session = client.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();
    assert!(client.is_authenticated());
    assert_eq!(client.token(), Some(session.token.clone()));
    assert_eq!(session.user["email"], DEMO_EMAIL);

    let user = client.verify().await.unwrap();
    assert_eq!(user["email"], DEMO_EMAIL);

    let refresh = session.refresh_token.unwrap();
    let renewed = client.refresh(&refresh).await.unwrap();
    assert_eq!(client.token(), Some(renewed));

    client.logout().await.unwrap();
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_api_errors() {
    let client = VelionClient::new(&spawn_gateway().await).unwrap();

    match client.login(DEMO_EMAIL, "wrong-password").await {
        Err(SdkError::Api { status, message, code }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid credentials");
            assert_eq!(code.as_deref(), Some("UNAUTHORIZED"));
        }
        other => panic!("expected 401, got {:?}", other.map(|s| s.token)),
    }

    // A rejected token is dropped so later calls go out anonymous
    let client = client.with_token("stale");
    let err = client.profile().await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert!(client.is_authenticated());

    client.set_token(None);
    let err = client.profile().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_expired_session_clears_token() {
    let client = VelionClient::new(&spawn_gateway().await).unwrap();
    client.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();

    // verify answers 401 for any token it cannot validate
    client.set_token(Some("not-a-jwt".to_string()));
    assert_eq!(client.verify().await.unwrap_err().status(), Some(401));
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_search_and_graph() {
    let client = VelionClient::new(&spawn_gateway().await).unwrap();
    client.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();

    let page = client.search(&SearchRequest::new("knowledge graph")).await.unwrap();
    assert_eq!(page.query, "knowledge graph");
    assert!(page.pagination.total >= 1);
    assert_eq!(page.results[0]["title"], "Knowledge Graph Construction");

    let graph = client.graph(&GraphRequest::default()).await.unwrap();
    assert_eq!(graph["success"], true);
    assert!(graph["metadata"]["totalNodes"].as_u64().unwrap() > 0);

    let connections = client.connections("user_1", "doc_1").await.unwrap();
    assert!(connections["totalPaths"].as_u64().is_some());
}

#[tokio::test]
async fn test_upload() {
    let client = VelionClient::new(&spawn_gateway().await).unwrap();
    client.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();

    let upload = Upload {
        title: "Field Notes".into(),
        description: "Notes from the Lisbon workshop".into(),
        file_name: "notes.txt".into(),
        mime_type: "text/plain".into(),
        document_type: Some("RESEARCH".into()),
        data: b"graph all the things".to_vec(),
        ..Upload::default()
    };
    let data = client.upload_document(&upload).await.unwrap();
    assert_eq!(data["document"]["title"], "Field Notes");
    assert_eq!(data["document"]["file_type"], "text/plain");
    assert!(data["aiResults"]["qualityScore"].is_number());
}

#[tokio::test]
async fn test_review_flow() {
    let client = VelionClient::new(&spawn_gateway().await).unwrap();
    client.login(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();

    let upload = Upload {
        title: "Lisbon Retrospective".into(),
        file_name: "retro.txt".into(),
        mime_type: "text/plain".into(),
        data: b"what went well".to_vec(),
        ..Upload::default()
    };
    let data = client.upload_document(&upload).await.unwrap();
    let id = data["document"]["id"].as_str().unwrap().to_string();

    let pending = client.pending_validations(1, 10).await.unwrap();
    assert_eq!(pending["pagination"]["total"], 1);

    let document = client.validate_document(&id, "APPROVE", "").await.unwrap();
    assert_eq!(document["status"], "PUBLISHED");

    let page = client.search(&SearchRequest::new("lisbon retrospective")).await.unwrap();
    assert_eq!(page.pagination.total, 1);

    client.record_view(&id).await.unwrap();
    assert!(client.download_url(&id).await.unwrap().contains(&id));
    assert_eq!(client.verify_document(&id).await.unwrap()["verified"], false);

    let err = client.validate_document(&id, "SHIP_IT", "").await.unwrap_err();
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn test_upload_guards_run_before_network() {
    // Nothing listens here; a network attempt would surface as SdkError::Http
    let client = VelionClient::new("http://127.0.0.1:1").unwrap();

    let oversized = Upload {
        title: "Archive".into(),
        mime_type: "application/pdf".into(),
        data: vec![0; MAX_UPLOAD_BYTES + 1],
        ..Upload::default()
    };
    assert!(matches!(
        client.upload_document(&oversized).await,
        Err(SdkError::FileTooLarge { .. })
    ));

    let executable = Upload {
        title: "Installer".into(),
        mime_type: "application/x-msdownload".into(),
        data: vec![1, 2, 3],
        ..Upload::default()
    };
    assert!(matches!(
        client.upload_document(&executable).await,
        Err(SdkError::UnsupportedFileType(_))
    ));
}
