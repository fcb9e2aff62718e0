use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use velion::backend::demo::{
    AI_FUNDAMENTALS_ID, DEMO_EMAIL, DEMO_PASSWORD, DEMO_USER_ID, PRIVATE_WORKSPACE_ID, PROJECT_ID,
    PUBLIC_WORKSPACE_ID, TEST_USER_ID, WEB_PRACTICES_ID,
};
use velion::auth::TokenKind;
use velion::models::NotificationKind;
use velion::services::StubAi;
use velion::{router, AppState, MemoryBackend, ServerConfig};

struct TestApp {
    app: Router,
    state: AppState,
}

impl TestApp {
    fn new() -> Self {
        Self::with_state(|state| state)
    }

    fn with_state(customize: impl FnOnce(AppState) -> AppState) -> Self {
        let backend = MemoryBackend::with_demo_data().unwrap();
        let state = customize(AppState::new(ServerConfig::default(), Arc::new(backend)));
        Self {
            app: router(state.clone()),
            state,
        }
    }

    /// Session token for a seeded user, minted without going through argon2
    async fn token_for(&self, user_id: i64) -> String {
        let person = self.state.backend.user_by_id(user_id).await.unwrap().unwrap();
        self.state.tokens.issue_session(&person).unwrap()
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        self.send_request(builder.body(body).unwrap()).await
    }

    async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}

#[tokio::test]
async fn test_health_and_security_headers() {
    let app = TestApp::new();
    let response = app
        .app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "SAMEORIGIN");
    assert_eq!(headers["referrer-policy"], "no-referrer");
    assert!(headers.contains_key("content-security-policy"));

    let (_, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(body["status"], "OK");
    assert_eq!(body["service"], "DKN API");
    assert_eq!(body["version"], velion::VERSION);
}

#[tokio::test]
async fn test_unknown_endpoints() {
    let app = TestApp::new();
    for uri in ["/nope", "/api/nope"] {
        let (status, body) = app.send(Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"success": false, "error": "Endpoint not found"}));
    }
}

#[tokio::test]
async fn test_login() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": DEMO_EMAIL, "password": DEMO_PASSWORD})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["token"].as_str().unwrap().len() > 20);
    assert!(body["refreshToken"].is_string());
    assert_eq!(body["user"]["email"], DEMO_EMAIL);
    assert!(body["user"].get("password").is_none());

    // The issued token opens protected routes
    let token = body["token"].as_str().unwrap();
    let (status, profile) = app.send(Method::GET, "/api/users/profile", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["id"], DEMO_USER_ID);
}

#[tokio::test]
async fn test_login_rejections() {
    let app = TestApp::new();
    let (status, body) = app
        .send(Method::POST, "/api/auth/login", None, Some(json!({"email": "not-an-email"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "password"]);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": DEMO_EMAIL, "password": "wrong-password"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");

    let (status, _) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "nobody@velion.app", "password": "whatever"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Not JSON at all
    let request = Request::post("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{email"))
        .unwrap();
    let (status, body) = app.send_request(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_register_then_login() {
    let app = TestApp::new();
    let registration = json!({
        "email": "New.Hire@Velion.app",
        "password": "s3cret!",
        "firstName": "New",
        "lastName": "Hire",
        "employeeId": "EMP100"
    });
    let (status, body) = app
        .send(Method::POST, "/api/auth/register", None, Some(registration.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["email"], "new.hire@velion.app");
    assert_eq!(body["user"]["role"], "USER");
    assert!(body["token"].is_string());

    let (status, body) = app
        .send(Method::POST, "/api/auth/register", None, Some(registration))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User already exists");

    let (status, _) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "new.hire@velion.app", "password": "s3cret!"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"email": "x@velion.app", "password": "123"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/api/search?query=ai", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Access token required");

    let (status, body) = app
        .send(Method::GET, "/api/search?query=ai", Some("garbage"), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "INVALID_TOKEN");

    // Refresh tokens are not access tokens
    let person = app.state.backend.user_by_id(DEMO_USER_ID).await.unwrap().unwrap();
    let refresh = app.state.tokens.issue_refresh(&person).unwrap();
    let (status, _) = app
        .send(Method::GET, "/api/users/profile", Some(&refresh), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_expired_token_on_protected_route() {
    let app = TestApp::new();
    let person = app.state.backend.user_by_id(DEMO_USER_ID).await.unwrap().unwrap();
    let expired = app
        .state
        .tokens
        .issue(&person, TokenKind::Access, chrono::Duration::minutes(-5))
        .unwrap();

    let (status, body) = app
        .send(Method::GET, "/api/users/profile", Some(&expired), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "TOKEN_EXPIRED");
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_verify_refresh_logout() {
    let app = TestApp::new();
    let token = app.token_for(DEMO_USER_ID).await;

    let (status, body) = app.send(Method::GET, "/api/auth/verify", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], DEMO_USER_ID);

    let (status, body) = app.send(Method::GET, "/api/auth/verify", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "No token provided");

    let (status, body) = app.send(Method::GET, "/api/auth/verify", Some("bad"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token");

    let person = app.state.backend.user_by_id(DEMO_USER_ID).await.unwrap().unwrap();
    let refresh = app.state.tokens.issue_refresh(&person).unwrap();
    let (status, body) = app
        .send(Method::POST, "/api/auth/refresh", None, Some(json!({"refreshToken": refresh})))
        .await;
    assert_eq!(status, StatusCode::OK);
    let renewed = body["token"].as_str().unwrap();
    assert!(app.state.tokens.verify_access(renewed).is_ok());

    let (status, body) = app.send(Method::POST, "/api/auth/refresh", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Refresh token required");

    let (status, body) = app
        .send(Method::POST, "/api/auth/refresh", None, Some(json!({"refreshToken": token})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid refresh token");

    let (status, body) = app.send(Method::POST, "/api/auth/logout", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logged out successfully");
}

fn upload_body(file_data: &str) -> Value {
    json!({
        "title": "Cloud Migration Playbook",
        "description": "Lessons from three migrations",
        "fileData": file_data,
        "metadata": {
            "originalFilename": "playbook.pdf",
            "fileType": "application/pdf",
            "documentType": "guideline"
        }
    })
}

#[tokio::test]
async fn test_upload_pipeline() {
    let app = TestApp::new();
    let token = app.token_for(TEST_USER_ID).await;
    let (status, body) = app
        .send(Method::POST, "/api/documents/upload", Some(&token), Some(upload_body("aGVsbG8gd29ybGQ=")))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Document uploaded successfully");
    let document = &body["data"]["document"];
    assert_eq!(document["status"], "UNDER_REVIEW");
    assert_eq!(document["document_type"], "GUIDELINE");
    assert_eq!(document["file_size"], 11);
    assert_eq!(document["uploader"], TEST_USER_ID);
    assert_eq!(document["content_hash"].as_str().unwrap().len(), 64);
    assert!(document["metadata"]["uploadTimestamp"].is_string());
    assert!(document["blockchain_tx_id"].is_null());
    assert_eq!(body["data"]["aiResults"]["qualityScore"], 85.0);
    assert_eq!(body["data"]["nextSteps"], "Document under review for publication");

    let id = document["id"].as_str().unwrap().parse().unwrap();
    let component = app.state.backend.knowledge_component(id).await.unwrap().unwrap();
    assert_eq!(component.validation_status, velion::models::ValidationStatus::Pending);
}

#[tokio::test]
async fn test_upload_quality_thresholds() {
    let app = TestApp::with_state(|s| s.with_ai(Arc::new(StubAi::with_quality(95.0))));
    let token = app.token_for(DEMO_USER_ID).await;
    let (_, body) = app
        .send(Method::POST, "/api/documents/upload", Some(&token), Some(upload_body("aGk=")))
        .await;
    let tx = body["data"]["document"]["blockchain_tx_id"].as_str().unwrap();
    assert!(tx.starts_with("tx_"));

    let app = TestApp::with_state(|s| s.with_ai(Arc::new(StubAi::with_quality(60.0))));
    let token = app.token_for(DEMO_USER_ID).await;
    let (_, body) = app
        .send(Method::POST, "/api/documents/upload", Some(&token), Some(upload_body("aGk=")))
        .await;
    assert_eq!(body["data"]["document"]["status"], "PENDING_REVIEW");
    assert_eq!(body["data"]["nextSteps"], "Document requires manual review");
}

#[tokio::test]
async fn test_upload_validation() {
    let app = TestApp::new();
    let token = app.token_for(DEMO_USER_ID).await;

    let (status, body) = app
        .send(Method::POST, "/api/documents/upload", Some(&token), Some(json!({"description": "x"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);

    let (status, _) = app
        .send(Method::POST, "/api/documents/upload", Some(&token), Some(upload_body("%%% not base64")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_over_decoded_limit() {
    use base64::Engine;

    let app = TestApp::new();
    let token = app.token_for(DEMO_USER_ID).await;
    let encoded = base64::engine::general_purpose::STANDARD.encode(vec![0u8; 50 * 1024 * 1024 + 1]);
    let request = Request::post("/api/documents/upload")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(format!(
            r#"{{"title":"Huge","fileData":"{}"}}"#,
            encoded
        )))
        .unwrap();
    let (status, body) = app.send_request(request).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["code"], "FILE_TOO_LARGE");
}

#[tokio::test]
async fn test_body_over_route_limit() {
    let app = TestApp::with_state(|mut s| {
        let mut config = (*s.config).clone();
        config.upload_body_limit_bytes = 1024;
        config.body_limit_bytes = 512;
        s.config = Arc::new(config);
        s
    });
    let token = app.token_for(DEMO_USER_ID).await;
    let (status, body) = app
        .send(Method::POST, "/api/documents/upload", Some(&token), Some(upload_body(&"A".repeat(2048))))
        .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["code"], "FILE_TOO_LARGE");

    // The upload route gets more room than ordinary routes
    let (status, _) = app
        .send(Method::POST, "/api/documents/upload", Some(&token), Some(upload_body(&"QUJD".repeat(150))))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app
        .send(Method::PUT, "/api/settings", Some(&token), Some(json!({"note": "x".repeat(600)})))
        .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_upload_review_then_search() {
    let app = TestApp::new();
    let author = app.token_for(TEST_USER_ID).await;
    let reviewer = app.token_for(DEMO_USER_ID).await;

    let (_, body) = app
        .send(Method::POST, "/api/documents/upload", Some(&author), Some(upload_body("aGk=")))
        .await;
    let id = body["data"]["document"]["id"].as_str().unwrap().to_string();

    // Not searchable until a reviewer publishes it
    let (_, body) = app
        .send(Method::GET, "/api/search?query=migration", Some(&author), None)
        .await;
    assert_eq!(body["data"]["pagination"]["total"], 0);

    let (status, body) = app
        .send(Method::GET, "/api/documents/pending-validations", Some(&author), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Insufficient permissions");
    let (status, _) = app
        .send(
            Method::POST,
            &format!("/api/documents/{}/validate", id),
            Some(&author),
            Some(json!({"action": "APPROVE"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(Method::GET, "/api/documents/pending-validations", Some(&reviewer), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["total"], 1);
    assert_eq!(body["data"]["documents"][0]["id"], id.as_str());

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/documents/{}/validate", id),
            Some(&reviewer),
            Some(json!({"action": "publish"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "action");

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/documents/{}/validate", id),
            Some(&reviewer),
            Some(json!({"action": "approve", "feedback": "Clear and complete"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["document"]["status"], "PUBLISHED");
    assert!(body["data"]["document"]["published_at"].is_string());

    let (_, body) = app
        .send(Method::GET, "/api/search?query=migration", Some(&author), None)
        .await;
    assert_eq!(body["data"]["pagination"]["total"], 1);
    assert_eq!(body["data"]["results"][0]["id"], id.as_str());

    let (_, body) = app
        .send(Method::GET, "/api/documents/pending-validations", Some(&reviewer), None)
        .await;
    assert_eq!(body["data"]["pagination"]["total"], 0);

    let sent = app.state.notifications.sent_to(TEST_USER_ID);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, NotificationKind::Validation);

    let (status, _) = app
        .send(
            Method::POST,
            &format!("/api/documents/{}/validate", uuid::Uuid::new_v4()),
            Some(&reviewer),
            Some(json!({"action": "REJECT"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_view_download_and_verify() {
    let app = TestApp::new();
    let token = app.token_for(TEST_USER_ID).await;
    let before = app
        .state
        .backend
        .document_by_id(AI_FUNDAMENTALS_ID)
        .await
        .unwrap()
        .unwrap();

    let (status, body) = app
        .send(Method::POST, &format!("/api/documents/{}/view", AI_FUNDAMENTALS_ID), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let (status, body) = app
        .send(Method::GET, &format!("/api/documents/{}/download", AI_FUNDAMENTALS_ID), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["url"], before.file_url.as_str());

    let after = app
        .state
        .backend
        .document_by_id(AI_FUNDAMENTALS_ID)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.view_count, before.view_count + 1);
    assert_eq!(after.download_count, before.download_count + 1);

    // Anchored on the ledger, so the search "Verify" action has something to check
    let (status, body) = app
        .send(Method::GET, &format!("/api/documents/{}/verify", AI_FUNDAMENTALS_ID), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["verified"], true);
    assert_eq!(body["data"]["blockchainTxId"], "tx_1768386600000");

    let (_, body) = app
        .send(Method::GET, &format!("/api/documents/{}/verify", WEB_PRACTICES_ID), Some(&token), None)
        .await;
    assert_eq!(body["data"]["verified"], false);

    let (status, body) = app
        .send(Method::POST, "/api/documents/not-a-uuid/view", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Document not found");
    let (status, _) = app
        .send(Method::GET, &format!("/api/documents/{}/download", uuid::Uuid::new_v4()), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search() {
    let app = TestApp::new();
    let token = app.token_for(TEST_USER_ID).await;

    let (status, body) = app
        .send(Method::GET, "/api/search?query=neural", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["pagination"], json!({"page": 1, "limit": 20, "total": 1, "totalPages": 1}));
    let hit = &data["results"][0];
    assert_eq!(hit["id"], AI_FUNDAMENTALS_ID.to_string());
    assert_eq!(hit["metadata"]["uploaderName"], "Demo User");
    assert_eq!(hit["knowledgeComponent"]["keyTopics"][0], "Artificial Intelligence");
    let labels: Vec<&str> = hit["quickActions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["View", "Download", "Share", "Add to Workspace", "Verify"]);
    let score = hit["relevanceScore"].as_u64().unwrap();
    assert!(score > 0 && score <= 100);
}

#[tokio::test]
async fn test_search_natural_language_and_filters() {
    let app = TestApp::new();
    let token = app.token_for(TEST_USER_ID).await;

    let (status, body) = app
        .send(Method::GET, "/api/search?query=What%20about%20neural%20networks%3F", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["query"], "What about neural networks?");
    assert_eq!(body["data"]["pagination"]["total"], 1);

    let (_, body) = app
        .send(Method::GET, "/api/search?query=knowledge&documentType=research&limit=1", Some(&token), None)
        .await;
    assert_eq!(body["data"]["filters"], json!({"documentType": "RESEARCH"}));
    assert_eq!(body["data"]["results"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["pagination"]["totalPages"], body["data"]["pagination"]["total"]);

    let (status, body) = app.send(Method::GET, "/api/search", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "query");

    let (status, _) = app
        .send(Method::GET, "/api/search?query=ai&limit=500", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_graph_views() {
    let app = TestApp::new();

    let (status, body) = app.send(Method::GET, "/api/graph", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["metadata"]["totalNodes"], 4);
    assert_eq!(body["metadata"]["totalEdges"], 3);
    assert_eq!(body["metadata"]["depth"], 2);
    assert!(body["metadata"]["entityId"].is_null());

    let (_, body) = app
        .send(Method::GET, "/api/graph?entityId=1&entityType=Document&depth=3", None, None)
        .await;
    assert_eq!(body["metadata"]["totalNodes"], 3);
    assert_eq!(body["metadata"]["depth"], 3);
    assert_eq!(body["metadata"]["entityType"], "Document");
    let node = &body["data"]["nodes"][0];
    assert!(node["color"].is_string());
    assert!(node["size"].as_f64().unwrap() >= 20.0);

    let (status, body) = app
        .send(Method::GET, "/api/graph/connections?sourceId=1&targetId=3", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalPaths"], 1);
    assert_eq!(body["data"]["shortestPath"]["length"], 2);
    assert_eq!(body["data"]["shortestPath"]["weight"], 7);
    assert_eq!(body["data"]["paths"][0]["edges"][1]["type"], "WORKS_ON");
}

#[tokio::test]
async fn test_workspace_access() {
    let app = TestApp::new();
    let member = app.token_for(TEST_USER_ID).await;
    let owner = app.token_for(DEMO_USER_ID).await;

    let private = format!("/api/workspaces/{}", PRIVATE_WORKSPACE_ID);
    let (status, body) = app.send(Method::GET, &private, Some(&member), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Access denied to private workspace");
    let (status, _) = app.send(Method::GET, &private, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(Method::GET, &format!("/api/workspaces/{}", PUBLIC_WORKSPACE_ID), Some(&member), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["name"], "AI Research Guild");
    assert_eq!(data["statistics"]["totalDocuments"], 2);
    assert_eq!(data["statistics"]["totalMembers"], 2);
    assert_eq!(data["statistics"]["activeMembers"], 1);
    assert_eq!(data["statistics"]["storageUsed"], 5_700_000);
    assert_eq!(data["statistics"]["documentTypes"]["RESEARCH"], 2);
    assert_eq!(data["statistics"]["activityTrend"].as_array().unwrap().len(), 30);
    let feed = data["activity"].as_array().unwrap();
    assert_eq!(feed.len(), 3);
    assert_eq!(feed[0]["type"], "COMMENT");
    assert_eq!(feed[1]["message"], "Demo uploaded \"Artificial Intelligence Fundamentals\"");

    for uri in ["/api/workspaces/not-a-uuid".to_string(), format!("/api/workspaces/{}", uuid::Uuid::new_v4())] {
        let (status, body) = app.send(Method::GET, &uri, Some(&member), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Workspace not found");
    }
}

#[tokio::test]
async fn test_create_workspace() {
    let app = TestApp::new();
    let token = app.token_for(DEMO_USER_ID).await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/workspaces",
            Some(&token),
            Some(json!({
                "name": "Cloud Guild",
                "workspaceType": "INTEREST",
                "projectId": PROJECT_ID,
                "members": [TEST_USER_ID, DEMO_USER_ID],
                "isPrivate": true
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["is_private"], true);
    let members = body["data"]["members"].as_array().unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0]["membership_role"], "OWNER");
    assert_eq!(members[1]["membership_role"], "MEMBER");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/workspaces",
            Some(&token),
            Some(json!({"name": "Orphan", "projectId": uuid::Uuid::new_v4()})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Project not found");

    let (status, _) = app
        .send(Method::POST, "/api/workspaces", Some(&token), Some(json!({"description": "no name"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_document_to_workspace() {
    let app = TestApp::new();
    let member = app.token_for(TEST_USER_ID).await;
    let uri = format!("/api/workspaces/{}/documents", PUBLIC_WORKSPACE_ID);

    let (status, body) = app
        .send(Method::POST, &uri, Some(&member), Some(json!({"documentId": WEB_PRACTICES_ID})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Document added to workspace");
    let docs = app.state.backend.workspace_documents(PUBLIC_WORKSPACE_ID).await.unwrap();
    assert_eq!(docs.len(), 3);

    let (status, _) = app
        .send(Method::POST, &uri, Some(&member), Some(json!({"documentId": uuid::Uuid::new_v4()})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let private = format!("/api/workspaces/{}/documents", PRIVATE_WORKSPACE_ID);
    let (status, body) = app
        .send(Method::POST, &private, Some(&member), Some(json!({"documentId": WEB_PRACTICES_ID})))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Insufficient permissions");
}

#[tokio::test]
async fn test_invite_members() {
    let app = TestApp::new();
    let owner = app.token_for(DEMO_USER_ID).await;
    let member = app.token_for(TEST_USER_ID).await;
    let uri = format!("/api/workspaces/{}/invite", PUBLIC_WORKSPACE_ID);

    let (status, body) = app
        .send(Method::POST, &uri, Some(&owner), Some(json!({"userIds": [TEST_USER_ID, 42]})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({"total": 2, "invited": 1, "already_member": 1, "failed": 0})
    );
    assert_eq!(body["message"], "Invited 1 new members to workspace");
    let sent = app.state.notifications.sent_to(42);
    assert_eq!(sent.len(), 1);
    assert!(sent[0].message.contains("AI Research Guild"));

    let (status, body) = app
        .send(Method::POST, &uri, Some(&member), Some(json!({"userIds": [7]})))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Only owners and admins can invite members");
}

#[tokio::test]
async fn test_profile_update() {
    let app = TestApp::new();
    let token = app.token_for(TEST_USER_ID).await;

    let (status, body) = app
        .send(
            Method::PUT,
            "/api/users/profile",
            Some(&token),
            Some(json!({"region": "Asia", "skills": ["Rust"], "role": "ADMIN"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["region"], "Asia");
    assert_eq!(body["role"], "CONSULTANT");
    assert!(body["profile_completion"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_settings() {
    let app = TestApp::new();
    let token = app.token_for(DEMO_USER_ID).await;

    let (_, body) = app.send(Method::GET, "/api/settings", Some(&token), None).await;
    assert_eq!(body, json!({"theme": "light", "notifications": true, "language": "en"}));

    let (status, body) = app
        .send(Method::PUT, "/api/settings", Some(&token), Some(json!({"theme": "dark"})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["theme"], "dark");
    assert_eq!(body["language"], "en");

    let (status, _) = app
        .send(Method::PUT, "/api/settings", Some(&token), Some(json!(["dark"])))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analytics_and_dashboard() {
    let app = TestApp::new();
    let token = app.token_for(DEMO_USER_ID).await;

    let (status, body) = app
        .send(Method::GET, "/api/analytics?timeframe=30days", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timeframe"], "30days");
    assert_eq!(body["totalDocuments"], 3);

    let (_, body) = app.send(Method::GET, "/api/dashboard/stats", Some(&token), None).await;
    assert_eq!(body["documents"], 3);
    assert_eq!(body["collaborators"], 2);

    let (_, body) = app
        .send(Method::GET, "/api/dashboard/recommendations", Some(&token), None)
        .await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["author"], "Demo User");
    assert_eq!(items[0]["contributors"], json!(["DU"]));

    let (_, body) = app.send(Method::GET, "/api/dashboard/activity", Some(&token), None).await;
    assert_eq!(body[0]["time"], "1 day ago");
    assert_eq!(body[0]["type"], "upload");
}
