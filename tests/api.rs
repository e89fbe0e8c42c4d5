//! End-to-end tests over the full router, backed by the in-memory store.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use portfolio_api::config::ServerConfig;
use portfolio_api::{app, AppState, DocumentStore, MemoryStore, UserDeletePolicy};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    store: Arc<MemoryStore>,
}

impl TestApp {
    fn new(policy: UserDeletePolicy) -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), policy);
        let config = ServerConfig {
            bind_addr: ([127, 0, 0, 1], 0).into(),
            api_prefix: Some("/api".into()),
            body_limit_bytes: 16 * 1024,
        };
        TestApp {
            router: app(state, &config),
            store,
        }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(v) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&v).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn json(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = self.send(method, uri, body).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn text(&self, method: Method, uri: &str) -> (StatusCode, String) {
        let (status, bytes) = self.send(method, uri, None).await;
        (status, String::from_utf8(bytes).unwrap())
    }

    async fn create_user(&self) -> String {
        let (status, user) = self
            .json(
                Method::POST,
                "/api/users",
                Some(json!({ "first_name": "A", "last_name": "B", "email": "a@b.com" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        user["_id"].as_str().unwrap().to_string()
    }

    async fn create_project(&self, user_id: &str, title: &str) -> Value {
        let (status, project) = self
            .json(
                Method::POST,
                &format!("/api/users/{}/projects", user_id),
                Some(project_body(title)),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        project
    }
}

fn project_body(title: &str) -> Value {
    json!({
        "title": title,
        "image_url": "http://www.testing.com",
        "description": "A test project",
        "github_url": "http://www.testing.com",
        "deployed_url": "http://www.testing.com"
    })
}

#[tokio::test]
async fn root_serves_liveness_text() {
    let app = TestApp::new(UserDeletePolicy::Orphan);
    let (status, body) = app.text(Method::GET, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "This is root!");
}

#[tokio::test]
async fn project_lifecycle_end_to_end() {
    let app = TestApp::new(UserDeletePolicy::Orphan);
    let user_id = app.create_user().await;

    let project = app.create_project(&user_id, "Test Project").await;
    let project_id = project["_id"].as_str().unwrap().to_string();
    assert_eq!(project["user_id"], user_id.as_str());

    let uri = format!("/api/projects/{}", project_id);
    let (status, fetched) = app.json(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Test Project");
    assert_eq!(fetched["github_url"], "http://www.testing.com");

    let (status, updated) = app.json(Method::PUT, &uri, Some(json!({ "title": "New" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "New");
    assert_eq!(updated["description"], "A test project");

    let (status, text) = app.text(Method::DELETE, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "Project deleted");

    let (status, gone) = app.json(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(gone.get("title").is_none());

    let (status, again) = app.json(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(again["error"]["message"], "Project not found");
}

#[tokio::test]
async fn created_user_shows_up_in_listing() {
    let app = TestApp::new(UserDeletePolicy::Orphan);
    let user_id = app.create_user().await;

    let (status, users) = app.json(Method::GET, "/api/users", None).await;
    assert_eq!(status, StatusCode::OK);
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["_id"], user_id.as_str());
    assert_eq!(users[0]["first_name"], "A");
    assert_eq!(users[0]["last_name"], "B");
    assert_eq!(users[0]["email"], "a@b.com");
    assert!(users[0].get("createdAt").is_some());
}

#[tokio::test]
async fn update_user_returns_post_update_record() {
    let app = TestApp::new(UserDeletePolicy::Orphan);
    let user_id = app.create_user().await;

    let (status, user) = app
        .json(
            Method::PUT,
            &format!("/api/users/{}", user_id),
            Some(json!({ "email": "new@b.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["email"], "new@b.com");
    assert_eq!(user["first_name"], "A");
}

#[tokio::test]
async fn update_of_missing_user_is_not_found() {
    let app = TestApp::new(UserDeletePolicy::Orphan);
    let uri = format!("/api/users/{}", uuid::Uuid::new_v4());
    let (status, body) = app.json(Method::PUT, &uri, Some(json!({ "email": "x@y.z" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn deleting_a_user_twice_reports_not_found() {
    let app = TestApp::new(UserDeletePolicy::Orphan);
    let user_id = app.create_user().await;
    let uri = format!("/api/users/{}", user_id);

    let (status, text) = app.text(Method::DELETE, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "User deleted");

    let (status, body) = app.json(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "User not found");
}

#[tokio::test]
async fn empty_and_unknown_users_are_told_apart_when_listing_projects() {
    let app = TestApp::new(UserDeletePolicy::Orphan);
    let user_id = app.create_user().await;

    let (status, projects) = app
        .json(Method::GET, &format!("/api/users/{}/projects", user_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(projects, json!([]));

    let (status, _) = app
        .json(Method::GET, &format!("/api/users/{}/projects", uuid::Uuid::new_v4()), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn listing_projects_only_returns_the_users_own() {
    let app = TestApp::new(UserDeletePolicy::Orphan);
    let alice = app.create_user().await;
    let bob = app.create_user().await;
    app.create_project(&alice, "one").await;
    app.create_project(&alice, "two").await;
    app.create_project(&bob, "three").await;

    let (status, projects) = app
        .json(Method::GET, &format!("/api/users/{}/projects", alice), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = projects
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["one", "two"]);
}

#[tokio::test]
async fn single_project_lookup_requires_matching_owner() {
    let app = TestApp::new(UserDeletePolicy::Orphan);
    let owner = app.create_user().await;
    let stranger = app.create_user().await;
    let project = app.create_project(&owner, "mine").await;
    let project_id = project["_id"].as_str().unwrap();

    let (status, found) = app
        .json(Method::GET, &format!("/api/users/{}/projects/{}", owner, project_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["title"], "mine");

    let (status, _) = app
        .json(Method::GET, &format!("/api/users/{}/projects/{}", stranger, project_id), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn creating_project_for_unknown_user_is_not_found() {
    let app = TestApp::new(UserDeletePolicy::Orphan);
    let uri = format!("/api/users/{}/projects", uuid::Uuid::new_v4());
    let (status, body) = app.json(Method::POST, &uri, Some(project_body("orphan"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "User not found");
}

#[tokio::test]
async fn owner_in_path_wins_over_body() {
    let app = TestApp::new(UserDeletePolicy::Orphan);
    let user_id = app.create_user().await;
    let mut body = project_body("p");
    body["user_id"] = json!(uuid::Uuid::new_v4());
    let (status, project) = app
        .json(Method::POST, &format!("/api/users/{}/projects", user_id), Some(body))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(project["user_id"], user_id.as_str());
}

#[tokio::test]
async fn missing_or_blank_project_fields_are_rejected() {
    let app = TestApp::new(UserDeletePolicy::Orphan);
    let user_id = app.create_user().await;
    let uri = format!("/api/users/{}/projects", user_id);

    let (status, body) = app.json(Method::POST, &uri, Some(json!({ "title": "only" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");

    let mut blank = project_body("p");
    blank["deployed_url"] = json!("");
    let (status, body) = app.json(Method::POST, &uri, Some(blank)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["message"], "validation: deployed_url is required");

    let (status, projects) = app.json(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(projects, json!([]));
}

#[tokio::test]
async fn malformed_ids_are_bad_requests() {
    let app = TestApp::new(UserDeletePolicy::Orphan);
    for (method, uri) in [
        (Method::GET, "/api/projects/not-an-id"),
        (Method::DELETE, "/api/users/123"),
        (Method::GET, "/api/users/abc/projects"),
    ] {
        let (status, body) = app.json(method, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["error"]["code"], "bad_request");
    }
}

#[tokio::test]
async fn orphan_policy_keeps_projects_of_deleted_user() {
    let app = TestApp::new(UserDeletePolicy::Orphan);
    let user_id = app.create_user().await;
    let project = app.create_project(&user_id, "stays").await;
    let project_id = project["_id"].as_str().unwrap();

    let (status, _) = app.text(Method::DELETE, &format!("/api/users/{}", user_id)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, kept) = app
        .json(Method::GET, &format!("/api/projects/{}", project_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(kept["user_id"], user_id.as_str());
}

#[tokio::test]
async fn cascade_policy_removes_projects_of_deleted_user() {
    let app = TestApp::new(UserDeletePolicy::Cascade);
    let user_id = app.create_user().await;
    let project = app.create_project(&user_id, "goes").await;
    let project_id = project["_id"].as_str().unwrap();

    let (status, _) = app.text(Method::DELETE, &format!("/api/users/{}", user_id)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .json(Method::GET, &format!("/api/projects/{}", project_id), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let owner = uuid::Uuid::parse_str(&user_id).unwrap();
    assert!(app.store.list_projects_for_user(owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn project_can_be_repointed_without_owner_check() {
    let app = TestApp::new(UserDeletePolicy::Orphan);
    let user_id = app.create_user().await;
    let project = app.create_project(&user_id, "moving").await;
    let new_owner = uuid::Uuid::new_v4();

    let (status, updated) = app
        .json(
            Method::PUT,
            &format!("/api/projects/{}", project["_id"].as_str().unwrap()),
            Some(json!({ "user_id": new_owner })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["user_id"], new_owner.to_string());
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let app = TestApp::new(UserDeletePolicy::Orphan);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn oversized_body_is_refused() {
    let app = TestApp::new(UserDeletePolicy::Orphan);
    let payload = serde_json::to_vec(&json!({ "first_name": "x".repeat(32 * 1024) })).unwrap();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/users")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, payload.len())
        .body(Body::from(payload))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn health_ready_version_and_openapi_are_served() {
    let app = TestApp::new(UserDeletePolicy::Orphan);

    let (status, health) = app.json(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");

    let (status, ready) = app.json(Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ready["store"], "ok");

    let (status, version) = app.json(Method::GET, "/version", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(version["name"], "portfolio-api");

    let (status, doc) = app.json(Method::GET, "/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"].get("/users/{id}/projects").is_some());
}

#[tokio::test]
async fn crud_routes_are_not_served_outside_the_prefix() {
    let app = TestApp::new(UserDeletePolicy::Orphan);
    let (status, _) = app.send(Method::GET, "/users", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn requests_are_traced_at_info() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let app = TestApp::new(UserDeletePolicy::Orphan);
    let (status, _) = app.send(Method::GET, "/api/users", None).await;
    assert_eq!(status, StatusCode::OK);

    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    assert!(output.contains("finished processing request"), "no response event in: {}", output);
    assert!(output.contains("/api/users"), "no request span in: {}", output);
}
