//! Web API File Tests
//!
//! Integration tests for upload, listing, deletion and authentication.

use std::sync::Arc;
use std::time::Duration;

use axum::http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use filedrop::config::Config;
use filedrop::web::handlers::AppState;
use filedrop::web::router::create_router;
use filedrop::LocalFileStore;
use serde_json::Value;
use tempfile::TempDir;

const BASE_URL: &str = "http://files.test";

/// Create a test configuration rooted in a temporary directory.
fn create_test_config(dir: &TempDir, max_file_size: u64) -> Config {
    let mut config = Config::default();
    config.server.public_url = BASE_URL.to_string();
    config.storage.upload_dir = dir.path().join("uploads").to_string_lossy().into_owned();
    config.storage.max_file_size = max_file_size;
    config
}

/// Create a test server backed by a fresh upload directory.
fn create_test_server_with_limit(max_file_size: u64) -> (TestServer, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&dir, max_file_size);

    let store = LocalFileStore::from_config(&config).expect("Failed to create store");
    let app_state = Arc::new(AppState::new(Arc::new(store), &config));
    let router = create_router(app_state, &config.storage.upload_dir);

    let server = TestServer::new(router).expect("Failed to create test server");
    (server, dir)
}

fn create_test_server() -> (TestServer, TempDir) {
    create_test_server_with_limit(1024 * 1024)
}

fn basic(username: &str, password: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{username}:{password}")))
}

fn admin() -> String {
    basic("admin", "password")
}

fn file_form(name: &str, mime: &str, content: &[u8]) -> MultipartForm {
    MultipartForm::new().add_part(
        "myFile",
        Part::bytes(content.to_vec()).file_name(name).mime_type(mime),
    )
}

async fn upload(server: &TestServer, form: MultipartForm) -> axum_test::TestResponse {
    server
        .post("/upload")
        .add_header(AUTHORIZATION, admin())
        .multipart(form)
        .await
}

async fn list(server: &TestServer) -> Vec<Value> {
    let response = server
        .get("/api/files")
        .add_header(AUTHORIZATION, admin())
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["ok"], true);
    body["files"].as_array().unwrap().clone()
}

/// Poll the listing until the named file shows a real description.
async fn wait_for_description(server: &TestServer, name: &str) -> String {
    for _ in 0..100 {
        let files = list(server).await;
        if let Some(file) = files.iter().find(|f| f["name"] == name) {
            let description = file["description"].as_str().unwrap();
            if description != "No description available" {
                return description.to_string();
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    "No description available".to_string()
}

fn stored_name(url: &str) -> String {
    url.rsplit('/').next().unwrap().to_string()
}

// ============================================================================
// Authentication Tests
// ============================================================================

#[tokio::test]
async fn test_protected_routes_require_auth() {
    let (server, _dir) = create_test_server();

    for path in ["/upload", "/files", "/api/files"] {
        let response = server.get(path).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.header(WWW_AUTHENTICATE),
            "Basic realm=\"Secure Area\""
        );
        let body: Value = response.json();
        assert_eq!(body["ok"], false);
        assert_eq!(body["message"], "Authentication required");
    }

    server
        .delete("/api/files/whatever.txt")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_credentials() {
    let (server, _dir) = create_test_server();

    let response = server
        .get("/api/files")
        .add_header(AUTHORIZATION, basic("admin", "wrong"))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_lowercase_basic_scheme() {
    let (server, _dir) = create_test_server();

    let header = format!("basic {}", BASE64.encode("admin:password"));
    server
        .get("/api/files")
        .add_header(AUTHORIZATION, header)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_health_is_public() {
    let (server, _dir) = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    assert_eq!(response.text(), "OK");
}

// ============================================================================
// Page Tests
// ============================================================================

#[tokio::test]
async fn test_pages_served() {
    let (server, _dir) = create_test_server();

    let response = server.get("/upload").add_header(AUTHORIZATION, admin()).await;
    response.assert_status_ok();
    assert!(response.text().contains("name=\"myFile\""));

    let response = server.get("/files").add_header(AUTHORIZATION, admin()).await;
    response.assert_status_ok();
    assert!(response.text().contains("/api/files"));
}

// ============================================================================
// Upload Tests
// ============================================================================

#[tokio::test]
async fn test_upload_and_list() {
    let (server, _dir) = create_test_server();

    let form = file_form("report.PDF", "application/pdf", b"%PDF-1.4")
        .add_text("description", "Q3 numbers");
    let response = upload(&server, form).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["ok"], true);
    let url = body["url"].as_str().unwrap();
    assert!(url.starts_with(&format!("{BASE_URL}/uploads/")));
    assert!(url.ends_with(".pdf"));

    let name = stored_name(url);
    assert_eq!(wait_for_description(&server, &name).await, "Q3 numbers");

    let files = list(&server).await;
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["name"], name.as_str());
    assert_eq!(files[0]["url"], url);
}

#[tokio::test]
async fn test_upload_without_description() {
    let (server, _dir) = create_test_server();

    let response = upload(&server, file_form("photo.jpg", "image/jpeg", b"\xff\xd8\xff")).await;
    response.assert_status_ok();
    let name = stored_name(response.json::<Value>()["url"].as_str().unwrap());

    assert_eq!(
        wait_for_description(&server, &name).await,
        "No description provided"
    );
}

#[tokio::test]
async fn test_upload_accepts_file_field_alias() {
    let (server, _dir) = create_test_server();

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(b"a,b\n1,2\n".to_vec())
            .file_name("data.csv")
            .mime_type("text/csv"),
    );

    upload(&server, form).await.assert_status_ok();
}

#[tokio::test]
async fn test_uploaded_file_is_served() {
    let (server, _dir) = create_test_server();

    let response = upload(&server, file_form("hello.txt", "text/plain", b"hello world")).await;
    let name = stored_name(response.json::<Value>()["url"].as_str().unwrap());

    // No credentials needed for stored files.
    let response = server.get(&format!("/uploads/{name}")).await;
    response.assert_status_ok();
    assert_eq!(&response.as_bytes()[..], b"hello world");
}

#[tokio::test]
async fn test_upload_ids_are_unique() {
    let (server, _dir) = create_test_server();

    let mut urls = Vec::new();
    for _ in 0..5 {
        let response = upload(&server, file_form("same.png", "image/png", b"png")).await;
        urls.push(response.json::<Value>()["url"].as_str().unwrap().to_string());
    }
    urls.sort();
    urls.dedup();

    assert_eq!(urls.len(), 5);
    assert_eq!(list(&server).await.len(), 5);
}

#[tokio::test]
async fn test_upload_invalid_type() {
    let (server, _dir) = create_test_server();

    let form = file_form("virus.exe", "application/x-msdownload", b"MZ")
        .add_text("description", "totally safe");
    let response = upload(&server, form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["ok"], false);
    assert!(body["message"].as_str().unwrap().contains("Invalid file type"));

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(list(&server).await.is_empty());
}

#[tokio::test]
async fn test_upload_no_file() {
    let (server, _dir) = create_test_server();

    let form = MultipartForm::new().add_text("description", "forgot the file");
    let response = upload(&server, form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["ok"], false);
    assert_eq!(body["message"], "Error: No File Selected!");
}

#[tokio::test]
async fn test_upload_not_multipart() {
    let (server, _dir) = create_test_server();

    let response = server
        .post("/upload")
        .add_header(AUTHORIZATION, admin())
        .text("plain body")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["ok"], false);
}

#[tokio::test]
async fn test_upload_too_large() {
    let (server, _dir) = create_test_server_with_limit(16);

    let response = upload(&server, file_form("big.zip", "application/zip", &[0u8; 17])).await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.json::<Value>()["ok"], false);
    assert!(list(&server).await.is_empty());
}

#[tokio::test]
async fn test_upload_far_over_body_limit() {
    let (server, _dir) = create_test_server_with_limit(16);

    let content = vec![0u8; 2 * 1024 * 1024];
    let response = upload(&server, file_form("huge.zip", "application/zip", &content)).await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert!(list(&server).await.is_empty());
}

// ============================================================================
// Delete Tests
// ============================================================================

#[tokio::test]
async fn test_delete_file() {
    let (server, dir) = create_test_server();

    let form = file_form("notes.md", "text/markdown", b"# notes").add_text("description", "x");
    let response = upload(&server, form).await;
    let name = stored_name(response.json::<Value>()["url"].as_str().unwrap());
    wait_for_description(&server, &name).await;

    let response = server
        .delete(&format!("/api/files/{name}"))
        .add_header(AUTHORIZATION, admin())
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["ok"], true);
    assert_eq!(body["message"], "File deleted successfully");

    assert!(list(&server).await.is_empty());
    let descriptions = dir.path().join("uploads").join("descriptions");
    assert_eq!(std::fs::read_dir(descriptions).unwrap().count(), 0);
}

#[tokio::test]
async fn test_delete_by_bare_id() {
    let (server, _dir) = create_test_server();

    let response = upload(&server, file_form("a.gif", "image/gif", b"GIF89a")).await;
    let name = stored_name(response.json::<Value>()["url"].as_str().unwrap());
    let id = name.split('.').next().unwrap();

    server
        .delete(&format!("/api/files/{id}"))
        .add_header(AUTHORIZATION, admin())
        .await
        .assert_status_ok();

    assert!(list(&server).await.is_empty());
}

#[tokio::test]
async fn test_delete_not_found() {
    let (server, _dir) = create_test_server();

    let response = server
        .delete("/api/files/00000000-0000-4000-8000-000000000000.pdf")
        .add_header(AUTHORIZATION, admin())
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["ok"], false);
}

#[tokio::test]
async fn test_delete_rejects_traversal() {
    let (server, _dir) = create_test_server();

    let response = server
        .delete("/api/files/..%2Fconfig.toml")
        .add_header(AUTHORIZATION, admin())
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}
