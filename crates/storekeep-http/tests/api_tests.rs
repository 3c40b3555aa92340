//! Router tests for the admin backup routes

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use camino::Utf8PathBuf;
use serde_json::{json, Value};
use std::sync::Arc;
use storekeep_backup::BackupManager;
use storekeep_core::{Collection, DataStore, MemoryStore};
use storekeep_http::{build_router, ApiState};
use tempfile::TempDir;
use tower::ServiceExt;

const TOKEN: &str = "admin-secret";

struct TestApp {
    _temp: TempDir,
    backup_dir: Utf8PathBuf,
    store: Arc<MemoryStore>,
    router: Router,
}

fn app_with_token(token: Option<&str>) -> TestApp {
    let temp = TempDir::new().unwrap();
    let backup_dir =
        Utf8PathBuf::from_path_buf(temp.path().join("backups")).expect("valid UTF-8");
    let store = Arc::new(MemoryStore::new("storefront"));
    let manager = Arc::new(BackupManager::new(store.clone()));
    let state = ApiState::new(manager, backup_dir.clone(), 2, token.map(String::from));

    TestApp {
        _temp: temp,
        backup_dir,
        store,
        router: build_router(state),
    }
}

fn app() -> TestApp {
    app_with_token(Some(TOKEN))
}

fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", TOKEN));
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request should build"),
        None => builder.body(Body::empty()).expect("request should build"),
    }
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .router
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = app();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/backup/list")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn test_wrong_token_is_forbidden() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/backup/create")
        .header(header::AUTHORIZATION, "Bearer guessed")
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(!app.backup_dir.exists());
}

#[tokio::test]
async fn test_unconfigured_token_refuses_everything() {
    let app = app_with_token(None);
    let (status, _) = send(&app, request(Method::GET, "/api/backup/list", None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_list_empty() {
    let app = app();
    let (status, body) = send(&app, request(Method::GET, "/api/backup/list", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["backups"], json!([]));
}

#[tokio::test]
async fn test_create_then_list() {
    let app = app();
    app.store
        .insert_many(Collection::Users, vec![json!({"_id": "u1"}), json!({"_id": "u2"})])
        .await
        .unwrap();

    let (status, body) = send(&app, request(Method::POST, "/api/backup/create", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let path = body["path"].as_str().unwrap().to_string();
    assert!(path.starts_with(app.backup_dir.as_str()));

    let (status, body) = send(&app, request(Method::GET, "/api/backup/list", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["backups"][0]["path"], path);
    assert_eq!(body["backups"][0]["metadata"]["collections"]["users"], 2);
    assert_eq!(body["backups"][0]["metadata"]["collections"]["orders"], 0);
}

#[tokio::test]
async fn test_restore_with_clear() {
    let app = app();
    app.store
        .insert_many(Collection::Products, vec![json!({"_id": "p1"})])
        .await
        .unwrap();
    let (_, created) = send(&app, request(Method::POST, "/api/backup/create", None)).await;

    app.store
        .insert_many(Collection::Products, vec![json!({"_id": "p2"})])
        .await
        .unwrap();

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/backup/restore",
            Some(json!({"backupPath": created["path"], "clearBeforeRestore": true})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"]["products"], 1);
    assert_eq!(body["results"]["users"], 0);
    assert_eq!(
        app.store.find_all(Collection::Products).await.unwrap(),
        vec![json!({"_id": "p1"})]
    );
}

#[tokio::test]
async fn test_restore_requires_path() {
    let app = app();
    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/backup/restore",
            Some(json!({"clearBeforeRestore": true})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "backupPath is required");
}

#[tokio::test]
async fn test_restore_missing_file_is_not_found() {
    let app = app();
    let missing = app.backup_dir.join("backup-missing.json");
    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/api/backup/restore",
            Some(json!({"backupPath": missing.as_str()})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_clean_uses_body_or_default() {
    let app = app();
    for _ in 0..4 {
        send(&app, request(Method::POST, "/api/backup/create", None)).await;
        tokio::time::sleep(std::time::Duration::from_millis(25)).await;
    }

    let (status, body) = send(
        &app,
        request(Method::DELETE, "/api/backup/clean", Some(json!({"keepCount": 3}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], 1);

    // Default keep count of the state is 2
    let (status, body) = send(&app, request(Method::DELETE, "/api/backup/clean", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], 1);
}

#[tokio::test]
async fn test_auto_prunes_to_keep_count() {
    let app = app();
    for _ in 0..3 {
        let (status, _) = send(&app, request(Method::POST, "/api/backup/auto", None)).await;
        assert_eq!(status, StatusCode::OK);
        tokio::time::sleep(std::time::Duration::from_millis(25)).await;
    }

    let (_, body) = send(&app, request(Method::GET, "/api/backup/list", None)).await;
    assert_eq!(body["count"], 2);
}
