//! Edit Camera page tests, driven through the full router

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use camera_console::{
    camera_store::{
        Camera, CameraRepository, MemoryCameraRepository, UpdateCameraRequest, CAMERA_FLOOR_MAX_LEN,
    },
    pages::{CameraEditForm, EditForm, EDIT_CAMERA_HEADING},
    state::{AppConfig, AppState, StoreBackend},
    web_api, Error, Result,
};
use http_body_util::BodyExt;
use maud::Markup;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tower::ServiceExt;

fn config() -> AppConfig {
    AppConfig {
        database_url: None,
        db_max_connections: 1,
        camera_seed_file: None,
        port: 0,
        host: "127.0.0.1".to_string(),
    }
}

fn lobby_cam() -> Camera {
    Camera::new("cam-001", "Lobby Cam")
}

fn app_with(repo: Arc<dyn CameraRepository>) -> Router {
    web_api::create_router(AppState::new(config(), repo, StoreBackend::Memory))
}

fn app() -> (Router, Arc<MemoryCameraRepository>) {
    let repo = Arc::new(MemoryCameraRepository::with_cameras([lobby_cam()]));
    (app_with(repo.clone()), repo)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn put_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Urlencoded body matching what the rendered form submits for `camera`
fn unchanged_form(camera: &Camera) -> String {
    let field = |v: &Option<String>| v.clone().unwrap_or_default();
    let mut pairs = vec![
        ("name", camera.name.clone()),
        ("location", camera.location.clone()),
        ("floor", field(&camera.floor)),
        ("family", camera.family.clone()),
        ("manufacturer", field(&camera.manufacturer)),
        ("model", field(&camera.model)),
        ("ip_address", field(&camera.ip_address)),
        ("rtsp_main", field(&camera.rtsp_main)),
        ("rtsp_sub", field(&camera.rtsp_sub)),
        ("polling_interval_sec", camera.polling_interval_sec.to_string()),
    ];
    if camera.enabled {
        pairs.push(("enabled", "on".to_string()));
    }
    if camera.polling_enabled {
        pairs.push(("polling_enabled", "on".to_string()));
    }
    pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", k, v.replace(' ', "+")))
        .collect::<Vec<_>>()
        .join("&")
}

async fn body_string(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn next_chunk(body: &mut Body) -> Option<String> {
    loop {
        let frame = body.frame().await?.unwrap();
        if let Ok(data) = frame.into_data() {
            return Some(String::from_utf8(data.to_vec()).unwrap());
        }
    }
}

fn initial_data(page: &str) -> Camera {
    let start = page.find("data-initial-data>").unwrap() + "data-initial-data>".len();
    let end = start + page[start..].find("</script>").unwrap();
    serde_json::from_str(&page[start..end]).unwrap()
}

/// Repository whose every call fails like an unreachable database
struct UnreachableRepository;

#[async_trait]
impl CameraRepository for UnreachableRepository {
    async fn get_camera(&self, _camera_id: &str) -> Result<Option<Camera>> {
        Err(Error::Sqlx(sqlx::Error::PoolTimedOut))
    }

    async fn list_cameras(&self) -> Result<Vec<Camera>> {
        Err(Error::Sqlx(sqlx::Error::PoolTimedOut))
    }

    async fn update_camera(&self, _camera_id: &str, _req: &UpdateCameraRequest) -> Result<Camera> {
        Err(Error::Sqlx(sqlx::Error::PoolTimedOut))
    }
}

/// Repository that reads from memory but fails every write
struct ReadOnlyRepository(MemoryCameraRepository);

#[async_trait]
impl CameraRepository for ReadOnlyRepository {
    async fn get_camera(&self, camera_id: &str) -> Result<Option<Camera>> {
        self.0.get_camera(camera_id).await
    }

    async fn list_cameras(&self) -> Result<Vec<Camera>> {
        self.0.list_cameras().await
    }

    async fn update_camera(&self, _camera_id: &str, _req: &UpdateCameraRequest) -> Result<Camera> {
        Err(Error::Sqlx(sqlx::Error::PoolTimedOut))
    }
}

/// Edit form that waits for a permit before rendering
struct GatedForm {
    gate: Arc<Semaphore>,
}

#[async_trait]
impl EditForm for GatedForm {
    async fn render(&self, camera_id: &str, initial: &Camera) -> Markup {
        let _permit = self.gate.acquire().await.unwrap();
        CameraEditForm.render(camera_id, initial).await
    }
}

#[tokio::test]
async fn test_found_camera_renders_heading_and_form() {
    let (app, _) = app();

    let response = app.oneshot(get("/cameras/cam-001/edit")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );

    let page = body_string(response.into_body()).await;
    assert!(page.contains(&format!("<h1 class=\"text-3xl font-bold mb-6\">{}</h1>", EDIT_CAMERA_HEADING)));
    assert!(page.contains(r#"data-camera-id="cam-001""#));
    assert!(page.contains(r#"value="Lobby Cam""#));
    assert!(page.ends_with("</body></html>"));
}

#[tokio::test]
async fn test_form_receives_record_unmodified() {
    let stored = lobby_cam();
    let repo = Arc::new(MemoryCameraRepository::with_cameras([stored.clone()]));
    let app = app_with(repo);

    let response = app.oneshot(get("/cameras/cam-001/edit")).await.unwrap();
    let page = body_string(response.into_body()).await;

    assert_eq!(initial_data(&page), stored);
}

#[tokio::test]
async fn test_missing_camera_is_not_found() {
    let (app, _) = app();

    let response = app.oneshot(get("/cameras/missing-99/edit")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_string(response.into_body()).await;
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_malformed_id_is_not_found() {
    let (app, _) = app();

    let response = app.oneshot(get("/cameras/bad%20id!/edit")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_storage_failure_is_not_found() {
    let app = app_with(Arc::new(UnreachableRepository));

    let response = app.oneshot(get("/cameras/cam-001/edit")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_string(response.into_body()).await;
    assert!(!body.contains(EDIT_CAMERA_HEADING));
}

#[tokio::test]
async fn test_slow_form_streams_shell_first() {
    let gate = Arc::new(Semaphore::new(0));
    let repo = Arc::new(MemoryCameraRepository::with_cameras([lobby_cam()]));
    let state = AppState::new(config(), repo, StoreBackend::Memory)
        .with_edit_form(Arc::new(GatedForm { gate: gate.clone() }));
    let app = web_api::create_router(state);

    let response = app.oneshot(get("/cameras/cam-001/edit")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let mut body = response.into_body();

    let shell = next_chunk(&mut body).await.unwrap();
    assert!(shell.contains(EDIT_CAMERA_HEADING));
    assert!(shell.contains(r#"data-skeleton="camera-form""#));
    assert!(shell.contains(r#"data-suspense="pending""#));
    assert!(!shell.contains("<form"));

    gate.add_permits(1);

    let resolved = next_chunk(&mut body).await.unwrap();
    assert!(resolved.contains(r#"data-camera-id="cam-001""#));
    assert!(resolved.contains(r#"<template id="camera-form-content">"#));
    assert!(!resolved.contains("<h1"));
    assert!(resolved.ends_with("</body></html>"));

    assert!(next_chunk(&mut body).await.is_none());
}

#[tokio::test]
async fn test_repeated_requests_are_identical() {
    let (app, _) = app();

    let first = app.clone().oneshot(get("/cameras/cam-001/edit")).await.unwrap();
    let second = app.oneshot(get("/cameras/cam-001/edit")).await.unwrap();

    assert_eq!(
        body_string(first.into_body()).await,
        body_string(second.into_body()).await
    );
}

#[tokio::test]
async fn test_form_fragment() {
    let (app, _) = app();

    let response = app.clone().oneshot(get("/cameras/cam-001/edit/form")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fragment = body_string(response.into_body()).await;
    assert!(fragment.starts_with("<form"));
    assert!(!fragment.contains(EDIT_CAMERA_HEADING));

    let response = app.oneshot(get("/cameras/missing-99/edit/form")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_submit_updates_and_redirects() {
    let (app, repo) = app();

    let response = app
        .oneshot(post_form(
            "/cameras/cam-001/edit",
            "name=Lobby+Cam+East&location=1F&family=axis&polling_interval_sec=30&enabled=on",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/cameras/cam-001/edit");

    let camera = repo.get_camera("cam-001").await.unwrap().unwrap();
    assert_eq!(camera.name, "Lobby Cam East");
    assert_eq!(camera.location, "1F");
    assert_eq!(camera.family, "axis");
    assert_eq!(camera.polling_interval_sec, 30);
    assert!(camera.enabled);
    assert!(!camera.polling_enabled);
}

#[tokio::test]
async fn test_submit_invalid_rerenders_form() {
    let (app, repo) = app();

    let response = app
        .oneshot(post_form(
            "/cameras/cam-001/edit",
            "name=+&family=tapo&polling_interval_sec=30",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let page = body_string(response.into_body()).await;
    assert!(page.contains(EDIT_CAMERA_HEADING));
    assert!(page.contains(r#"role="alert""#));
    assert!(page.contains(r#"<option value="tapo" selected>"#));

    let camera = repo.get_camera("cam-001").await.unwrap().unwrap();
    assert_eq!(camera.name, "Lobby Cam");
}

#[tokio::test]
async fn test_submit_missing_camera() {
    let (app, _) = app();

    let response = app
        .oneshot(post_form(
            "/cameras/missing-99/edit",
            "name=Ghost&family=tapo&polling_interval_sec=30",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_submit_unchanged_form_keeps_record() {
    let (app, repo) = app();
    let before = repo.get_camera("cam-001").await.unwrap().unwrap();

    let response = app
        .oneshot(post_form("/cameras/cam-001/edit", &unchanged_form(&before)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let mut after = repo.get_camera("cam-001").await.unwrap().unwrap();
    assert_eq!(after.floor, None);
    assert_eq!(after.ip_address, None);
    assert_eq!(after.rtsp_main, None);
    after.updated_at = before.updated_at;
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_submit_blank_input_clears_column() {
    let mut camera = lobby_cam();
    camera.floor = Some("2F".to_string());
    camera.model = Some("C200".to_string());
    let repo = Arc::new(MemoryCameraRepository::with_cameras([camera.clone()]));
    let app = app_with(repo.clone());

    camera.floor = None;
    let response = app
        .oneshot(post_form("/cameras/cam-001/edit", &unchanged_form(&camera)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let stored = repo.get_camera("cam-001").await.unwrap().unwrap();
    assert_eq!(stored.floor, None);
    assert_eq!(stored.model.as_deref(), Some("C200"));
}

#[tokio::test]
async fn test_submit_unknown_family_rerenders_form() {
    let (app, repo) = app();

    let response = app
        .oneshot(post_form(
            "/cameras/cam-001/edit",
            "name=Lobby+Cam&family=sony&polling_interval_sec=30",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let page = body_string(response.into_body()).await;
    assert!(page.contains(EDIT_CAMERA_HEADING));
    assert!(page.contains(r#"role="alert""#));
    assert!(page.contains(r#"data-camera-id="cam-001""#));

    let camera = repo.get_camera("cam-001").await.unwrap().unwrap();
    assert_eq!(camera.family, "unknown");
}

#[tokio::test]
async fn test_submit_non_numeric_interval_rerenders_form() {
    let (app, repo) = app();

    let response = app
        .oneshot(post_form(
            "/cameras/cam-001/edit",
            "name=Lobby+Cam+East&family=tapo&polling_interval_sec=soon",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let page = body_string(response.into_body()).await;
    assert!(page.contains(r#"role="alert""#));
    assert!(page.contains(r#"value="Lobby Cam East""#));

    let camera = repo.get_camera("cam-001").await.unwrap().unwrap();
    assert_eq!(camera.name, "Lobby Cam");
}

#[tokio::test]
async fn test_submit_oversized_floor_rerenders_form() {
    let (app, repo) = app();
    let body = format!(
        "name=Lobby+Cam&family=tapo&polling_interval_sec=30&floor={}",
        "F".repeat(CAMERA_FLOOR_MAX_LEN + 8)
    );

    let response = app
        .oneshot(post_form("/cameras/cam-001/edit", &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let camera = repo.get_camera("cam-001").await.unwrap().unwrap();
    assert_eq!(camera.floor, None);
}

#[tokio::test]
async fn test_submit_storage_failure_is_server_error() {
    let repo = ReadOnlyRepository(MemoryCameraRepository::with_cameras([lobby_cam()]));
    let app = app_with(Arc::new(repo));

    let response = app
        .oneshot(post_form(
            "/cameras/cam-001/edit",
            "name=Lobby+Cam+East&family=tapo&polling_interval_sec=30",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get(header::LOCATION).is_none());
}

#[tokio::test]
async fn test_submit_malformed_id_is_not_found() {
    let (app, _) = app();

    let response = app
        .oneshot(post_form(
            "/cameras/bad%20id!/edit",
            "name=Ghost&family=tapo&polling_interval_sec=30",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_get_camera() {
    let (app, _) = app();

    let response = app.clone().oneshot(get("/api/cameras/cam-001")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_string(response.into_body()).await).unwrap();
    assert_eq!(json["ok"], true);
    assert_eq!(json["data"]["camera_id"], "cam-001");
    assert_eq!(json["data"]["name"], "Lobby Cam");

    let response = app.oneshot(get("/api/cameras/missing-99")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json: serde_json::Value = serde_json::from_str(&body_string(response.into_body()).await).unwrap();
    assert_eq!(json["error_code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_api_update_validation() {
    let (app, _) = app();

    let request = Request::builder()
        .method("PUT")
        .uri("/api/cameras/cam-001")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"polling_interval_sec": 0}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_api_update_camera() {
    let (app, repo) = app();

    let request = Request::builder()
        .method("PUT")
        .uri("/api/cameras/cam-001")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name": "Front Door", "family": "nest"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let camera = repo.get_camera("cam-001").await.unwrap().unwrap();
    assert_eq!(camera.name, "Front Door");
    assert_eq!(camera.family, "nest");
}

#[tokio::test]
async fn test_api_update_missing_camera() {
    let (app, _) = app();

    let response = app
        .oneshot(put_json("/api/cameras/missing-99", r#"{"name": "Ghost"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json: serde_json::Value = serde_json::from_str(&body_string(response.into_body()).await).unwrap();
    assert_eq!(json["error_code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_api_update_rejects_unknown_family() {
    let (app, repo) = app();

    let response = app
        .oneshot(put_json("/api/cameras/cam-001", r#"{"family": "sony"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let camera = repo.get_camera("cam-001").await.unwrap().unwrap();
    assert_eq!(camera.family, "unknown");
}

#[tokio::test]
async fn test_api_update_null_clears_column() {
    let mut camera = lobby_cam();
    camera.ip_address = Some("192.168.1.10".to_string());
    camera.model = Some("C200".to_string());
    let repo = Arc::new(MemoryCameraRepository::with_cameras([camera]));
    let app = app_with(repo.clone());

    let response = app
        .oneshot(put_json("/api/cameras/cam-001", r#"{"ip_address": null}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_string(response.into_body()).await).unwrap();
    assert!(json["data"]["ip_address"].is_null());
    assert_eq!(json["data"]["model"], "C200");
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = app();

    let response = app.oneshot(get("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_string(response.into_body()).await).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["store"], "memory");
    assert_eq!(json["camera_count"], 1);
}

#[tokio::test]
async fn test_health_check_degraded() {
    let app = app_with(Arc::new(UnreachableRepository));

    let response = app.oneshot(get("/healthz")).await.unwrap();
    let json: serde_json::Value = serde_json::from_str(&body_string(response.into_body()).await).unwrap();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["store_connected"], false);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (app, _) = app();

    let response = app.oneshot(get("/cameras")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
