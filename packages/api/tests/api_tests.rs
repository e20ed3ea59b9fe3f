// ABOUTME: Router-level tests for the task API
// ABOUTME: Drives the axum router end to end against an in-memory database

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use taskboard_api::{create_router, DbState};

async fn create_test_app() -> Router {
    let db = DbState::init_with_url("sqlite::memory:").await.unwrap();
    create_router(db)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_list_tasks_empty() {
    let app = create_test_app().await;

    let (status, body) = send(&app, get_request("/api/tasks")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_create_task_returns_created() {
    let app = create_test_app().await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/tasks",
            json!({
                "title": "Buy milk",
                "description": "Two liters",
                "dueDate": "2026-09-01",
                "location": "Corner store",
                "tags": ["shopping", "errand"]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["title"], json!("Buy milk"));
    assert_eq!(body["data"]["status"], json!("pending"));
    assert_eq!(body["data"]["dueDate"], json!("2026-09-01"));
    assert_eq!(
        body["data"]["tags"],
        json!([{ "name": "errand" }, { "name": "shopping" }])
    );
}

#[tokio::test]
async fn test_create_task_empty_title_is_bad_request() {
    let app = create_test_app().await;

    let (status, body) = send(
        &app,
        json_request("POST", "/api/tasks", json!({ "title": "" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("title"));
}

#[tokio::test]
async fn test_query_filters_by_tag_and_text() {
    let app = create_test_app().await;

    send(
        &app,
        json_request(
            "POST",
            "/api/tasks",
            json!({ "title": "Buy milk", "tags": ["shopping"] }),
        ),
    )
    .await;
    send(
        &app,
        json_request(
            "POST",
            "/api/tasks",
            json!({ "title": "Return books", "tags": ["errand"] }),
        ),
    )
    .await;

    let (status, body) = send(&app, get_request("/api/tasks?tag=shopping")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["title"], json!("Buy milk"));

    let (_, body) = send(&app, get_request("/api/tasks?q=BOOKS")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["title"], json!("Return books"));

    // Empty parameters behave like absent ones
    let (_, body) = send(&app, get_request("/api/tasks?q=&tag=")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_task_replaces_fields_and_tags() {
    let app = create_test_app().await;

    let (_, created) = send(
        &app,
        json_request(
            "POST",
            "/api/tasks",
            json!({ "title": "Draft report", "tags": ["a", "b"] }),
        ),
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/tasks/{id}"),
            json!({
                "title": "Finish report",
                "description": null,
                "dueDate": null,
                "location": null,
                "status": "completed",
                "tags": ["b", "c"]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], json!("Finish report"));
    assert_eq!(body["data"]["status"], json!("completed"));
    assert_eq!(
        body["data"]["tags"],
        json!([{ "name": "b" }, { "name": "c" }])
    );
}

#[tokio::test]
async fn test_update_unknown_task_is_not_found() {
    let app = create_test_app().await;

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            "/api/tasks/4242",
            json!({
                "title": "Ghost",
                "description": null,
                "dueDate": null,
                "location": null,
                "status": "pending",
                "tags": []
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_delete_task_reports_affected_rows() {
    let app = create_test_app().await;

    let (_, created) = send(
        &app,
        json_request("POST", "/api/tasks", json!({ "title": "Temp" })),
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/tasks/{id}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], json!(1));

    // Deleting the same id again still reports success
    let (status, body) = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/tasks/{id}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], json!(0));

    let (_, body) = send(&app, get_request("/api/tasks")).await;
    assert_eq!(body["data"], json!([]));
}
