//! HTTP surface tests for the secret and log endpoints.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use github_events::config::AppConfig;
use github_events::database::models::{EventAction, EventLogRecord};
use github_events::database::Database;
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
    }
}

async fn test_app() -> (Router, Database) {
    let database = Database::new_in_memory().await.expect("in-memory database");
    database.run_migrations().await.expect("migrations");
    let app = github_events::app(test_config(), database.clone());
    (app, database)
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .expect("build request")
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build request")
}

async fn response_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&body).expect("parse response json")
}

#[tokio::test]
async fn test_home_is_alive() {
    let (app, _database) = test_app().await;

    let response = app.oneshot(get_request("/")).await.expect("execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    assert_eq!(&body[..], b"GitHub Webhook Receiver Active");
}

#[tokio::test]
async fn test_create_secret_returns_code() {
    let (app, _database) = test_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/secret/create",
            &json!({"name": "alice", "message": "meet at noon"}),
        ))
        .await
        .expect("execute request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["status"], "ok");

    let code = body["secret"].as_str().expect("secret code");
    assert_eq!(code.len(), 8);
    assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
}

#[tokio::test]
async fn test_create_secret_missing_message_is_bad_request() {
    let (app, _database) = test_app().await;

    let response = app
        .oneshot(json_request("POST", "/secret/create", &json!({"name": ""})))
        .await
        .expect("execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_create_secret_empty_message_is_bad_request() {
    let (app, _database) = test_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/secret/create",
            &json!({"name": "alice", "message": ""}),
        ))
        .await
        .expect("execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_secret_round_trip_over_http() {
    let (app, _database) = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/secret/create",
            &json!({"name": "alice", "message": "meet at noon"}),
        ))
        .await
        .expect("create request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let code = response_json(response).await["secret"]
        .as_str()
        .expect("secret code")
        .to_string();

    let response = app
        .oneshot(get_request(&format!("/secret/{}", code)))
        .await
        .expect("get request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["name"], "alice");
    assert_eq!(body["message"], "meet at noon");
}

#[tokio::test]
async fn test_unknown_secret_code_is_not_found() {
    let (app, _database) = test_app().await;

    let response = app
        .oneshot(get_request("/secret/NOPE1234"))
        .await
        .expect("execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_logs_capped_at_fifty_newest_first() {
    let (app, database) = test_app().await;

    for i in 0..60 {
        let record = EventLogRecord {
            id: None,
            request_id: format!("sha-{}", i),
            author: "octocat".to_string(),
            action: EventAction::Push,
            from_branch: "main".to_string(),
            to_branch: "main".to_string(),
            timestamp: Utc::now(),
        };
        database.insert_event_log(&record).await.expect("insert log");
    }

    let response = app.oneshot(get_request("/logs")).await.expect("execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let records = body.as_array().expect("array body");

    assert_eq!(records.len(), 50);
    assert_eq!(records[0]["request_id"], "sha-59");
    assert_eq!(records[49]["request_id"], "sha-10");

    // Storage ids come back as opaque strings
    assert!(records[0]["id"].is_string());
}

#[tokio::test]
async fn test_logs_empty_database_is_an_empty_array() {
    let (app, _database) = test_app().await;

    let response = app.oneshot(get_request("/logs")).await.expect("execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body.as_array().expect("array body").len(), 0);
}

#[tokio::test]
async fn test_health_endpoint_reports_healthy() {
    let (app, _database) = test_app().await;

    let response = app.oneshot(get_request("/health")).await.expect("execute request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["status"], "healthy");
}
