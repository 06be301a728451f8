#![cfg(feature = "server")]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use once_app::api::{create_router, AppState};
use once_app::{setup_database, AmountParser, Segmenter};
use rusqlite::Connection;
use serde_json::{json, Value};
use tower::ServiceExt;

fn create_test_app() -> Router {
    let conn = Connection::open_in_memory().unwrap();
    setup_database(&conn).unwrap();
    create_router(AppState::new(
        conn,
        AmountParser::default(),
        Segmenter::default(),
    ))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let app = create_test_app();
    let (status, body) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], "OK");
}

#[tokio::test]
async fn test_calculate_change() {
    let app = create_test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/calculate",
        Some(json!({"total": 7.5, "received": 10})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["change"], 2.5);
}

#[tokio::test]
async fn test_calculate_rejects_insufficient_and_missing() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/calculate",
        Some(json!({"total": 10, "received": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = send(&app, "POST", "/api/calculate", Some(json!({"total": 10}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/calculate",
        Some(json!({"total": -1, "received": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_history_append_and_list() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/history",
        Some(json!({"total": 7.5, "received": 10, "change": 2.5})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["change"], 2.5);

    send(
        &app,
        "POST",
        "/api/history",
        Some(json!({"total": 1, "received": 2})),
    )
    .await;

    let (status, body) = send(&app, "GET", "/api/history", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_array());
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 2);
    // newest first
    assert_eq!(records[0]["total"], 1.0);
    assert_eq!(records[1]["total"], 7.5);
}

#[tokio::test]
async fn test_history_rejects_wrong_change() {
    let app = create_test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/history",
        Some(json!({"total": 7.5, "received": 10, "change": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "change 3.00 does not match received - total (2.50)"
    );

    let (_, body) = send(&app, "GET", "/api/history", None).await;
    assert!(body.is_array());
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_parse_phrase() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/parse",
        Some(json!({"text": "siete con cincuenta"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"], 7.5);
    assert_eq!(body["rule"], "euros_con_cents");

    let (status, body) = send(
        &app,
        "POST",
        "/api/parse",
        Some(json!({"text": "xyz no numbers here"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_voice_transcript() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/voice",
        Some(json!({"transcript": "diez paga con veinte"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["total"], 10.0);
    assert_eq!(body["received"], 20.0);
    assert_eq!(body["keyword"], "paga con");

    let (_, body) = send(
        &app,
        "POST",
        "/api/voice",
        Some(json!({"transcript": "hola que tal"})),
    )
    .await;
    assert_eq!(body["success"], false);
    assert!(body["total"].is_null());
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = create_test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/calculate")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
