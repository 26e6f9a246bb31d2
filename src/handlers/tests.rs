//! # Tests for Handlers

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use crate::clock::SystemClock;
use crate::config::AppConfig;
use crate::server::{AppState, create_app};

fn offline_app() -> axum::Router {
    let state = AppState::new(AppConfig::default(), None, Arc::new(SystemClock))
        .expect("offline state builds");
    create_app(state)
}

async fn get(uri: &str) -> (StatusCode, String) {
    let response = offline_app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_health_reports_offline_database() {
    let (status, body) = get("/healthz").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["service"], "mall-site");
    assert_eq!(json["database"], "offline");
}

#[tokio::test]
async fn test_tenants_api_reports_fallback_source() {
    let (status, body) = get("/api/tenants?q=pizza").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["source"], "fallback");
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["name"], "Pizza Hut");
}

#[tokio::test]
async fn test_tenants_api_rejects_oversized_page() {
    let (status, body) = get("/api/tenants?page_size=500").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["code"], "INVALID_PAGE_SIZE");
}

#[tokio::test]
async fn test_unknown_post_is_problem_json_404() {
    let response = offline_app()
        .oneshot(
            Request::builder()
                .uri("/api/posts/does-not-exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/problem+json"
    );
}

#[tokio::test]
async fn test_unknown_route_renders_not_found_page() {
    let (status, body) = get("/nowhere").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Page not found"));
}

#[tokio::test]
async fn test_trace_id_is_echoed() {
    let response = offline_app()
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .header("x-trace-id", "abc123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-trace-id"], "abc123");
}

#[tokio::test]
async fn test_home_renders_from_fallback_with_offline_banner() {
    let (status, body) = get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Featured stores"));
    assert!(body.contains("banner-offline"));
}
