//! Test utilities for driving the site router.
//!
//! Builds apps over an in-memory SQLite mirror (or no database at all) with a
//! manual clock, and sends requests through `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use chrono::{TimeZone, Utc};
use mall_site::{
    clock::ManualClock,
    config::AppConfig,
    seeds,
    server::{AppState, create_app},
};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use tower::ServiceExt;

/// Sets up an in-memory SQLite database with all migrations applied.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

/// Migrated database loaded with the bundled content.
pub async fn seeded_db() -> Result<DatabaseConnection> {
    let db = setup_test_db().await?;
    seeds::seed_database(&db).await?;
    Ok(db)
}

/// A manual clock pinned to 2026-10-19 09:00 UTC.
pub fn test_clock() -> ManualClock {
    ManualClock::new(
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0)
            .single()
            .expect("valid start instant"),
    )
}

pub fn build_app(config: AppConfig, db: Option<DatabaseConnection>, clock: &ManualClock) -> Router {
    let state = AppState::new(config, db, Arc::new(clock.clone())).expect("state builds");
    create_app(state)
}

/// App with no database; every read is served from bundled data.
pub fn offline_app(clock: &ManualClock) -> Router {
    build_app(AppConfig::default(), None, clock)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("response body is json")
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.expect("request succeeds");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    TestResponse {
        status,
        headers,
        body: String::from_utf8(bytes.to_vec()).expect("utf-8 body"),
    }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

/// Posts an urlencoded form as the client at `ip`.
pub async fn post_form(app: &Router, uri: &str, ip: &str, fields: &[(&str, &str)]) -> TestResponse {
    let body = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish();
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header("x-forwarded-for", ip)
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

/// Posts a JSON body as the client at `ip`.
pub async fn post_json(app: &Router, uri: &str, ip: &str, body: serde_json::Value) -> TestResponse {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", ip)
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}
